pub mod assignments;
pub mod feedback;
