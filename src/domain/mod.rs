//! Domain layer types for the sift triage engine.
//!
//! This module contains the core domain types used throughout the crate:
//! messages, priority tags, tag assignments, and feedback records.

mod feedback;
mod message;
mod tag;
mod types;

pub use feedback::{CorrectionStat, FeedbackRecord, SenderProfile};
pub use message::Message;
pub use tag::{AssignmentSource, Tag, TagAssignment};
pub use types::MessageId;
