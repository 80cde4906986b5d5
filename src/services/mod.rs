//! Business services layer.
//!
//! Services orchestrate the rule engine, adaptive scorer, and storage:
//!
//! ```text
//! Application Layer (CLI, callers)
//!          |
//!          v
//!    Services Layer  <-- You are here
//!          |
//!          v
//! Infrastructure (Storage, Message Sources)
//! ```
//!
//! - [`ClassificationService`]: classifies messages and persists baselines
//! - [`FeedbackService`]: records corrections and re-scores assignments
//! - [`StatsService`]: aggregates tagging and learning metrics
//!
//! Storage is abstracted behind the [`AssignmentStore`] and [`FeedbackStore`]
//! traits so services can be tested against in-memory mocks.

mod classification_service;
mod feedback_service;
mod stats_service;

pub use classification_service::{
    AssignmentStore, ClassificationOutput, ClassificationService, ClassifyError, ClassifyResult,
};
pub use feedback_service::{
    FeedbackError, FeedbackEvent, FeedbackResult, FeedbackService, FeedbackStore,
};
pub use stats_service::{
    DominantCorrection, SenderInsight, StatsError, StatsResult, StatsService, TaggingStats,
};
