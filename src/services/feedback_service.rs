//! Feedback service for recording user corrections.
//!
//! Feedback arrives as a sparse event (message id plus whichever judgements
//! the user made). The service resolves the sender and original tag from the
//! stored baseline assignment, appends a full record to the append-only log,
//! and returns the re-scored assignment so callers see the effect of their
//! correction immediately.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

use crate::classify::{AdaptiveScorer, ScoringPolicy};
use crate::domain::{FeedbackRecord, MessageId, SenderProfile, Tag, TagAssignment};
use crate::services::classification_service::AssignmentStore;

/// Errors that can occur during feedback operations.
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// Event is structurally invalid.
    #[error("malformed feedback event: {0}")]
    Malformed(String),

    /// Corrected tag name is not a known tag.
    #[error("unknown tag: {0}")]
    UnknownTag(String),

    /// No stored assignment to attach the feedback to.
    #[error("no assignment for message: {0}")]
    UnknownMessage(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for feedback operations.
pub type FeedbackResult<T> = Result<T, FeedbackError>;

/// Storage trait for the append-only feedback log.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Appends a record to the log.
    async fn append_record(&self, record: &FeedbackRecord) -> FeedbackResult<()>;

    /// Gets all records for a sender, oldest first.
    async fn records_for_sender(&self, sender: &str) -> FeedbackResult<Vec<FeedbackRecord>>;

    /// Gets the full log, oldest first.
    async fn all_records(&self) -> FeedbackResult<Vec<FeedbackRecord>>;

    /// Counts records in the log.
    async fn count_records(&self) -> FeedbackResult<u32>;

    /// Counts distinct senders with at least one record.
    async fn count_senders(&self) -> FeedbackResult<u32>;
}

/// A user feedback event as it arrives from the outside.
///
/// At least one of the optional fields must be present.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackEvent {
    pub message_id: String,
    #[serde(default)]
    pub corrected_tag: Option<String>,
    #[serde(default)]
    pub summary_helpful: Option<bool>,
}

/// Service that records feedback and re-scores affected assignments.
pub struct FeedbackService<S: AssignmentStore + FeedbackStore> {
    storage: S,
    scorer: AdaptiveScorer,
}

impl<S: AssignmentStore + FeedbackStore> FeedbackService<S> {
    /// Creates a service with the default scoring policy.
    pub fn new(storage: S) -> Self {
        Self::with_policy(storage, ScoringPolicy::default())
    }

    /// Creates a service with a custom scoring policy.
    pub fn with_policy(storage: S, policy: ScoringPolicy) -> Self {
        Self {
            storage,
            scorer: AdaptiveScorer::new(policy),
        }
    }

    /// Records a feedback event and returns the re-scored assignment.
    ///
    /// The original tag and sender come from the stored baseline, never from
    /// the event itself, so a correction cannot rewrite history.
    pub async fn submit(&self, event: FeedbackEvent) -> FeedbackResult<TagAssignment> {
        if event.message_id.trim().is_empty() {
            return Err(FeedbackError::Malformed("empty message id".to_string()));
        }
        if event.corrected_tag.is_none() && event.summary_helpful.is_none() {
            return Err(FeedbackError::Malformed(
                "event carries no judgement".to_string(),
            ));
        }

        let corrected_tag = match &event.corrected_tag {
            Some(name) => Some(
                Tag::parse(name).ok_or_else(|| FeedbackError::UnknownTag(name.clone()))?,
            ),
            None => None,
        };

        let message_id = MessageId::from(event.message_id.as_str());
        let baseline = self
            .storage
            .get_assignment(&message_id)
            .await
            .map_err(|err| FeedbackError::Storage(err.to_string()))?
            .ok_or_else(|| FeedbackError::UnknownMessage(event.message_id.clone()))?;

        let record = FeedbackRecord {
            id: format!("fb-{}", uuid::Uuid::new_v4()),
            message_id,
            sender: baseline.sender.clone(),
            original_tag: baseline.tag,
            corrected_tag,
            summary_helpful: event.summary_helpful,
            created_at: Utc::now(),
        };
        self.storage.append_record(&record).await?;

        let records = self.storage.records_for_sender(&baseline.sender).await?;
        let profile = SenderProfile::from_records(&baseline.sender, &records);
        Ok(self.scorer.adjust(&baseline, &profile))
    }

    /// Recomputes the profile for a sender from the stored log.
    pub async fn profile_for(&self, sender: &str) -> FeedbackResult<SenderProfile> {
        let records = self.storage.records_for_sender(sender).await?;
        Ok(SenderProfile::from_records(sender, &records))
    }

    /// Returns a reference to the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
