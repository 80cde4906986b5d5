//! Classification service tying the rule engine and adaptive scorer together.
//!
//! For each message the service computes the rule baseline, persists it, then
//! re-derives the feedback-adjusted assignment from the sender's feedback
//! history. Only the baseline is stored; adjusted assignments are always a
//! pure function of baseline + history, so replaying the feedback log
//! reproduces them exactly.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::classify::{suggested_actions, AdaptiveScorer, RuleEngine, RuleSet, ScoringPolicy, SuggestedAction};
use crate::domain::{AssignmentSource, Message, MessageId, SenderProfile, Tag, TagAssignment};
use crate::services::feedback_service::FeedbackStore;

/// Errors that can occur during classification.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Message cannot be classified as given.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Assignment not found.
    #[error("no assignment for message: {0}")]
    NotFound(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for classification operations.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// Storage trait for persisted tag assignments.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Saves (or replaces) the baseline assignment for a message.
    async fn save_assignment(&self, assignment: &TagAssignment) -> ClassifyResult<()>;

    /// Gets the stored baseline assignment for a message.
    async fn get_assignment(&self, id: &MessageId) -> ClassifyResult<Option<TagAssignment>>;

    /// Lists all stored assignments, most recently updated first.
    async fn list_assignments(&self) -> ClassifyResult<Vec<TagAssignment>>;

    /// Counts stored assignments.
    async fn count_assignments(&self) -> ClassifyResult<u32>;
}

/// Per-message classification result, ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationOutput {
    pub message_id: MessageId,
    pub tag: Tag,
    pub confidence: f64,
    pub reasoning: Vec<String>,
    pub suggested_actions: Vec<SuggestedAction>,
    pub source: AssignmentSource,
}

impl ClassificationOutput {
    fn from_assignment(assignment: TagAssignment) -> Self {
        Self {
            message_id: assignment.message_id,
            tag: assignment.tag,
            confidence: assignment.confidence,
            reasoning: assignment.reasoning,
            suggested_actions: suggested_actions(assignment.tag),
            source: assignment.source,
        }
    }
}

/// Service that classifies messages and persists their baselines.
pub struct ClassificationService<S: AssignmentStore + FeedbackStore> {
    storage: S,
    engine: RuleEngine,
    scorer: AdaptiveScorer,
}

impl<S: AssignmentStore + FeedbackStore> ClassificationService<S> {
    /// Creates a service with the built-in rule tables and default policy.
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, RuleSet::default(), ScoringPolicy::default())
    }

    /// Creates a service with a custom rule set and scoring policy.
    pub fn with_config(storage: S, rules: RuleSet, policy: ScoringPolicy) -> Self {
        Self {
            storage,
            engine: RuleEngine::new(rules),
            scorer: AdaptiveScorer::new(policy),
        }
    }

    /// Classifies a message.
    ///
    /// The rule baseline is persisted; the returned output reflects the
    /// sender's feedback history. When storage is unavailable the rule-only
    /// assignment is returned with a warning rather than an error, so a batch
    /// never fails on I/O.
    pub async fn classify(&self, message: &Message) -> ClassifyResult<ClassificationOutput> {
        if message.id.is_empty() {
            return Err(ClassifyError::InvalidMessage(
                "empty message id".to_string(),
            ));
        }

        let baseline = self.engine.classify(message);

        let records = match self.storage.records_for_sender(&message.sender).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    message_id = %message.id,
                    error = %err,
                    "feedback history unavailable, falling back to rule-only assignment"
                );
                return Ok(ClassificationOutput::from_assignment(baseline));
            }
        };

        if let Err(err) = self.storage.save_assignment(&baseline).await {
            tracing::warn!(
                message_id = %message.id,
                error = %err,
                "failed to persist baseline assignment"
            );
        }

        let profile = SenderProfile::from_records(&message.sender, &records);
        let adjusted = self.scorer.adjust(&baseline, &profile);
        Ok(ClassificationOutput::from_assignment(adjusted))
    }

    /// Classifies a batch of messages.
    ///
    /// Invalid messages are skipped with a warning; the rest of the batch
    /// proceeds.
    pub async fn classify_batch(&self, messages: &[Message]) -> Vec<ClassificationOutput> {
        let mut outputs = Vec::with_capacity(messages.len());
        for message in messages {
            match self.classify(message).await {
                Ok(output) => outputs.push(output),
                Err(err) => {
                    tracing::warn!(message_id = %message.id, error = %err, "skipping message");
                }
            }
        }
        outputs
    }

    /// Re-derives the current assignment for a previously classified message
    /// from its stored baseline and the sender's feedback history.
    pub async fn current_assignment(&self, id: &MessageId) -> ClassifyResult<TagAssignment> {
        let baseline = self
            .storage
            .get_assignment(id)
            .await?
            .ok_or_else(|| ClassifyError::NotFound(id.as_str().to_string()))?;

        let records = self
            .storage
            .records_for_sender(&baseline.sender)
            .await
            .map_err(|err| ClassifyError::Storage(err.to_string()))?;

        let profile = SenderProfile::from_records(&baseline.sender, &records);
        Ok(self.scorer.adjust(&baseline, &profile))
    }

    /// Returns a reference to the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeedbackRecord;
    use crate::services::feedback_service::{FeedbackResult, FeedbackStore};
    use chrono::Utc;
    use std::sync::Mutex;

    struct MockStorage {
        assignments: Mutex<Vec<TagAssignment>>,
        records: Mutex<Vec<FeedbackRecord>>,
        fail_feedback_reads: bool,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                assignments: Mutex::new(Vec::new()),
                records: Mutex::new(Vec::new()),
                fail_feedback_reads: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail_feedback_reads: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl AssignmentStore for MockStorage {
        async fn save_assignment(&self, assignment: &TagAssignment) -> ClassifyResult<()> {
            let mut assignments = self.assignments.lock().unwrap();
            assignments.retain(|a| a.message_id != assignment.message_id);
            assignments.push(assignment.clone());
            Ok(())
        }

        async fn get_assignment(&self, id: &MessageId) -> ClassifyResult<Option<TagAssignment>> {
            Ok(self
                .assignments
                .lock()
                .unwrap()
                .iter()
                .find(|a| &a.message_id == id)
                .cloned())
        }

        async fn list_assignments(&self) -> ClassifyResult<Vec<TagAssignment>> {
            Ok(self.assignments.lock().unwrap().clone())
        }

        async fn count_assignments(&self) -> ClassifyResult<u32> {
            Ok(self.assignments.lock().unwrap().len() as u32)
        }
    }

    #[async_trait]
    impl FeedbackStore for MockStorage {
        async fn append_record(&self, record: &FeedbackRecord) -> FeedbackResult<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn records_for_sender(&self, sender: &str) -> FeedbackResult<Vec<FeedbackRecord>> {
            if self.fail_feedback_reads {
                return Err(crate::services::FeedbackError::Storage(
                    "disk on fire".to_string(),
                ));
            }
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.sender == sender)
                .cloned()
                .collect())
        }

        async fn all_records(&self) -> FeedbackResult<Vec<FeedbackRecord>> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn count_records(&self) -> FeedbackResult<u32> {
            Ok(self.records.lock().unwrap().len() as u32)
        }

        async fn count_senders(&self) -> FeedbackResult<u32> {
            let records = self.records.lock().unwrap();
            let mut senders: Vec<&str> = records.iter().map(|r| r.sender.as_str()).collect();
            senders.sort_unstable();
            senders.dedup();
            Ok(senders.len() as u32)
        }
    }

    fn message(id: &str, sender: &str, subject: &str, body: &str) -> Message {
        Message {
            id: MessageId::from(id),
            sender: sender.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            date: Utc::now(),
            label: None,
        }
    }

    #[tokio::test]
    async fn classify_persists_rule_baseline() {
        let service = ClassificationService::new(MockStorage::new());
        let msg = message("m1", "ops@company.com", "URGENT: server down", "act now");

        let output = service.classify(&msg).await.unwrap();
        assert_eq!(output.tag, Tag::Urgent);
        assert!(!output.suggested_actions.is_empty());

        let stored = service
            .storage()
            .get_assignment(&MessageId::from("m1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.tag, Tag::Urgent);
        assert_eq!(stored.source, AssignmentSource::Rule);
    }

    #[tokio::test]
    async fn classify_rejects_empty_message_id() {
        let service = ClassificationService::new(MockStorage::new());
        let msg = message("", "a@b.com", "hello", "world");

        let err = service.classify(&msg).await.unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidMessage(_)));
    }

    #[tokio::test]
    async fn storage_failure_degrades_to_rule_only() {
        let service = ClassificationService::new(MockStorage::failing());
        let msg = message("m1", "ops@company.com", "URGENT: server down", "act now");

        let output = service.classify(&msg).await.unwrap();
        assert_eq!(output.tag, Tag::Urgent);
        assert_eq!(output.source, AssignmentSource::Rule);
    }

    #[tokio::test]
    async fn feedback_history_overrides_rule_tag() {
        let storage = MockStorage::new();
        for i in 0..3 {
            storage
                .append_record(&FeedbackRecord {
                    id: format!("f{i}"),
                    message_id: MessageId::from(format!("old-{i}")),
                    sender: "digest@letters.io".to_string(),
                    original_tag: Tag::Newsletter,
                    corrected_tag: Some(Tag::Important),
                    summary_helpful: None,
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }

        let service = ClassificationService::new(storage);
        let msg = message(
            "m9",
            "digest@letters.io",
            "Weekly digest",
            "unsubscribe below",
        );

        let output = service.classify(&msg).await.unwrap();
        assert_eq!(output.tag, Tag::Important);
        assert_eq!(output.source, AssignmentSource::FeedbackAdjusted);

        // Baseline in storage still carries the rule verdict.
        let stored = service
            .storage()
            .get_assignment(&MessageId::from("m9"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.tag, Tag::Newsletter);
    }

    #[tokio::test]
    async fn batch_skips_invalid_messages() {
        let service = ClassificationService::new(MockStorage::new());
        let messages = vec![
            message("m1", "a@b.com", "meeting tomorrow", "see agenda"),
            message("", "a@b.com", "broken", "no id"),
            message("m2", "a@b.com", "invoice attached", "payment due"),
        ];

        let outputs = service.classify_batch(&messages).await;
        assert_eq!(outputs.len(), 2);
    }

    #[tokio::test]
    async fn classification_is_deterministic() {
        let service = ClassificationService::new(MockStorage::new());
        let msg = message("m1", "ops@company.com", "URGENT deadline", "asap");

        let first = service.classify(&msg).await.unwrap();
        let second = service.classify(&msg).await.unwrap();
        assert_eq!(first.tag, second.tag);
        assert!((first.confidence - second.confidence).abs() < 1e-9);
        assert_eq!(first.reasoning, second.reasoning);
    }
}
