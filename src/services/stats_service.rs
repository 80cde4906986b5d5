//! Statistics service for tagging metrics.
//!
//! Aggregates stored assignments and the feedback log into:
//! - Tag distribution and average baseline confidence
//! - Correction volume, per-tag correction counts, correction rate
//! - Per-sender insights (trust, history size, dominant correction)

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::classify::ScoringPolicy;
use crate::domain::{SenderProfile, Tag};
use crate::services::classification_service::AssignmentStore;
use crate::services::feedback_service::FeedbackStore;

/// Errors that can occur during stats operations.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for stats operations.
pub type StatsResult<T> = Result<T, StatsError>;

/// Aggregate tagging statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaggingStats {
    /// Messages with a stored assignment.
    pub total_tagged: u32,
    /// Assignments per tag.
    pub tag_distribution: HashMap<Tag, u32>,
    /// Mean baseline confidence across stored assignments.
    pub average_confidence: f64,
    /// Feedback records in the log.
    pub feedback_events: u32,
    /// Deduplicated tag confirmations.
    pub confirmations: u32,
    /// Deduplicated tag corrections.
    pub corrections: u32,
    /// Corrections keyed by the tag that was corrected away from.
    pub corrections_by_tag: HashMap<Tag, u32>,
    /// corrections / (confirmations + corrections).
    pub correction_rate: f64,
    /// Distinct senders with feedback history.
    pub learned_senders: u32,
}

/// Per-sender learning summary.
#[derive(Debug, Clone, Serialize)]
pub struct SenderInsight {
    pub sender: String,
    pub trust: f64,
    pub feedback_events: u32,
    /// The most frequent correction for this sender, if any.
    pub dominant_correction: Option<DominantCorrection>,
}

/// A sender's most repeated correction.
#[derive(Debug, Clone, Serialize)]
pub struct DominantCorrection {
    pub from: Tag,
    pub to: Tag,
    pub count: u32,
}

/// Service computing tagging statistics from storage.
pub struct StatsService<S: AssignmentStore + FeedbackStore> {
    storage: S,
    policy: ScoringPolicy,
}

impl<S: AssignmentStore + FeedbackStore> StatsService<S> {
    /// Creates a stats service with the default scoring policy.
    pub fn new(storage: S) -> Self {
        Self::with_policy(storage, ScoringPolicy::default())
    }

    /// Creates a stats service with a custom scoring policy.
    pub fn with_policy(storage: S, policy: ScoringPolicy) -> Self {
        Self { storage, policy }
    }

    /// Computes aggregate tagging statistics.
    pub async fn tagging_stats(&self) -> StatsResult<TaggingStats> {
        let assignments = self
            .storage
            .list_assignments()
            .await
            .map_err(|err| StatsError::Storage(err.to_string()))?;
        let records = self
            .storage
            .all_records()
            .await
            .map_err(|err| StatsError::Storage(err.to_string()))?;

        let mut tag_distribution: HashMap<Tag, u32> = HashMap::new();
        let mut confidence_sum = 0.0;
        for assignment in &assignments {
            *tag_distribution.entry(assignment.tag).or_insert(0) += 1;
            confidence_sum += assignment.confidence;
        }
        let average_confidence = if assignments.is_empty() {
            0.0
        } else {
            confidence_sum / assignments.len() as f64
        };

        // Group the log by sender and dedupe through SenderProfile so replayed
        // events do not inflate the counts.
        let mut by_sender: HashMap<&str, Vec<_>> = HashMap::new();
        for record in &records {
            by_sender
                .entry(record.sender.as_str())
                .or_default()
                .push(record.clone());
        }

        let mut confirmations = 0;
        let mut corrections = 0;
        let mut corrections_by_tag: HashMap<Tag, u32> = HashMap::new();
        for (sender, sender_records) in &by_sender {
            let profile = SenderProfile::from_records(*sender, sender_records);
            confirmations += profile.confirmed;
            corrections += profile.corrected;
            for ((from, _to), stat) in &profile.corrections {
                *corrections_by_tag.entry(*from).or_insert(0) += stat.count;
            }
        }

        let judged = confirmations + corrections;
        let correction_rate = if judged == 0 {
            0.0
        } else {
            f64::from(corrections) / f64::from(judged)
        };

        Ok(TaggingStats {
            total_tagged: assignments.len() as u32,
            tag_distribution,
            average_confidence,
            feedback_events: records.len() as u32,
            confirmations,
            corrections,
            corrections_by_tag,
            correction_rate,
            learned_senders: by_sender.len() as u32,
        })
    }

    /// Computes per-sender insights, highest trust first.
    pub async fn sender_insights(&self) -> StatsResult<Vec<SenderInsight>> {
        let records = self
            .storage
            .all_records()
            .await
            .map_err(|err| StatsError::Storage(err.to_string()))?;

        let mut by_sender: HashMap<String, Vec<_>> = HashMap::new();
        for record in records {
            by_sender
                .entry(record.sender.clone())
                .or_default()
                .push(record);
        }

        let mut insights: Vec<SenderInsight> = by_sender
            .into_iter()
            .map(|(sender, sender_records)| {
                let profile = SenderProfile::from_records(&sender, &sender_records);
                let dominant_correction = profile
                    .corrections
                    .iter()
                    .max_by_key(|(_, stat)| (stat.count, stat.last_at))
                    .map(|((from, to), stat)| DominantCorrection {
                        from: *from,
                        to: *to,
                        count: stat.count,
                    });
                SenderInsight {
                    trust: profile.trust(self.policy.trust_prior),
                    feedback_events: profile.history_len(),
                    dominant_correction,
                    sender,
                }
            })
            .collect();

        insights.sort_by(|a, b| {
            b.trust
                .partial_cmp(&a.trust)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.sender.cmp(&b.sender))
        });
        Ok(insights)
    }
}
