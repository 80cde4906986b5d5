//! Feedback domain types.
//!
//! User feedback is captured as append-only [`FeedbackRecord`]s; corrections
//! are new records, never edits. A [`SenderProfile`] is always recomputed as a
//! pure function of the record history for one sender.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{MessageId, Tag};

/// One durable feedback event for a classified message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Unique identifier for this record.
    pub id: String,
    /// Message the feedback is about.
    pub message_id: MessageId,
    /// Sender of the message at the time of feedback.
    pub sender: String,
    /// Tag the system had assigned when feedback was given.
    pub original_tag: Tag,
    /// User-selected tag. `None` when the event only rates the summary.
    pub corrected_tag: Option<Tag>,
    /// Whether the generated summary was helpful, if rated.
    pub summary_helpful: Option<bool>,
    /// When the feedback was given.
    pub created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Returns true if this record expresses a tag judgement at all.
    pub fn is_tag_judgement(&self) -> bool {
        self.corrected_tag.is_some()
    }

    /// Returns true if the user confirmed the assigned tag.
    pub fn is_confirmation(&self) -> bool {
        self.corrected_tag == Some(self.original_tag)
    }

    /// Returns true if the user corrected the tag to a different one.
    pub fn is_correction(&self) -> bool {
        matches!(self.corrected_tag, Some(tag) if tag != self.original_tag)
    }
}

/// Aggregated correction evidence from one tag to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionStat {
    /// Number of deduplicated corrections along this edge.
    pub count: u32,
    /// Timestamp of the most recent correction along this edge.
    pub last_at: DateTime<Utc>,
}

/// Derived reliability profile for one sender.
///
/// Recomputed from the full feedback history; only the latest tag judgement
/// per message counts, so replaying an identical record changes nothing.
#[derive(Debug, Clone)]
pub struct SenderProfile {
    /// Sender address this profile describes.
    pub sender: String,
    /// Deduplicated confirmations of the assigned tag.
    pub confirmed: u32,
    /// Deduplicated corrections to a different tag.
    pub corrected: u32,
    /// Correction evidence keyed by (original tag, corrected tag).
    pub corrections: HashMap<(Tag, Tag), CorrectionStat>,
    /// Deduplicated summary ratings: (helpful, unhelpful).
    pub summary_ratings: (u32, u32),
}

impl SenderProfile {
    /// Builds a profile from a sender's record history.
    ///
    /// Records for other fields (summary-only events) do not count toward tag
    /// aggregates. Per message, only the most recent judgement of each field
    /// is kept.
    pub fn from_records(sender: impl Into<String>, records: &[FeedbackRecord]) -> Self {
        let mut latest_tag: HashMap<&MessageId, &FeedbackRecord> = HashMap::new();
        let mut latest_summary: HashMap<&MessageId, &FeedbackRecord> = HashMap::new();

        for record in records {
            if record.is_tag_judgement() {
                let keep = latest_tag
                    .get(&record.message_id)
                    .map_or(true, |prev| record.created_at >= prev.created_at);
                if keep {
                    latest_tag.insert(&record.message_id, record);
                }
            }
            if record.summary_helpful.is_some() {
                let keep = latest_summary
                    .get(&record.message_id)
                    .map_or(true, |prev| record.created_at >= prev.created_at);
                if keep {
                    latest_summary.insert(&record.message_id, record);
                }
            }
        }

        let mut confirmed = 0;
        let mut corrected = 0;
        let mut corrections: HashMap<(Tag, Tag), CorrectionStat> = HashMap::new();

        for record in latest_tag.values() {
            if record.is_confirmation() {
                confirmed += 1;
            } else if let Some(to) = record.corrected_tag {
                corrected += 1;
                let stat = corrections
                    .entry((record.original_tag, to))
                    .or_insert(CorrectionStat {
                        count: 0,
                        last_at: record.created_at,
                    });
                stat.count += 1;
                if record.created_at > stat.last_at {
                    stat.last_at = record.created_at;
                }
            }
        }

        let mut summary_ratings = (0, 0);
        for record in latest_summary.values() {
            match record.summary_helpful {
                Some(true) => summary_ratings.0 += 1,
                Some(false) => summary_ratings.1 += 1,
                None => {}
            }
        }

        Self {
            sender: sender.into(),
            confirmed,
            corrected,
            corrections,
            summary_ratings,
        }
    }

    /// Returns an empty profile for an unseen sender.
    pub fn empty(sender: impl Into<String>) -> Self {
        Self::from_records(sender, &[])
    }

    /// Number of deduplicated tag judgements in the history.
    pub fn history_len(&self) -> u32 {
        self.confirmed + self.corrected
    }

    /// Sender trust in [0, 1]: confirmed over total judgements.
    ///
    /// Falls back to `prior` (the neutral default) with zero history, which
    /// avoids both divide-by-zero and over-trusting unseen senders.
    pub fn trust(&self, prior: f64) -> f64 {
        let total = self.history_len();
        if total == 0 {
            prior
        } else {
            f64::from(self.confirmed) / f64::from(total)
        }
    }

    /// Returns the alternate tag that should override `rule_tag`, if any.
    ///
    /// Requires at least `threshold` deduplicated corrections away from
    /// `rule_tag` toward one specific alternate. Ties between candidates are
    /// broken by the most recent correction.
    pub fn override_candidate(&self, rule_tag: Tag, threshold: u32) -> Option<(Tag, CorrectionStat)> {
        self.corrections
            .iter()
            .filter(|((from, to), stat)| {
                *from == rule_tag && *to != rule_tag && stat.count >= threshold
            })
            .max_by_key(|(_, stat)| (stat.count, stat.last_at))
            .map(|((_, to), stat)| (*to, *stat))
    }
}
