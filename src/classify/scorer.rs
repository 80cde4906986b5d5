//! The adaptive scorer.
//!
//! Blends rule confidence with sender trust derived from feedback history,
//! and replaces the rule tag once repeated corrections point at one specific
//! alternate. The "learning" here is a frequency-based trust heuristic, not a
//! reinforcement-learning formalism.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{AssignmentSource, SenderProfile, TagAssignment};

/// Tunable constants for feedback-based scoring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Corrections toward one alternate tag required to override the rule tag.
    pub override_threshold: u32,
    /// Neutral trust assumed for senders with no history.
    pub trust_prior: f64,
    /// Softening constant for the history weight `n / (n + k)`: more feedback
    /// means the blend leans further toward sender trust.
    pub history_weight: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            override_threshold: 3,
            trust_prior: 0.5,
            history_weight: 5.0,
        }
    }
}

/// Adjusts rule assignments using accumulated sender feedback.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveScorer {
    policy: ScoringPolicy,
}

impl AdaptiveScorer {
    /// Creates a scorer with the given policy.
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    /// Returns the active policy.
    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Produces a feedback-adjusted assignment from a rule assignment and the
    /// sender's profile.
    ///
    /// Confidence is a linear blend of rule confidence and sender trust,
    /// weighted by history size and clamped to [0, 1]. When the profile holds
    /// enough corrections away from the rule tag toward one alternate, the
    /// alternate tag wins regardless of rule confidence.
    pub fn adjust(&self, assignment: &TagAssignment, profile: &SenderProfile) -> TagAssignment {
        let trust = profile.trust(self.policy.trust_prior);
        let n = f64::from(profile.history_len());
        let weight = n / (n + self.policy.history_weight);
        let confidence =
            ((1.0 - weight) * assignment.confidence + weight * trust).clamp(0.0, 1.0);

        let mut adjusted = assignment.clone();
        adjusted.confidence = confidence;
        adjusted.source = AssignmentSource::FeedbackAdjusted;
        adjusted.updated_at = Utc::now();
        adjusted.reasoning.push(format!(
            "sender trust {trust:.2} over {} feedback events",
            profile.history_len()
        ));

        if let Some((tag, stat)) =
            profile.override_candidate(assignment.tag, self.policy.override_threshold)
        {
            adjusted.reasoning.push(format!(
                "overridden to {tag} after {} corrections from {}",
                stat.count, assignment.tag
            ));
            adjusted.tag = tag;
        }

        adjusted
    }
}
