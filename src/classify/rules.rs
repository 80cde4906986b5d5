//! The tag rule engine.
//!
//! Maps a message to one priority tag plus a reasoning trace by evaluating an
//! ordered list of keyword/sender-pattern rules. Rules are plain immutable
//! data passed into the engine, so tests can run against synthetic rule sets.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{AssignmentSource, Message, Tag, TagAssignment};

/// Confidence assigned when no rule matches.
pub const GENERAL_CONFIDENCE: f64 = 0.5;

/// A single tagging rule: match evidence for one tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRule {
    /// Tag this rule argues for.
    pub tag: Tag,
    /// Keywords matched case-insensitively against subject + body.
    pub keywords: Vec<String>,
    /// Patterns matched case-insensitively against the sender address.
    pub sender_patterns: Vec<String>,
}

/// An ordered, immutable collection of tagging rules.
///
/// Evaluation order is rule priority order: safety and urgency are checked
/// before promotional noise, so a message matching both Security and
/// Newsletter evidence is tagged Security.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<TagRule>,
}

impl RuleSet {
    /// Creates a rule set from an ordered list of rules.
    pub fn new(rules: Vec<TagRule>) -> Self {
        Self { rules }
    }

    /// Returns the rules in evaluation order.
    pub fn rules(&self) -> &[TagRule] {
        &self.rules
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        fn rule(tag: Tag, keywords: &[&str], senders: &[&str]) -> TagRule {
            TagRule {
                tag,
                keywords: keywords.iter().map(|s| (*s).to_string()).collect(),
                sender_patterns: senders.iter().map(|s| (*s).to_string()).collect(),
            }
        }

        Self::new(vec![
            rule(
                Tag::Security,
                &[
                    "security",
                    "password",
                    "login",
                    "suspicious",
                    "verify",
                    "authentication",
                ],
                &["security", "alerts"],
            ),
            rule(
                Tag::Urgent,
                &[
                    "urgent",
                    "asap",
                    "immediately",
                    "emergency",
                    "critical",
                    "deadline",
                    "overdue",
                ],
                &["boss", "manager", "director"],
            ),
            rule(
                Tag::Important,
                &[
                    "important",
                    "priority",
                    "attention required",
                    "action needed",
                    "follow up",
                ],
                &["admin", "support"],
            ),
            rule(
                Tag::Meeting,
                &[
                    "meeting",
                    "appointment",
                    "schedule",
                    "calendar",
                    "conference",
                    "zoom",
                    "invite",
                ],
                &["calendar", "scheduler", "meeting"],
            ),
            rule(
                Tag::Financial,
                &[
                    "invoice",
                    "payment",
                    "bill",
                    "receipt",
                    "transaction",
                    "refund",
                    "purchase",
                ],
                &["billing", "payments", "finance", "accounting", "paypal", "stripe"],
            ),
            rule(
                Tag::Promotional,
                &[
                    "sale",
                    "offer",
                    "discount",
                    "deal",
                    "promotion",
                    "coupon",
                    "limited time",
                ],
                &["marketing", "promo", "deals", "offers", "noreply"],
            ),
            rule(
                Tag::Newsletter,
                &["newsletter", "weekly", "monthly", "digest", "blog", "unsubscribe"],
                &["newsletter", "news", "blog", "updates", "noreply"],
            ),
        ])
    }
}

/// Deterministic keyword-based classifier.
///
/// Identical message content always produces an identical tag and confidence;
/// there is no randomness and no hidden state.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: RuleSet,
}

impl RuleEngine {
    /// Creates an engine over the given rule set.
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Classifies a message, producing a rule-sourced assignment.
    ///
    /// The first rule in priority order whose match score reaches 1 wins.
    /// Match score is the count of matched keywords plus a single bonus when
    /// the sender matches any of the rule's sender patterns. An empty subject
    /// and body simply yield zero matches and fall through to General.
    pub fn classify(&self, message: &Message) -> TagAssignment {
        let text = format!(
            "{} {}",
            message.subject.to_lowercase(),
            message.body.to_lowercase()
        );
        let sender = message.sender.to_lowercase();

        for rule in self.rules.rules() {
            let matched_keywords: Vec<&str> = rule
                .keywords
                .iter()
                .map(String::as_str)
                .filter(|k| !k.is_empty() && text.contains(&k.to_lowercase()))
                .collect();
            let matched_senders: Vec<&str> = rule
                .sender_patterns
                .iter()
                .map(String::as_str)
                .filter(|p| !p.is_empty() && sender.contains(&p.to_lowercase()))
                .collect();

            let score = matched_keywords.len() + usize::from(!matched_senders.is_empty());
            if score == 0 {
                continue;
            }

            let mut reasoning: Vec<String> = matched_keywords
                .iter()
                .map(|k| format!("keyword \"{k}\" matched"))
                .collect();
            reasoning.extend(
                matched_senders
                    .iter()
                    .map(|p| format!("sender pattern \"{p}\" matched")),
            );

            return TagAssignment {
                message_id: message.id.clone(),
                sender: message.sender.clone(),
                tag: rule.tag,
                confidence: confidence_for(score),
                reasoning,
                source: AssignmentSource::Rule,
                updated_at: Utc::now(),
            };
        }

        TagAssignment {
            message_id: message.id.clone(),
            sender: message.sender.clone(),
            tag: Tag::General,
            confidence: GENERAL_CONFIDENCE,
            reasoning: vec!["no rule matched; defaulted to general".to_string()],
            source: AssignmentSource::Rule,
            updated_at: Utc::now(),
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(RuleSet::default())
    }
}

/// Normalizes a raw match score into a confidence in [0, 1].
fn confidence_for(score: usize) -> f64 {
    (0.4 + 0.2 * score as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageId;
    use pretty_assertions::assert_eq;

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

    #[test]
    fn urgent_deadline_message() {
        let engine = RuleEngine::default();
        let msg = message(
            "m1",
            "manager@company.com",
            "Urgent: Project Deadline",
            "complete this project by tomorrow",
        );

        let assignment = engine.classify(&msg);
        assert_eq!(assignment.tag, Tag::Urgent);
        assert!(assignment.confidence > 0.5);
        assert!(assignment.reasoning.iter().any(|r| r.contains("urgent")));
        assert!(assignment.reasoning.iter().any(|r| r.contains("deadline")));
        assert_eq!(assignment.source, AssignmentSource::Rule);
    }

    #[test]
    fn newsletter_digest_without_urgency() {
        let engine = RuleEngine::default();
        let msg = message(
            "m2",
            "digest@techblog.com",
            "Weekly Newsletter Digest",
            "This week in technology news.",
        );

        let assignment = engine.classify(&msg);
        assert_eq!(assignment.tag, Tag::Newsletter);
    }

    #[test]
    fn empty_message_falls_through_to_general() {
        let engine = RuleEngine::default();
        let msg = message("m3", "someone@nowhere.example", "", "");

        let assignment = engine.classify(&msg);
        assert_eq!(assignment.tag, Tag::General);
        assert!((assignment.confidence - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn classification_is_deterministic() {
        let engine = RuleEngine::default();
        let msg = message(
            "m4",
            "billing@vendor.com",
            "Invoice #12345 - Payment Due",
            "Please process payment to avoid late fees.",
        );

        let first = engine.classify(&msg);
        let second = engine.classify(&msg);
        assert_eq!(first.tag, second.tag);
        assert_eq!(first.confidence, second.confidence);
        assert_eq!(first.reasoning, second.reasoning);
    }

    #[test]
    fn security_outranks_newsletter() {
        let engine = RuleEngine::default();
        let msg = message(
            "m5",
            "alerts@service.com",
            "Weekly digest: verify your password",
            "Suspicious login attempt detected.",
        );

        let assignment = engine.classify(&msg);
        assert_eq!(assignment.tag, Tag::Security);
    }

    #[test]
    fn sender_bonus_alone_is_enough() {
        let engine = RuleEngine::default();
        let msg = message("m6", "noreply@shop.example", "hello", "plain text");

        let assignment = engine.classify(&msg);
        assert_eq!(assignment.tag, Tag::Promotional);
        assert!(assignment
            .reasoning
            .iter()
            .any(|r| r.contains("sender pattern")));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let engine = RuleEngine::default();
        let msg = message("m7", "A@B.COM", "MEETING TOMORROW", "SEE CALENDAR");

        let assignment = engine.classify(&msg);
        assert_eq!(assignment.tag, Tag::Meeting);
    }

    #[test]
    fn confidence_scales_with_matches_and_caps_at_one() {
        assert!((confidence_for(1) - 0.6).abs() < 1e-9);
        assert!((confidence_for(2) - 0.8).abs() < 1e-9);
        assert!((confidence_for(3) - 1.0).abs() < 1e-9);
        assert!((confidence_for(10) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn synthetic_rule_set() {
        let rules = RuleSet::new(vec![TagRule {
            tag: Tag::Financial,
            keywords: vec!["wire".to_string()],
            sender_patterns: vec![],
        }]);
        let engine = RuleEngine::new(rules);

        let hit = engine.classify(&message("m8", "x@y.com", "wire transfer", ""));
        assert_eq!(hit.tag, Tag::Financial);

        let miss = engine.classify(&message("m9", "x@y.com", "lunch?", ""));
        assert_eq!(miss.tag, Tag::General);
    }

    #[test]
    fn rule_set_deserializes_from_json() {
        let json = r#"{
            "rules": [
                {"tag": "security", "keywords": ["2fa"], "sender_patterns": []}
            ]
        }"#;
        let rules: RuleSet = serde_json::from_str(json).unwrap();
        assert_eq!(rules.rules().len(), 1);
        assert_eq!(rules.rules()[0].tag, Tag::Security);
    }
}
