//! Priority tag types.
//!
//! A message carries exactly one [`Tag`] at any time, recorded in a
//! [`TagAssignment`] together with the confidence and reasoning trace that
//! produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::MessageId;

/// Priority category assigned to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    /// Requires immediate attention.
    Urgent,
    /// Needs attention but is not time-critical.
    Important,
    /// Scheduling, invites, calls.
    Meeting,
    /// Invoices, payments, receipts.
    Financial,
    /// Marketing and sales material.
    Promotional,
    /// Subscriptions and digests.
    Newsletter,
    /// Account and authentication notices.
    Security,
    /// Fallback when no rule matches.
    General,
}

impl Tag {
    /// All tags in rule priority order: safety and urgency outrank noise.
    pub const ALL: [Tag; 8] = [
        Tag::Security,
        Tag::Urgent,
        Tag::Important,
        Tag::Meeting,
        Tag::Financial,
        Tag::Promotional,
        Tag::Newsletter,
        Tag::General,
    ];

    /// Parses a tag from its name, case-insensitively.
    ///
    /// Accepts both the serialized lowercase form and the uppercase form
    /// found in legacy feedback exports. Returns `None` for unknown names.
    pub fn parse(s: &str) -> Option<Tag> {
        match s.to_ascii_lowercase().as_str() {
            "urgent" => Some(Tag::Urgent),
            "important" => Some(Tag::Important),
            "meeting" => Some(Tag::Meeting),
            "financial" => Some(Tag::Financial),
            "promotional" => Some(Tag::Promotional),
            "newsletter" => Some(Tag::Newsletter),
            "security" => Some(Tag::Security),
            "general" => Some(Tag::General),
            _ => None,
        }
    }

    /// Returns the canonical lowercase name of this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Urgent => "urgent",
            Tag::Important => "important",
            Tag::Meeting => "meeting",
            Tag::Financial => "financial",
            Tag::Promotional => "promotional",
            Tag::Newsletter => "newsletter",
            Tag::Security => "security",
            Tag::General => "general",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a tag assignment was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentSource {
    /// Produced by the rule engine alone.
    Rule,
    /// Adjusted using accumulated sender feedback.
    FeedbackAdjusted,
}

/// The tag currently assigned to a message.
///
/// The rule engine produces assignments with source [`AssignmentSource::Rule`];
/// the adaptive scorer rewrites tag, confidence, and source using the sender's
/// feedback history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagAssignment {
    /// Message this assignment belongs to.
    pub message_id: MessageId,
    /// Sender of the message, kept for feedback lookups.
    pub sender: String,
    /// Assigned priority tag.
    pub tag: Tag,
    /// Certainty of the assignment, in [0, 1].
    pub confidence: f64,
    /// Human-readable trace of every matched keyword and pattern.
    pub reasoning: Vec<String>,
    /// How this assignment was produced.
    pub source: AssignmentSource,
    /// When this assignment was last produced or adjusted.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_serialization() {
        assert_eq!(serde_json::to_string(&Tag::Urgent).unwrap(), "\"urgent\"");
        assert_eq!(
            serde_json::to_string(&Tag::Newsletter).unwrap(),
            "\"newsletter\""
        );

        let tag: Tag = serde_json::from_str("\"security\"").unwrap();
        assert_eq!(tag, Tag::Security);
    }

    #[test]
    fn tag_parse_accepts_uppercase() {
        assert_eq!(Tag::parse("URGENT"), Some(Tag::Urgent));
        assert_eq!(Tag::parse("Meeting"), Some(Tag::Meeting));
        assert_eq!(Tag::parse("general"), Some(Tag::General));
    }

    #[test]
    fn tag_parse_rejects_unknown() {
        assert_eq!(Tag::parse("spam"), None);
        assert_eq!(Tag::parse(""), None);
    }

    #[test]
    fn tag_display_roundtrip() {
        for tag in Tag::ALL {
            assert_eq!(Tag::parse(tag.as_str()), Some(tag));
        }
    }

    #[test]
    fn priority_order_puts_safety_first() {
        assert_eq!(Tag::ALL[0], Tag::Security);
        assert_eq!(Tag::ALL[1], Tag::Urgent);
        assert_eq!(Tag::ALL[7], Tag::General);
    }

    #[test]
    fn assignment_source_serialization() {
        assert_eq!(
            serde_json::to_string(&AssignmentSource::FeedbackAdjusted).unwrap(),
            "\"feedback_adjusted\""
        );
        let source: AssignmentSource = serde_json::from_str("\"rule\"").unwrap();
        assert_eq!(source, AssignmentSource::Rule);
    }

    #[test]
    fn assignment_serialization() {
        let assignment = TagAssignment {
            message_id: MessageId::from("email_001"),
            sender: "billing@vendor.com".to_string(),
            tag: Tag::Financial,
            confidence: 0.8,
            reasoning: vec!["keyword \"invoice\" matched".to_string()],
            source: AssignmentSource::Rule,
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&assignment).unwrap();
        let deserialized: TagAssignment = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.tag, Tag::Financial);
        assert_eq!(deserialized.source, AssignmentSource::Rule);
        assert_eq!(deserialized.reasoning.len(), 1);
    }
}
