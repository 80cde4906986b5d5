//! Message domain types.
//!
//! Represents a single normalized inbox item as produced by the message
//! ingestion layer. Messages are immutable once ingested.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MessageId;

/// A normalized inbox message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier for this message.
    pub id: MessageId,
    /// Sender address (e.g., "billing@vendor.com").
    pub sender: String,
    /// Subject line.
    pub subject: String,
    /// Plain text body content.
    pub body: String,
    /// Date and time the message was sent.
    pub date: DateTime<Utc>,
    /// Optional label supplied by the source (e.g., "work").
    #[serde(default)]
    pub label: Option<String>,
}

impl Message {
    /// Returns the domain portion of the sender address, if present.
    pub fn sender_domain(&self) -> Option<&str> {
        self.sender.split_once('@').map(|(_, domain)| domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Message {
        Message {
            id: MessageId::from("email_001"),
            sender: "ops-team@company.com".to_string(),
            subject: "URGENT: Server Downtime Scheduled for Tonight".to_string(),
            body: "Please complete all critical tasks by 10 PM.".to_string(),
            date: Utc::now(),
            label: Some("work".to_string()),
        }
    }

    #[test]
    fn message_serialization() {
        let message = sample();
        let json = serde_json::to_string(&message).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.id, MessageId::from("email_001"));
        assert_eq!(deserialized.sender, "ops-team@company.com");
        assert_eq!(deserialized.label, Some("work".to_string()));
    }

    #[test]
    fn label_defaults_to_none() {
        let json = r#"{
            "id": "email_002",
            "sender": "a@b.com",
            "subject": "Hi",
            "body": "Hello",
            "date": "2024-03-12T09:00:00Z"
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert!(message.label.is_none());
    }

    #[test]
    fn sender_domain_extraction() {
        let message = sample();
        assert_eq!(message.sender_domain(), Some("company.com"));
    }

    #[test]
    fn sender_domain_missing() {
        let mut message = sample();
        message.sender = "no-at-sign".to_string();
        assert!(message.sender_domain().is_none());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let json = r#"{"id": "email_003", "subject": "No sender"}"#;
        let result: Result<Message, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
