//! Core identifier types for domain entities.
//!
//! Newtype wrappers provide type safety for entity identifiers, preventing
//! accidental mixing of a message id with arbitrary strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an inbox message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identifier is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_id_display() {
        let id = MessageId("email_001".to_string());
        assert_eq!(id.to_string(), "email_001");
    }

    #[test]
    fn message_id_equality() {
        let id1 = MessageId::from("email_001");
        let id2 = MessageId::from("email_001".to_string());
        assert_eq!(id1, id2);
    }

    #[test]
    fn message_id_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(MessageId::from("email_001"));
        assert!(set.contains(&MessageId::from("email_001")));
    }

    #[test]
    fn message_id_empty_check() {
        assert!(MessageId::from("").is_empty());
        assert!(!MessageId::from("x").is_empty());
    }
}
