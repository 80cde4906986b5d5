//! JSON inbox documents.
//!
//! An inbox document is a JSON array of message objects. Entries that fail to
//! deserialize are rejected individually so one bad entry never sinks the
//! batch.

use serde_json::Value;

use crate::domain::Message;

use super::{IngestError, IngestResult};

/// An entry that could not be turned into a message.
#[derive(Debug, Clone)]
pub struct RejectedEntry {
    /// Position in the source array.
    pub index: usize,
    /// Message id if one was present.
    pub id: Option<String>,
    /// Why the entry was rejected.
    pub reason: String,
}

/// Result of parsing an inbox document.
#[derive(Debug, Default)]
pub struct InboxBatch {
    pub messages: Vec<Message>,
    pub rejected: Vec<RejectedEntry>,
}

impl InboxBatch {
    /// True when every entry parsed cleanly.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Parses an inbox document, collecting per-entry failures.
///
/// Fails only when the document itself is not a JSON array; individual
/// entries that are malformed or carry an empty id land in `rejected` with a
/// reason, and parsing continues.
pub fn parse_inbox_json(raw: &str) -> IngestResult<InboxBatch> {
    let document: Value =
        serde_json::from_str(raw).map_err(|err| IngestError::Malformed(err.to_string()))?;

    let entries = document
        .as_array()
        .ok_or_else(|| IngestError::Malformed("expected a top-level JSON array".to_string()))?;

    let mut batch = InboxBatch::default();
    for (index, entry) in entries.iter().enumerate() {
        let id = entry
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string);

        match serde_json::from_value::<Message>(entry.clone()) {
            Ok(message) if message.id.is_empty() => {
                tracing::warn!(index, "rejecting inbox entry with empty id");
                batch.rejected.push(RejectedEntry {
                    index,
                    id,
                    reason: "empty message id".to_string(),
                });
            }
            Ok(message) => batch.messages.push(message),
            Err(err) => {
                tracing::warn!(index, error = %err, "rejecting malformed inbox entry");
                batch.rejected.push(RejectedEntry {
                    index,
                    id,
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(batch)
}
