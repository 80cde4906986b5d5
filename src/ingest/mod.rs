//! Message ingestion.
//!
//! Messages enter the engine either from a JSON inbox document or from a
//! [`MessageSource`] implementation. The bundled [`MockSource`] provides a
//! realistic sample inbox for demos and tests; a live fetcher would implement
//! the same trait.

mod json;
mod mock;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Message;

pub use json::{parse_inbox_json, InboxBatch, RejectedEntry};
pub use mock::{sample_messages, MockSource};

/// Errors that can occur during ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Document is not a JSON array of message objects.
    #[error("malformed inbox document: {0}")]
    Malformed(String),

    /// I/O error reading a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source-specific fetch failure.
    #[error("fetch failed: {0}")]
    Fetch(String),
}

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// A producer of normalized inbox messages.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Fetches up to `limit` messages, newest first.
    async fn fetch_messages(&self, limit: usize) -> IngestResult<Vec<Message>>;
}
