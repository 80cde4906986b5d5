//! SQLite persistence.
//!
//! This module provides the storage layer for the triage engine:
//!
//! - SQLite database for tag assignments and the feedback log
//! - Async-safe database operations via tokio::task::spawn_blocking
//! - Implementations of the service storage traits

mod database;
pub mod queries;
mod schema;

pub use database::{Database, DatabaseError, Result};

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{FeedbackRecord, MessageId, TagAssignment};
use crate::services::{
    AssignmentStore, ClassifyError, ClassifyResult, FeedbackError, FeedbackResult, FeedbackStore,
};

/// Storage layer backed by SQLite.
///
/// This is the main entry point for storage operations; services consume it
/// through the [`AssignmentStore`] and [`FeedbackStore`] traits.
#[derive(Debug, Clone)]
pub struct StorageLayer {
    db: Database,
}

impl StorageLayer {
    /// Creates a storage layer with the given database path.
    pub async fn new(db_path: impl AsRef<std::path::Path>) -> Result<Self> {
        let db = Database::open(db_path).await?;
        Ok(Self { db })
    }

    /// Creates a storage layer with an in-memory database for testing.
    pub async fn in_memory() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self { db })
    }

    /// Returns a reference to the database.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Wraps the storage layer in an Arc for shared ownership.
    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl AssignmentStore for StorageLayer {
    async fn save_assignment(&self, assignment: &TagAssignment) -> ClassifyResult<()> {
        let assignment = assignment.clone();
        self.db
            .with_conn(move |conn| Ok(queries::assignments::upsert_assignment(conn, &assignment)?))
            .await
            .map_err(|err| ClassifyError::Storage(err.to_string()))
    }

    async fn get_assignment(&self, id: &MessageId) -> ClassifyResult<Option<TagAssignment>> {
        let id = id.as_str().to_string();
        self.db
            .with_conn(move |conn| Ok(queries::assignments::get_by_message(conn, &id)?))
            .await
            .map_err(|err| ClassifyError::Storage(err.to_string()))
    }

    async fn list_assignments(&self) -> ClassifyResult<Vec<TagAssignment>> {
        self.db
            .with_conn(|conn| Ok(queries::assignments::list_all(conn)?))
            .await
            .map_err(|err| ClassifyError::Storage(err.to_string()))
    }

    async fn count_assignments(&self) -> ClassifyResult<u32> {
        self.db
            .with_conn(|conn| Ok(queries::assignments::count(conn)?))
            .await
            .map_err(|err| ClassifyError::Storage(err.to_string()))
    }
}

#[async_trait]
impl FeedbackStore for StorageLayer {
    async fn append_record(&self, record: &FeedbackRecord) -> FeedbackResult<()> {
        let record = record.clone();
        self.db
            .with_conn(move |conn| Ok(queries::feedback::insert_record(conn, &record)?))
            .await
            .map_err(|err| FeedbackError::Storage(err.to_string()))
    }

    async fn records_for_sender(&self, sender: &str) -> FeedbackResult<Vec<FeedbackRecord>> {
        let sender = sender.to_string();
        self.db
            .with_conn(move |conn| Ok(queries::feedback::records_for_sender(conn, &sender)?))
            .await
            .map_err(|err| FeedbackError::Storage(err.to_string()))
    }

    async fn all_records(&self) -> FeedbackResult<Vec<FeedbackRecord>> {
        self.db
            .with_conn(|conn| Ok(queries::feedback::all_records(conn)?))
            .await
            .map_err(|err| FeedbackError::Storage(err.to_string()))
    }

    async fn count_records(&self) -> FeedbackResult<u32> {
        self.db
            .with_conn(|conn| Ok(queries::feedback::count_records(conn)?))
            .await
            .map_err(|err| FeedbackError::Storage(err.to_string()))
    }

    async fn count_senders(&self) -> FeedbackResult<u32> {
        self.db
            .with_conn(|conn| Ok(queries::feedback::count_senders(conn)?))
            .await
            .map_err(|err| FeedbackError::Storage(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssignmentSource, Tag};
    use chrono::Utc;

    #[tokio::test]
    async fn storage_layer_in_memory() {
        let storage = StorageLayer::in_memory().await.unwrap();

        let count: i64 = storage
            .db()
            .with_conn(|conn| {
                let count = conn.query_row("SELECT COUNT(*) FROM tag_assignments", [], |row| {
                    row.get(0)
                })?;
                Ok(count)
            })
            .await
            .unwrap();

        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn assignment_round_trip_through_trait() {
        let storage = StorageLayer::in_memory().await.unwrap();

        let assignment = TagAssignment {
            message_id: MessageId::from("m1"),
            sender: "ops@company.com".to_string(),
            tag: Tag::Urgent,
            confidence: 0.8,
            reasoning: vec!["keyword \"urgent\" matched".to_string()],
            source: AssignmentSource::Rule,
            updated_at: Utc::now(),
        };
        storage.save_assignment(&assignment).await.unwrap();

        let loaded = storage
            .get_assignment(&MessageId::from("m1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.tag, Tag::Urgent);
        assert_eq!(loaded.sender, "ops@company.com");
        assert_eq!(storage.count_assignments().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn feedback_round_trip_through_trait() {
        let storage = StorageLayer::in_memory().await.unwrap();

        let record = FeedbackRecord {
            id: "fb-1".to_string(),
            message_id: MessageId::from("m1"),
            sender: "ops@company.com".to_string(),
            original_tag: Tag::Urgent,
            corrected_tag: Some(Tag::Meeting),
            summary_helpful: None,
            created_at: Utc::now(),
        };
        storage.append_record(&record).await.unwrap();

        let records = storage.records_for_sender("ops@company.com").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].corrected_tag, Some(Tag::Meeting));
        assert_eq!(storage.count_records().await.unwrap(), 1);
        assert_eq!(storage.count_senders().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn storage_layer_into_arc() {
        let storage = StorageLayer::in_memory().await.unwrap().into_arc();
        assert_eq!(storage.count_assignments().await.unwrap(), 0);
    }
}
