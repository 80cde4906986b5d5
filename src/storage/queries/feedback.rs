//! Feedback record queries.
//!
//! The feedback log is append-only: there are no update or delete paths.
//! Rows with tag names this build does not recognize are skipped during
//! reads and logged as data-quality warnings, never treated as fatal.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::{FeedbackRecord, MessageId, Tag};

/// Appends a feedback record.
pub fn insert_record(conn: &Connection, record: &FeedbackRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO feedback_records
         (id, message_id, sender, original_tag, corrected_tag, summary_helpful, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            record.id,
            record.message_id.as_str(),
            record.sender,
            record.original_tag.as_str(),
            record.corrected_tag.map(|t| t.as_str()),
            record.summary_helpful,
            record.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Gets all records for a sender, oldest first.
pub fn records_for_sender(conn: &Connection, sender: &str) -> Result<Vec<FeedbackRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, message_id, sender, original_tag, corrected_tag, summary_helpful, created_at
         FROM feedback_records WHERE sender = ?1 ORDER BY created_at ASC",
    )?;

    let rows = stmt.query_map(params![sender], row_to_raw)?;
    collect_records(rows)
}

/// Gets all records, oldest first.
pub fn all_records(conn: &Connection) -> Result<Vec<FeedbackRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, message_id, sender, original_tag, corrected_tag, summary_helpful, created_at
         FROM feedback_records ORDER BY created_at ASC",
    )?;

    let rows = stmt.query_map([], row_to_raw)?;
    collect_records(rows)
}

/// Counts stored feedback records.
pub fn count_records(conn: &Connection) -> Result<u32> {
    conn.query_row("SELECT COUNT(*) FROM feedback_records", [], |row| row.get(0))
}

/// Counts distinct senders with at least one feedback record.
pub fn count_senders(conn: &Connection) -> Result<u32> {
    conn.query_row(
        "SELECT COUNT(DISTINCT sender) FROM feedback_records",
        [],
        |row| row.get(0),
    )
}

/// A feedback row before tag names are validated.
struct RawRecord {
    id: String,
    message_id: String,
    sender: String,
    original_tag: String,
    corrected_tag: Option<String>,
    summary_helpful: Option<bool>,
    created_at: String,
}

fn row_to_raw(row: &rusqlite::Row) -> Result<RawRecord> {
    Ok(RawRecord {
        id: row.get(0)?,
        message_id: row.get(1)?,
        sender: row.get(2)?,
        original_tag: row.get(3)?,
        corrected_tag: row.get(4)?,
        summary_helpful: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn collect_records<I>(rows: I) -> Result<Vec<FeedbackRecord>>
where
    I: Iterator<Item = Result<RawRecord>>,
{
    let mut records = Vec::new();
    for raw in rows {
        let raw = raw?;
        if let Some(record) = validate(raw) {
            records.push(record);
        }
    }
    Ok(records)
}

/// Converts a raw row, skipping rows whose tag names are unknown.
fn validate(raw: RawRecord) -> Option<FeedbackRecord> {
    let original_tag = match Tag::parse(&raw.original_tag) {
        Some(tag) => tag,
        None => {
            tracing::warn!(
                record = %raw.id,
                tag = %raw.original_tag,
                "skipping feedback record with unknown original tag"
            );
            return None;
        }
    };

    let corrected_tag = match raw.corrected_tag {
        Some(ref s) => match Tag::parse(s) {
            Some(tag) => Some(tag),
            None => {
                tracing::warn!(
                    record = %raw.id,
                    tag = %s,
                    "skipping feedback record with unknown corrected tag"
                );
                return None;
            }
        },
        None => None,
    };

    Some(FeedbackRecord {
        id: raw.id,
        message_id: MessageId::from(raw.message_id),
        sender: raw.sender,
        original_tag,
        corrected_tag,
        summary_helpful: raw.summary_helpful,
        created_at: DateTime::parse_from_rfc3339(&raw.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
