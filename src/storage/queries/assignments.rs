//! Tag assignment queries.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::{AssignmentSource, MessageId, Tag, TagAssignment};

/// Inserts or replaces the assignment for a message.
pub fn upsert_assignment(conn: &Connection, assignment: &TagAssignment) -> Result<()> {
    let reasoning_json = serde_json::to_string(&assignment.reasoning).unwrap_or_default();

    conn.execute(
        "INSERT OR REPLACE INTO tag_assignments
         (message_id, sender, tag, confidence, reasoning, source, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            assignment.message_id.as_str(),
            assignment.sender,
            assignment.tag.as_str(),
            assignment.confidence,
            reasoning_json,
            source_to_str(assignment.source),
            assignment.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Gets the assignment for a message.
pub fn get_by_message(conn: &Connection, message_id: &str) -> Result<Option<TagAssignment>> {
    conn.query_row(
        "SELECT message_id, sender, tag, confidence, reasoning, source, updated_at
         FROM tag_assignments WHERE message_id = ?1",
        params![message_id],
        row_to_assignment,
    )
    .optional()
}

/// Gets all assignments, most recently updated first.
pub fn list_all(conn: &Connection) -> Result<Vec<TagAssignment>> {
    let mut stmt = conn.prepare(
        "SELECT message_id, sender, tag, confidence, reasoning, source, updated_at
         FROM tag_assignments ORDER BY updated_at DESC",
    )?;

    let assignments = stmt.query_map([], row_to_assignment)?;
    assignments.collect()
}

/// Counts stored assignments.
pub fn count(conn: &Connection) -> Result<u32> {
    conn.query_row("SELECT COUNT(*) FROM tag_assignments", [], |row| row.get(0))
}

fn source_to_str(source: AssignmentSource) -> &'static str {
    match source {
        AssignmentSource::Rule => "rule",
        AssignmentSource::FeedbackAdjusted => "feedback_adjusted",
    }
}

fn str_to_source(s: &str) -> AssignmentSource {
    match s {
        "feedback_adjusted" => AssignmentSource::FeedbackAdjusted,
        _ => AssignmentSource::Rule,
    }
}

fn row_to_assignment(row: &rusqlite::Row) -> Result<TagAssignment> {
    let tag_str: String = row.get(2)?;
    let reasoning_json: String = row.get(4)?;
    let source_str: String = row.get(5)?;
    let updated_at_str: String = row.get(6)?;

    Ok(TagAssignment {
        message_id: MessageId::from(row.get::<_, String>(0)?),
        sender: row.get(1)?,
        tag: Tag::parse(&tag_str).unwrap_or(Tag::General),
        confidence: row.get(3)?,
        reasoning: serde_json::from_str(&reasoning_json).unwrap_or_default(),
        source: str_to_source(&source_str),
        updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
