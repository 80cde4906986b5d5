//! SQL schema definitions as const strings.

/// SQL to create the tag_assignments table.
///
/// Holds the rule-sourced baseline per message; feedback adjustments are
/// always re-derived from the feedback log, never persisted as truth.
pub const CREATE_TAG_ASSIGNMENTS: &str = r#"
CREATE TABLE IF NOT EXISTS tag_assignments (
    message_id TEXT PRIMARY KEY,
    sender TEXT NOT NULL,
    tag TEXT NOT NULL,
    confidence REAL NOT NULL,
    reasoning TEXT NOT NULL,
    source TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// SQL to create tag_assignments indexes.
pub const CREATE_ASSIGNMENT_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_assignments_sender ON tag_assignments(sender);
CREATE INDEX IF NOT EXISTS idx_assignments_tag ON tag_assignments(tag)
"#;

/// SQL to create the feedback_records table. Append-only.
pub const CREATE_FEEDBACK_RECORDS: &str = r#"
CREATE TABLE IF NOT EXISTS feedback_records (
    id TEXT PRIMARY KEY,
    message_id TEXT NOT NULL,
    sender TEXT NOT NULL,
    original_tag TEXT NOT NULL,
    corrected_tag TEXT,
    summary_helpful INTEGER,
    created_at TEXT NOT NULL
)
"#;

/// SQL to create feedback_records indexes.
pub const CREATE_FEEDBACK_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_feedback_sender ON feedback_records(sender);
CREATE INDEX IF NOT EXISTS idx_feedback_message ON feedback_records(message_id)
"#;

/// Returns all schema creation statements in order.
pub fn all_migrations() -> Vec<&'static str> {
    vec![
        CREATE_TAG_ASSIGNMENTS,
        CREATE_ASSIGNMENT_INDEXES,
        CREATE_FEEDBACK_RECORDS,
        CREATE_FEEDBACK_INDEXES,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_migrations_returns_statements() {
        let migrations = all_migrations();
        assert_eq!(migrations.len(), 4);
    }

    #[test]
    fn tables_use_if_not_exists() {
        assert!(CREATE_TAG_ASSIGNMENTS.contains("IF NOT EXISTS"));
        assert!(CREATE_FEEDBACK_RECORDS.contains("IF NOT EXISTS"));
    }

    #[test]
    fn feedback_records_have_no_update_path() {
        // Append-only: the schema carries no updated_at column.
        assert!(!CREATE_FEEDBACK_RECORDS.contains("updated_at"));
    }
}
