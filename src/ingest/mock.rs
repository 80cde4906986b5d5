//! Built-in sample inbox.
//!
//! Used for demos and CLI runs without a live message source.

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::domain::{Message, MessageId};

use super::{IngestResult, MessageSource};

fn message(
    id: &str,
    sender: &str,
    subject: &str,
    body: &str,
    age: Duration,
    label: Option<&str>,
) -> Message {
    Message {
        id: MessageId::from(id),
        sender: sender.to_string(),
        subject: subject.to_string(),
        body: body.to_string(),
        date: Utc::now() - age,
        label: label.map(str::to_string),
    }
}

/// A realistic sample inbox covering every priority tag.
pub fn sample_messages() -> Vec<Message> {
    vec![
        message(
            "email-001",
            "ops-team@company.com",
            "URGENT: Server Downtime Scheduled for Tonight",
            "We have scheduled emergency server maintenance tonight from 11 PM to 3 AM. \
             Please complete all critical tasks by 10 PM and contact me immediately if \
             you have concerns.",
            Duration::hours(2),
            Some("work"),
        ),
        message(
            "email-002",
            "sarah.chen@company.com",
            "Weekly Team Meeting - Tomorrow 2 PM",
            "Reminder about our weekly team meeting tomorrow at 2 PM in Conference Room B. \
             Agenda: project status updates, Q4 planning, new team member introduction.",
            Duration::hours(5),
            Some("meeting"),
        ),
        message(
            "email-003",
            "billing@vendor.com",
            "Invoice #12345 - Payment Due in 3 Days",
            "This is a friendly reminder that invoice #12345 for $2,450.00 is due in 3 days. \
             Please process payment to avoid late fees.",
            Duration::hours(8),
            Some("financial"),
        ),
        message(
            "email-004",
            "deals@onlinestore.com",
            "50% OFF Everything - Limited Time!",
            "Mega sale alert! Get 50% off everything in our store this weekend only. \
             Free shipping on orders over $50. Use code SAVE50. Shop now before items \
             sell out!",
            Duration::hours(12),
            Some("promotional"),
        ),
        message(
            "email-005",
            "john.colleague@company.com",
            "Re: Project Alpha - Need Your Input ASAP",
            "I reviewed the documents and have a few questions. This is quite urgent as \
             the client meeting is tomorrow. Please get back to me ASAP.",
            Duration::hours(1),
            Some("urgent"),
        ),
        message(
            "email-006",
            "newsletter@techblog.com",
            "Your Monthly Newsletter - Tech Trends",
            "This month in technology: AI developments in healthcare, new smartphone \
             releases, and our favorite engineering reads. Read the full digest on our \
             website. Unsubscribe at any time.",
            Duration::days(1),
            Some("newsletter"),
        ),
        message(
            "email-007",
            "client@importantcorp.com",
            "Lunch meeting today - 12:30 PM",
            "Looking forward to our lunch meeting today at 12:30 PM. I'll bring the \
             contract documents for review. Please confirm if you're still available.",
            Duration::minutes(30),
            Some("meeting"),
        ),
        message(
            "email-008",
            "security@company.com",
            "Password Reset Required",
            "We detected unusual login activity on your account. As a precaution, please \
             reset your password immediately. If you did not request this, contact IT \
             support.",
            Duration::minutes(45),
            Some("security"),
        ),
        message(
            "email-009",
            "design-team@company.com",
            "Project Screenshots for Review",
            "I've attached the latest screenshots of the new dashboard layout. Please \
             review them and share your thoughts by tomorrow.",
            Duration::hours(1),
            Some("work"),
        ),
    ]
}

/// Message source backed by the built-in sample inbox.
#[derive(Debug, Clone, Default)]
pub struct MockSource;

#[async_trait]
impl MessageSource for MockSource {
    async fn fetch_messages(&self, limit: usize) -> IngestResult<Vec<Message>> {
        let mut messages = sample_messages();
        messages.sort_by(|a, b| b.date.cmp(&a.date));
        messages.truncate(limit);
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_ids_are_unique_and_non_empty() {
        let messages = sample_messages();
        let mut ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();

        assert_eq!(ids.len(), before);
        assert!(ids.iter().all(|id| !id.is_empty()));
    }

    #[tokio::test]
    async fn fetch_returns_newest_first() {
        let source = MockSource;
        let messages = source.fetch_messages(100).await.unwrap();

        assert_eq!(messages.len(), sample_messages().len());
        for pair in messages.windows(2) {
            assert!(pair[0].date >= pair[1].date);
        }
    }

    #[tokio::test]
    async fn fetch_honors_limit() {
        let source = MockSource;
        let messages = source.fetch_messages(3).await.unwrap();
        assert_eq!(messages.len(), 3);
    }
}
