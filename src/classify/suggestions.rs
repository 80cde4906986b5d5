//! The suggestion mapper.
//!
//! A pure static mapping from a final tag to an ordered list of recommended
//! next actions. No side effects and no learning; usage tracking belongs to
//! an external analytics concern.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::Tag;

/// A recommended next action for a tagged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Draft a short reply right away.
    PrepareQuickReply,
    /// Set a reminder to deal with this message.
    SetReminder,
    /// Flag the message for later follow up.
    FlagForFollowUp,
    /// Add the event to the calendar.
    AddToCalendar,
    /// Check the payment details before acting.
    VerifyPaymentDetails,
    /// Review recent account activity.
    ReviewAccountActivity,
    /// Change the account password.
    UpdatePassword,
    /// Unsubscribe from the sender.
    Unsubscribe,
    /// Skip this message for now.
    IgnoreForNow,
    /// Queue the message for casual reading.
    ReadLater,
}

impl fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SuggestedAction::PrepareQuickReply => "Prepare quick reply",
            SuggestedAction::SetReminder => "Set reminder",
            SuggestedAction::FlagForFollowUp => "Flag for follow up",
            SuggestedAction::AddToCalendar => "Add to calendar",
            SuggestedAction::VerifyPaymentDetails => "Verify payment details",
            SuggestedAction::ReviewAccountActivity => "Review account activity",
            SuggestedAction::UpdatePassword => "Update password",
            SuggestedAction::Unsubscribe => "Unsubscribe",
            SuggestedAction::IgnoreForNow => "Ignore for now",
            SuggestedAction::ReadLater => "Read later",
        };
        f.write_str(text)
    }
}

/// Returns the ordered suggested actions for a tag.
pub fn suggested_actions(tag: Tag) -> Vec<SuggestedAction> {
    use SuggestedAction::*;
    match tag {
        Tag::Urgent => vec![PrepareQuickReply, SetReminder],
        Tag::Important => vec![FlagForFollowUp, SetReminder],
        Tag::Meeting => vec![AddToCalendar, PrepareQuickReply],
        Tag::Financial => vec![VerifyPaymentDetails, SetReminder],
        Tag::Promotional => vec![IgnoreForNow, Unsubscribe],
        Tag::Newsletter => vec![ReadLater, Unsubscribe],
        Tag::Security => vec![ReviewAccountActivity, UpdatePassword],
        Tag::General => vec![ReadLater],
    }
}
