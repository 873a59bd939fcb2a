use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::MessageSource;
use crate::errors::CoreError;

/// Display name shown for contact-form submitters who left the name blank.
pub const UNKNOWN_SENDER: &str = "Unknown";
/// Receiver display for every contact-form submission.
pub const EXTERNAL_RECEIVER: &str = "Admin";
/// Subject shown for contact-form submissions without one.
pub const DEFAULT_EXTERNAL_SUBJECT: &str = "Contact Us";

/// A message in the application's own thread store (`contact` table).
///
/// `is_read` and `is_starred` are the only mutable fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InternalMessage {
    pub id: String,
    pub sender_email: String,
    pub receiver_email: String,
    pub sender_display: Option<String>,
    pub receiver_display: Option<String>,
    pub subject_ref: Option<String>,
    /// Subject text joined from `subjects`.
    pub subject: Option<String>,
    pub body: String,
    pub attachment_ref: Option<String>,
    pub coordinator_ref: Option<String>,
    pub driver_ref: Option<String>,
    pub is_read: bool,
    pub is_starred: bool,
    pub created_at: DateTime<Utc>,
}

/// An immutable public contact-form submission (`contact_us` table).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExternalMessage {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Unified shape both message kinds are projected into for display.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MessageView {
    pub id: String,
    pub source: MessageSource,
    pub sender: String,
    pub sender_display: Option<String>,
    pub receiver: Option<String>,
    pub receiver_display: Option<String>,
    pub subject: String,
    pub body: String,
    pub is_read: bool,
    pub is_starred: bool,
    pub created_at: DateTime<Utc>,
    /// `false` for external items, which have no read/starred state.
    pub can_toggle_state: bool,
}

impl MessageView {
    /// Case-insensitive substring match on sender, receiver, subject and body.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        let hit = |s: &str| s.to_lowercase().contains(needle);
        hit(&self.sender)
            || self.sender_display.as_deref().is_some_and(hit)
            || self.receiver.as_deref().is_some_and(hit)
            || self.receiver_display.as_deref().is_some_and(hit)
            || hit(&self.subject)
            || hit(&self.body)
    }
}

impl From<InternalMessage> for MessageView {
    fn from(m: InternalMessage) -> Self {
        Self {
            id: m.id,
            source: MessageSource::Internal,
            sender: m.sender_email,
            sender_display: m.sender_display,
            receiver: Some(m.receiver_email),
            receiver_display: m.receiver_display,
            subject: m.subject.unwrap_or_default(),
            body: m.body,
            is_read: m.is_read,
            is_starred: m.is_starred,
            created_at: m.created_at,
            can_toggle_state: true,
        }
    }
}

impl From<ExternalMessage> for MessageView {
    fn from(m: ExternalMessage) -> Self {
        Self {
            id: m.id,
            source: MessageSource::External,
            sender: m.email.unwrap_or_default(),
            sender_display: Some(
                m.name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| UNKNOWN_SENDER.to_string()),
            ),
            receiver: None,
            receiver_display: Some(EXTERNAL_RECEIVER.to_string()),
            subject: m
                .subject
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_EXTERNAL_SUBJECT.to_string()),
            body: m.body,
            is_read: false,
            is_starred: false,
            created_at: m.created_at,
            can_toggle_state: false,
        }
    }
}

/// Input for sending an internal message. The sender comes from the
/// resolved identity, never from the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewMessage {
    pub receiver_email: String,
    pub receiver_display: Option<String>,
    pub sender_display: Option<String>,
    pub subject: Option<String>,
    pub body: String,
    pub attachment_ref: Option<String>,
    pub coordinator_ref: Option<String>,
    pub driver_ref: Option<String>,
}

impl NewMessage {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the body or receiver is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.body.trim().is_empty() {
            return Err(CoreError::Validation("message body is required".into()));
        }
        if self.receiver_email.trim().is_empty() {
            return Err(CoreError::Validation("receiver email is required".into()));
        }
        Ok(())
    }
}

/// Input from the public contact form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

impl ContactSubmission {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` unless name, email, and message are all present.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.message.trim().is_empty()
        {
            return Err(CoreError::Validation(
                "name, email, and message are required".into(),
            ));
        }
        Ok(())
    }
}
