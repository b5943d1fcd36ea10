//! One-shot status messages carried across a redirect.
//!
//! Handlers queue a message before redirecting; the next rendered page takes
//! (and thereby clears) the queue.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// Visual weight of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Info,
}

impl FlashLevel {
    /// CSS class used by the layout.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "flash flash-success",
            Self::Info => "flash flash-info",
        }
    }
}

/// A queued status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub text: String,
}

impl FlashMessage {
    #[must_use]
    pub fn new(level: FlashLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// Queue a message for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be read or modified.
pub async fn push(
    session: &Session,
    level: FlashLevel,
    text: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let mut queue: Vec<FlashMessage> = session
        .get(session_keys::FLASH)
        .await?
        .unwrap_or_default();
    queue.push(FlashMessage::new(level, text));
    session.insert(session_keys::FLASH, queue).await
}

/// Take every queued message, leaving the queue empty.
///
/// A session that cannot be read yields no messages; losing a status line is
/// preferable to failing the page.
pub async fn take(session: &Session) -> Vec<FlashMessage> {
    match session
        .remove::<Vec<FlashMessage>>(session_keys::FLASH)
        .await
    {
        Ok(messages) => messages.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Failed to read flash messages: {}", e);
            Vec::new()
        }
    }
}
