//! Preview session identifiers.

use crate::consts;
use derive_more::Display;
use serde::Serialize;

/// Identifier of a conversation session opened from the preview channel.
///
/// Built as `wa-preview-<phone>`; existing stored sessions rely on this exact
/// format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Session of a preview conversation with the given WhatsApp user.
    pub fn preview(phone_number: &str) -> Self {
        Self(format!("{}{phone_number}", consts::PREVIEW_SESSION_PREFIX))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
