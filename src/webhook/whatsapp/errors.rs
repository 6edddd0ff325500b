//! Error types of the preview webhook pipeline.
//!
//! Failures are split in two families: [`ClassifiedError`]s are known WhatsApp
//! delivery failures with a stable reporting shape, every other
//! [`WebhookError`] variant is unexpected and reported with its raw
//! diagnostics.

use super::session::SessionId;
use crate::consts;
use derive_more::{Display, Error};
use serde::Serialize;

/// Known WhatsApp delivery failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ClassifiedErrorKind {
    #[display("unengaged user")]
    UnengagedUser,
    #[display("undeliverable")]
    Undeliverable,
    #[display("media upload error")]
    MediaUploadError,
}

impl ClassifiedErrorKind {
    /// Maps a WhatsApp status error code to its kind, `None` when the code is
    /// not one the preview channel knows how to handle.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            consts::WA_ERROR_UNENGAGED_USER => Some(Self::UnengagedUser),
            consts::WA_ERROR_MESSAGE_UNDELIVERABLE => Some(Self::Undeliverable),
            consts::WA_ERROR_MEDIA_UPLOAD => Some(Self::MediaUploadError),
            _ => None,
        }
    }

    /// Short label used for metrics attributes.
    pub fn as_metric_label(&self) -> &'static str {
        match self {
            Self::UnengagedUser => "unengaged_user",
            Self::Undeliverable => "undeliverable",
            Self::MediaUploadError => "media_upload_error",
        }
    }
}

/// A recognised failure, reported as a breadcrumb rather than an incident.
#[derive(Debug, Clone, PartialEq, Display)]
#[display("{kind}")]
pub struct ClassifiedError {
    pub kind: ClassifiedErrorKind,
    pub detail: Option<serde_json::Value>,
}

impl ClassifiedError {
    pub fn new(kind: ClassifiedErrorKind) -> Self {
        Self { kind, detail: None }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Diagnostic payload attached to an unclassified error report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Structured(serde_json::Value),
    Raw(String),
}

impl ErrorDetail {
    /// Parses a diagnostic text as JSON, keeping it raw when it is not a JSON
    /// object or array. Never fails.
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(value) if value.is_object() || value.is_array() => Self::Structured(value),
            _ => Self::Raw(text.to_string()),
        }
    }
}

#[derive(Debug, Display, Error)]
pub enum WebhookError {
    #[display("whatsapp delivery error: {_0}")]
    Classified(#[error(not(source))] ClassifiedError),
    #[display("status carries an empty errors array: {_0}")]
    EmptyStatusErrors(#[error(not(source))] String),
    #[display("unhandled whatsapp error code {code}: {raw}")]
    UnknownErrorCode { code: i64, raw: String },
    #[display("session {session_id} could not be deleted: {cause:#}")]
    SessionDeletion {
        session_id: SessionId,
        cause: anyhow::Error,
    },
    #[display("flow of session {session_id} could not be resumed: {cause:#}")]
    FlowResumption {
        session_id: SessionId,
        cause: anyhow::Error,
    },
}

impl WebhookError {
    /// Text handed to [`ErrorDetail::parse`] when reporting the error.
    ///
    /// Protocol errors keep the raw provider JSON so it lands structured in
    /// telemetry.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::EmptyStatusErrors(raw) => raw.clone(),
            Self::UnknownErrorCode { raw, .. } => raw.clone(),
            _ => self.to_string(),
        }
    }
}
