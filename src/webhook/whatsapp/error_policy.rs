//! Delivery status error policy.
//!
//! A failed delivery shows up as the first status of the first change carrying
//! an `errors` array. Only the first status and its first error are looked at.

use super::{
    errors::{ClassifiedError, ClassifiedErrorKind, WebhookError},
    schemas::{Status, StatusError, WebhookPayload},
    session::SessionId,
};
use crate::repo;
use serde::Serialize;
use serde_json::json;

fn raw_json<T: Serialize + std::fmt::Debug>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
}

/// Fails when the payload reports a delivery error.
///
/// For an unengaged user the preview session is deleted first, a deletion
/// failure is returned instead of the classified error.
pub async fn check_for_errors(
    payload: &WebhookPayload,
    session_repo: &repo::ImplSessionRepo,
) -> Result<(), WebhookError> {
    let Some(status) = payload
        .first_value()
        .and_then(|value| value.statuses.as_ref())
        .and_then(|statuses| statuses.first())
    else {
        return Ok(());
    };

    let Some(errors) = status.errors.as_ref() else {
        return Ok(());
    };

    let Some(error) = errors.first() else {
        return Err(WebhookError::EmptyStatusErrors(raw_json(status)));
    };

    match ClassifiedErrorKind::from_code(error.code) {
        Some(ClassifiedErrorKind::UnengagedUser) => {
            let session_id = SessionId::preview(&status.recipient_id);
            session_repo
                .delete_session(&session_id)
                .await
                .map_err(|cause| WebhookError::SessionDeletion {
                    session_id: session_id.clone(),
                    cause,
                })?;

            Err(WebhookError::Classified(unengaged_user_error(status, error)))
        }
        Some(ClassifiedErrorKind::Undeliverable) => Err(WebhookError::Classified(
            ClassifiedError::new(ClassifiedErrorKind::Undeliverable),
        )),
        Some(ClassifiedErrorKind::MediaUploadError) => {
            let mut classified = ClassifiedError::new(ClassifiedErrorKind::MediaUploadError);
            if let Some(error_data) = &error.error_data {
                classified = classified.with_detail(error_data.clone());
            }
            Err(WebhookError::Classified(classified))
        }
        None => Err(WebhookError::UnknownErrorCode {
            code: error.code,
            raw: raw_json(error),
        }),
    }
}

fn unengaged_user_error(status: &Status, error: &StatusError) -> ClassifiedError {
    let reason = error
        .message
        .as_deref()
        .or(error.title.as_deref())
        .unwrap_or("re-engagement window expired");

    ClassifiedError::new(ClassifiedErrorKind::UnengagedUser).with_detail(json!({
        "reason": reason,
        "recipientId": status.recipient_id,
    }))
}
