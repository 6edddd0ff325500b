//! # WhatsApp Preview Webhook Handler
//!
//! Turns a preview webhook delivery into exactly one outcome: flow resumption,
//! session deletion, a reported error or a silent no-op.
//!
//! Processing is a regular `Result` pipeline ([`process_preview_message`]).
//! [`acknowledge`] is the single place where failures are reported and
//! dropped: WhatsApp retries any non-2xx answer, and a retry would resume the
//! same flow twice.

use super::{
    classifier,
    error_policy,
    errors::{ErrorDetail, WebhookError},
    schemas::WebhookPayload,
    session::SessionId,
};
use crate::{
    consts, metric, repo,
    services::{self, FlowContact, ResumeFlowRequest},
};
use serde::{Deserialize, Serialize};

/// Body answered to WhatsApp for every processed delivery.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WebhookAck {
    pub message: String,
}

impl WebhookAck {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Checks status errors, then resumes the flow of the sender's preview session.
///
/// # Arguments
///
/// * `payload` - The webhook payload from WhatsApp
/// * `phone_number_id` - Preview phone number the flow engine replies from
/// * `session_repo` - Store of preview sessions, used to drop unengaged ones
/// * `flow_service` - Flow engine resuming the conversation
pub async fn process_preview_message(
    payload: &WebhookPayload,
    phone_number_id: &str,
    session_repo: &repo::ImplSessionRepo,
    flow_service: &services::ImplFlowResumeService,
) -> Result<WebhookAck, WebhookError> {
    error_policy::check_for_errors(payload, session_repo).await?;

    let extracted = classifier::extract(payload);
    let Some(message) = extracted.actionable_message() else {
        metric::incr_webhook_outcome_statds("no_content");
        return Ok(WebhookAck::new(consts::ACK_NO_MESSAGE_CONTENT));
    };

    let request = ResumeFlowRequest {
        message: message.clone(),
        session_id: SessionId::preview(&message.from),
        contact: FlowContact {
            name: extracted.contact_name.to_string(),
            phone_number: extracted.contact_phone_number.to_string(),
        },
        phone_number_id: phone_number_id.to_string(),
    };

    flow_service
        .resume(&request)
        .await
        .map_err(|cause| WebhookError::FlowResumption {
            session_id: request.session_id.clone(),
            cause,
        })?;

    metric::incr_webhook_outcome_statds("resumed");
    Ok(WebhookAck::new(consts::ACK_MESSAGE_RECEIVED))
}

/// Reports a failed pipeline to the sink and answers success anyway.
pub fn acknowledge(
    result: Result<WebhookAck, WebhookError>,
    sink: &services::ImplObservabilitySink,
) -> WebhookAck {
    match result {
        Ok(ack) => ack,
        Err(err) => {
            report_error(&err, sink);
            WebhookAck::new(consts::ACK_MESSAGE_RECEIVED)
        }
    }
}

fn report_error(err: &WebhookError, sink: &services::ImplObservabilitySink) {
    match err {
        WebhookError::Classified(classified) => sink.report_classified(classified),
        WebhookError::EmptyStatusErrors(_)
        | WebhookError::UnknownErrorCode { .. }
        | WebhookError::SessionDeletion { .. }
        | WebhookError::FlowResumption { .. } => {
            sink.report_unclassified(&err.to_string(), &ErrorDetail::parse(&err.diagnostic()))
        }
    }
}

/// Main webhook processor, never fails.
pub async fn receive_preview_message(
    payload: &WebhookPayload,
    phone_number_id: &str,
    session_repo: &repo::ImplSessionRepo,
    flow_service: &services::ImplFlowResumeService,
    sink: &services::ImplObservabilitySink,
) -> WebhookAck {
    let result = process_preview_message(payload, phone_number_id, session_repo, flow_service).await;
    acknowledge(result, sink)
}
