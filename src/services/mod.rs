//! Collaborators of the preview webhook: the flow engine that resumes
//! conversations and the sink that receives failure reports.

pub mod flow;
pub mod telemetry;

use crate::webhook::whatsapp::{
    errors::{ClassifiedError, ErrorDetail},
    schemas::Message,
    session::SessionId,
};
use async_trait::async_trait;
use serde::Serialize;

/// Sender of the message that resumes a flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowContact {
    pub name: String,
    pub phone_number: String,
}

/// Everything the flow engine needs to continue a paused preview session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeFlowRequest {
    pub message: Message,
    pub session_id: SessionId,
    pub contact: FlowContact,
    /// Phone number id the flow engine replies from.
    pub phone_number_id: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FlowResumeService: Send + Sync {
    async fn resume(&self, request: &ResumeFlowRequest) -> anyhow::Result<()>;
}

/// Destination of failure reports.
///
/// Reporting is best-effort: implementations swallow their own failures.
#[cfg_attr(test, mockall::automock)]
pub trait ObservabilitySink: Send + Sync {
    /// Known WhatsApp delivery failure.
    fn report_classified(&self, error: &ClassifiedError);

    /// Anything else that went wrong while handling a webhook.
    fn report_unclassified(&self, message: &str, detail: &ErrorDetail);
}

pub type ImplFlowResumeService = Box<dyn FlowResumeService>;
pub type ImplObservabilitySink = Box<dyn ObservabilitySink>;
