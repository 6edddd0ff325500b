//! # Flow Engine Client
//!
//! Resumes preview conversations by posting the inbound message to the flow
//! engine over HTTP.

use super::{FlowResumeService, ResumeFlowRequest};
use anyhow::{Context, Result};
use async_trait::async_trait;

#[derive(Clone)]
pub struct FlowEngineClient {
    /// HTTP client for making API requests
    pub client: reqwest::Client,
    /// Endpoint receiving [`ResumeFlowRequest`]s
    pub resume_url: String,
    /// Bearer token, omitted when the engine runs without auth
    pub auth_token: Option<String>,
}

impl FlowEngineClient {
    pub fn new(resume_url: String, auth_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            resume_url,
            auth_token,
        }
    }
}

#[async_trait]
impl FlowResumeService for FlowEngineClient {
    async fn resume(&self, request: &ResumeFlowRequest) -> Result<()> {
        let mut http_request = self.client.post(&self.resume_url).json(request);

        if let Some(token) = &self.auth_token {
            http_request = http_request.bearer_auth(token);
        }

        let response = http_request
            .send()
            .await
            .with_context(|| format!("failed to reach flow engine at {}", self.resume_url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("flow engine answered {status}: {body}");
        }

        logfire::info!(
            "Flow resumed for session {session_id}",
            session_id = request.session_id.to_string()
        );

        Ok(())
    }
}
