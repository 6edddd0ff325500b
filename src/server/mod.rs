pub mod errors;
pub mod handlers;

use crate::{repo, services};

pub struct AppState {
    pub session_repo: repo::ImplSessionRepo,
    pub flow_service: services::ImplFlowResumeService,
    pub observability_sink: services::ImplObservabilitySink,
    /// Phone number id of the preview channel, checked on every webhook.
    pub preview_phone_number_id: Option<String>,
    pub preview_verify_token: Option<String>,
    pub app_secret: Option<String>,
}
