//! Application configuration management with security considerations.
//!
//! This module handles all configuration values required by the preview webhook.
//! Sensitive fields are clearly marked and must never be logged.
//!
//! # Security Notes
//! - Tokens and secrets should come from a secret manager in production
//! - `WHATSAPP_APP_SECRET` enables payload signature verification when present

use envconfig::Envconfig;
use std::sync::OnceLock;

/// Application configuration loaded from environment variables.
///
/// Values that are only needed while handling a webhook request (like the
/// preview phone number id) are optional here and validated at request time,
/// so a misconfigured deployment answers with an internal error instead of
/// refusing to boot.
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Host address for web server binding (NON-SENSITIVE)
    #[envconfig(default = "0.0.0.0")]
    pub web_server_host: String,

    /// Port for web server binding (NON-SENSITIVE)
    #[envconfig(default = "8080")]
    pub web_server_port: u16,

    /// Path to SSL private key file, only read in prod (SENSITIVE PATH)
    #[envconfig(default = "server.key")]
    pub private_key_path: String,

    /// Path to SSL certificate file, only read in prod (NON-SENSITIVE)
    #[envconfig(default = "server.crt")]
    pub certificate_path: String,

    /// Session store database url (NON-SENSITIVE)
    /// Example: "sqlite:data/sessions.db"
    #[envconfig(default = "sqlite:data/sessions.db")]
    pub db_host: String,

    /// Flow engine endpoint that resumes paused conversations (NON-SENSITIVE)
    pub flow_engine_resume_url: String,

    /// 🔒 SENSITIVE: bearer token sent to the flow engine
    pub flow_engine_auth_token: Option<String>,

    /// WhatsApp phone number id used by the preview channel (SEMI-SENSITIVE)
    /// Required to process preview webhooks.
    pub whatsapp_preview_from_phone_number_id: Option<String>,

    /// 🔒 SENSITIVE: token expected on the webhook subscription handshake
    pub whatsapp_preview_verify_token: Option<String>,

    /// 🔒 SENSITIVE: Meta app secret used to sign webhook payloads
    pub whatsapp_app_secret: Option<String>,

    /// 🔒 SENSITIVE: logfire write token, telemetry stays local without it
    pub logfire_token: Option<String>,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }
}

/// Global application configuration, set once by [`init_config`].
pub static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Loads the configuration from the environment into [`APP_CONFIG`].
pub fn init_config() -> anyhow::Result<()> {
    let app_config = AppConfig::init_from_env()?;

    APP_CONFIG
        .set(app_config)
        .map_err(|_| anyhow::anyhow!("app config was already initialized"))
}
