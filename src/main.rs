#![recursion_limit = "256"]
//! # WhatsApp Preview Webhook
//!
//! Receives WhatsApp Business Platform webhooks of the preview channel and
//! resumes the matching conversation flows.

pub mod config;
pub mod consts;
pub mod metric;
pub mod repo;
pub mod server;
pub mod services;
pub mod utils;
pub mod webhook;

use anyhow::Context;
use logfire::config::MetricsOptions;
use ntex::web;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    // Initialize configuration
    config::init_config()?;

    let app_config = config::APP_CONFIG
        .get()
        .context("failed to get app config")?;

    // Initialize logging and metrics
    let send_to_logfire = if app_config.logfire_token.is_some() {
        logfire::config::SendToLogfire::Yes
    } else {
        logfire::config::SendToLogfire::No
    };

    let mut logfire_config = logfire::configure()
        .install_panic_handler()
        .with_metrics(Some(MetricsOptions::default()))
        .send_to_logfire(send_to_logfire);
    if let Some(token) = &app_config.logfire_token {
        logfire_config = logfire_config.with_token(token);
    }
    let shutdown_handler = logfire_config.finish()?;

    if app_config.whatsapp_preview_from_phone_number_id.is_none() {
        logfire::warn!(
            "WHATSAPP_PREVIEW_FROM_PHONE_NUMBER_ID is not set, preview webhooks will fail"
        );
    }

    // Initialize session store
    let sqlite_repo = repo::sqlite::SqlxSqliteRepo {
        db_pool: utils::setup_sqlite_db_pool(&app_config.db_host).await?,
    };
    sqlite_repo.ensure_schema().await?;

    let flow_client = services::flow::FlowEngineClient::new(
        app_config.flow_engine_resume_url.clone(),
        app_config.flow_engine_auth_token.clone(),
    );

    // Configure and start the web server
    configure_and_run_server(app_config, sqlite_repo, flow_client).await?;

    shutdown_handler.shutdown()?;

    Ok(())
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor(
    app_config: &config::AppConfig,
) -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    ssl_acceptor
        .set_private_key_file(&app_config.private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                app_config.private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&app_config.certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                app_config.certificate_path,
                e
            )
        })?;

    Ok(ssl_acceptor)
}

/// Creates application state from the provided services
fn create_app_state(
    app_config: &config::AppConfig,
    sqlite_repo: repo::sqlite::SqlxSqliteRepo,
    flow_client: services::flow::FlowEngineClient,
) -> server::AppState {
    server::AppState {
        session_repo: Box::new(sqlite_repo),
        flow_service: Box::new(flow_client),
        observability_sink: Box::new(services::telemetry::LogfireSink),
        preview_phone_number_id: app_config.whatsapp_preview_from_phone_number_id.clone(),
        preview_verify_token: app_config.whatsapp_preview_verify_token.clone(),
        app_secret: app_config.whatsapp_app_secret.clone(),
    }
}

/// Configures and starts the web server with appropriate SSL settings
async fn configure_and_run_server(
    app_config: &'static config::AppConfig,
    sqlite_repo: repo::sqlite::SqlxSqliteRepo,
    flow_client: services::flow::FlowEngineClient,
) -> anyhow::Result<()> {
    let server_addr = (app_config.web_server_host.clone(), app_config.web_server_port);

    let server = web::server(move || {
        web::App::new()
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(create_app_state(
                app_config,
                sqlite_repo.clone(),
                flow_client.clone(),
            ))
            .configure(webhook::routes::whatsapp_preview)
            .service(server::handlers::health)
            .default_service(web::route().to(server::handlers::serve_not_found))
    });

    let bound_server = if app_config.is_prod() {
        let ssl_acceptor = setup_ssl_acceptor(app_config)?;
        server.bind_openssl(server_addr, ssl_acceptor)?
    } else {
        server.bind(server_addr)?
    };

    logfire::info!(
        "Listening on {host}:{port}",
        host = app_config.web_server_host.clone(),
        port = i64::from(app_config.web_server_port)
    );

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
