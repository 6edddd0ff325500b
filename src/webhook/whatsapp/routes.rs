//! WhatsApp preview webhook endpoint handlers
//!
//! Implements the subscription handshake (GET) and the webhook receiver (POST).
//!
//! The receiver answers `200` for every payload it manages to parse, whatever
//! happens while processing it. Only a missing configuration, a bad signature
//! or an undecodable body are rejected, and none of them touches a session.

use super::{handler, schemas, security};
use crate::{
    consts,
    server::{AppState, errors},
};
use ntex::{util::Bytes, web};
use serde::Deserialize;
use tracing::Instrument;

/// Query parameters for webhook verification
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    /// The mode parameter, should be "subscribe"
    #[serde(rename = "hub.mode")]
    pub mode: String,
    /// The verification token from WhatsApp
    #[serde(rename = "hub.verify_token")]
    pub verify_token: String,
    /// The challenge string to echo back
    #[serde(rename = "hub.challenge")]
    pub challenge: String,
}

/// Returns the challenge to echo when the handshake is legitimate.
///
/// Without a configured token every handshake is refused.
pub fn verify_subscription<'a>(
    query: &'a VerifyQuery,
    expected_token: Option<&str>,
) -> Option<&'a str> {
    let expected_token = expected_token?;

    if query.mode != "subscribe" || query.verify_token != expected_token {
        return None;
    }

    Some(&query.challenge)
}

/// Webhook verification endpoint (GET)
///
/// # Returns
/// - 200 with challenge string if verification succeeds
/// - 401 if verification fails
#[web::get("")]
pub async fn verify(
    query: web::types::Query<VerifyQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let Some(challenge) =
        verify_subscription(&query, app_state.preview_verify_token.as_deref())
    else {
        logfire::warn!(
            "Refused preview webhook subscription: mode={mode}",
            mode = query.mode.clone()
        );
        return Err(errors::UserError::Unauthorized.into());
    };

    Ok(web::HttpResponse::Ok()
        .content_type("text/plain")
        .body(challenge.to_string()))
}

/// Webhook receiver endpoint (POST)
///
/// # Returns
/// - 200 `{"message": ...}` once the payload is parsed, even if processing failed
/// - 500 if the preview phone number id is not configured
/// - 401 if an app secret is configured and the signature does not match
/// - 400 if the body is not a webhook payload
#[web::post("")]
pub async fn receive(
    req: web::HttpRequest,
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let phone_number_id = app_state
        .preview_phone_number_id
        .as_deref()
        .ok_or_else(|| {
            errors::ServerError::MissingConfiguration(
                "WHATSAPP_PREVIEW_FROM_PHONE_NUMBER_ID is not defined".to_string(),
            )
        })?;

    if let Some(app_secret) = app_state.app_secret.as_deref() {
        let signature_header = req
            .headers()
            .get(consts::SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok());

        if let Err(e) = security::verify_signature(signature_header, &body, app_secret) {
            logfire::warn!(
                "Rejected preview webhook: {error} reason={reason}",
                error = e.to_string(),
                reason = e.reason()
            );
            return Err(errors::UserError::Unauthorized.into());
        }
    }

    let payload: schemas::WebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        logfire::error!(
            "Failed to parse webhook payload: {error}",
            error = e.to_string()
        );
        errors::UserError::InvalidPayload(e.to_string())
    })?;

    let ack = handler::receive_preview_message(
        &payload,
        phone_number_id,
        &app_state.session_repo,
        &app_state.flow_service,
        &app_state.observability_sink,
    )
    .instrument(logfire::span!("whatsapp preview webhook"))
    .await;

    Ok(web::HttpResponse::Ok().json(&ack))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        repo::MockSessionRepo,
        services::{MockFlowResumeService, MockObservabilitySink},
        webhook,
    };
    use ntex::{http::StatusCode, web::test};
    use serde_json::json;

    const APP_SECRET: &str = "app_secret";

    fn text_message_body() -> Vec<u8> {
        serde_json::to_vec(&json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "102290129340398",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "contacts": [{ "profile": { "name": "Sheena Nelson" }, "wa_id": "16505551234" }],
                        "messages": [{
                            "from": "16505551234", "id": "wamid.1", "timestamp": "1749416383",
                            "type": "text", "text": { "body": "hello" }
                        }]
                    }
                }]
            }]
        }))
        .unwrap()
    }

    fn app_state(
        preview_phone_number_id: Option<&str>,
        app_secret: Option<&str>,
        resume_calls: usize,
    ) -> AppState {
        let mut mock_repo = MockSessionRepo::new();
        mock_repo.expect_delete_session().never();

        let mut mock_flow = MockFlowResumeService::new();
        mock_flow
            .expect_resume()
            .times(resume_calls)
            .returning(|_| Ok(()));

        let mut mock_sink = MockObservabilitySink::new();
        mock_sink.expect_report_classified().never();
        mock_sink.expect_report_unclassified().never();

        AppState {
            session_repo: Box::new(mock_repo),
            flow_service: Box::new(mock_flow),
            observability_sink: Box::new(mock_sink),
            preview_phone_number_id: preview_phone_number_id.map(str::to_string),
            preview_verify_token: Some("verify_me".to_string()),
            app_secret: app_secret.map(str::to_string),
        }
    }

    #[test]
    fn test_verify_query_deserialization() {
        let json = r#"{"hub.mode":"subscribe","hub.verify_token":"test123","hub.challenge":"challenge123"}"#;
        let query: VerifyQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.mode, "subscribe");
        assert_eq!(query.verify_token, "test123");
        assert_eq!(query.challenge, "challenge123");
    }

    #[test]
    fn test_verify_subscription() {
        let query = VerifyQuery {
            mode: "subscribe".to_string(),
            verify_token: "verify_me".to_string(),
            challenge: "1158201444".to_string(),
        };

        assert_eq!(verify_subscription(&query, Some("verify_me")), Some("1158201444"));
        assert_eq!(verify_subscription(&query, Some("other")), None);
        assert_eq!(verify_subscription(&query, None), None);

        let unsubscribe = VerifyQuery {
            mode: "unsubscribe".to_string(),
            ..query
        };
        assert_eq!(verify_subscription(&unsubscribe, Some("verify_me")), None);
    }

    #[ntex::test]
    async fn test_receive_text_message() {
        let app = test::init_service(
            web::App::new()
                .state(app_state(Some("106540352242922"), None, 1))
                .configure(webhook::routes::whatsapp_preview),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/whatsapp/preview/webhook")
            .set_payload(text_message_body())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
        assert_eq!(body, json!({ "message": "Message received" }));
    }

    #[ntex::test]
    async fn test_receive_forwarded_message() {
        let app = test::init_service(
            web::App::new()
                .state(app_state(Some("106540352242922"), None, 1))
                .configure(webhook::routes::whatsapp_preview),
        )
        .await;

        let body = json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "102290129340398",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "contacts": [{ "profile": { "name": "Sheena Nelson" }, "wa_id": "16505551234" }],
                        "messages": [{
                            "from": "16505551234", "id": "wamid.1", "timestamp": "1749416383",
                            "type": "text", "text": { "body": "look at this" },
                            "context": { "forwarded": true }
                        }]
                    }
                }]
            }]
        });
        let req = test::TestRequest::post()
            .uri("/v1/whatsapp/preview/webhook")
            .set_payload(serde_json::to_vec(&body).unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[ntex::test]
    async fn test_receive_without_phone_number_id_is_internal_error() {
        let app = test::init_service(
            web::App::new()
                .state(app_state(None, None, 0))
                .configure(webhook::routes::whatsapp_preview),
        )
        .await;

        // not even a payload: configuration is checked first
        let req = test::TestRequest::post()
            .uri("/v1/whatsapp/preview/webhook")
            .set_payload("not json")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[ntex::test]
    async fn test_receive_rejects_bad_signature() {
        let app = test::init_service(
            web::App::new()
                .state(app_state(Some("106540352242922"), Some(APP_SECRET), 0))
                .configure(webhook::routes::whatsapp_preview),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/whatsapp/preview/webhook")
            .header(consts::SIGNATURE_HEADER, "sha256=00")
            .set_payload(text_message_body())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[ntex::test]
    async fn test_receive_accepts_signed_payload() {
        let app = test::init_service(
            web::App::new()
                .state(app_state(Some("106540352242922"), Some(APP_SECRET), 1))
                .configure(webhook::routes::whatsapp_preview),
        )
        .await;

        let body = text_message_body();
        let req = test::TestRequest::post()
            .uri("/v1/whatsapp/preview/webhook")
            .header(
                consts::SIGNATURE_HEADER,
                security::sign(&body, APP_SECRET).unwrap(),
            )
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[ntex::test]
    async fn test_receive_rejects_undecodable_body() {
        let app = test::init_service(
            web::App::new()
                .state(app_state(Some("106540352242922"), None, 0))
                .configure(webhook::routes::whatsapp_preview),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/whatsapp/preview/webhook")
            .set_payload("{\"entry\": 42}")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[ntex::test]
    async fn test_verify_endpoint_echoes_challenge() {
        let app = test::init_service(
            web::App::new()
                .state(app_state(Some("106540352242922"), None, 0))
                .configure(webhook::routes::whatsapp_preview),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/v1/whatsapp/preview/webhook?hub.mode=subscribe&hub.verify_token=verify_me&hub.challenge=1158201444")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, Bytes::from_static(b"1158201444"));
    }
}
