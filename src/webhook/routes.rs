use crate::consts;
use ntex::web;

/// Configures the WhatsApp preview webhook routes.
///
/// These routes are public endpoints, WhatsApp authenticates with the
/// handshake token and the payload signature.
///
/// # Routes
/// - `GET /v1/whatsapp/preview/webhook` - subscription handshake
/// - `POST /v1/whatsapp/preview/webhook` - webhook receiver
pub fn whatsapp_preview(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(consts::PREVIEW_WEBHOOK_PATH)
            .service((super::whatsapp::verify, super::whatsapp::receive)),
    );
}
