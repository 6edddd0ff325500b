/// Namespace of sessions opened from the WhatsApp preview channel.
pub const PREVIEW_SESSION_PREFIX: &str = "wa-preview-";

pub const PREVIEW_WEBHOOK_PATH: &str = "/v1/whatsapp/preview/webhook";

pub const ACK_MESSAGE_RECEIVED: &str = "Message received";
pub const ACK_NO_MESSAGE_CONTENT: &str = "No message content found";

/// WhatsApp Cloud API error codes reported on message statuses.
/// See https://developers.facebook.com/docs/whatsapp/cloud-api/support/error-codes
pub const WA_ERROR_UNENGAGED_USER: i64 = 131047;
pub const WA_ERROR_MESSAGE_UNDELIVERABLE: i64 = 131026;
pub const WA_ERROR_MEDIA_UPLOAD: i64 = 131053;

pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";
