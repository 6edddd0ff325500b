//! # WhatsApp Webhook Schemas
//!
//! Data structures for the JSON payload WhatsApp Business Platform posts to the
//! preview webhook (incoming messages and delivery statuses).
//!
//! Every field the preview flow does not strictly need is optional so that a
//! partially filled payload still deserializes and degrades to "nothing to do".

use serde::{Deserialize, Serialize};

/// Root webhook payload from WhatsApp
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebhookPayload {
    /// The object type, typically "whatsapp_business_account"
    #[serde(default)]
    pub object: String,
    /// Array of entry objects containing the actual data
    #[serde(default)]
    pub entry: Vec<Entry>,
}

impl WebhookPayload {
    /// Returns the value of the first change of the first entry.
    ///
    /// Only this pair is authoritative for a webhook delivery, later entries
    /// and changes are ignored.
    pub fn first_value(&self) -> Option<&Value> {
        self.entry
            .first()
            .and_then(|entry| entry.changes.first())
            .map(|change| &change.value)
    }
}

/// Entry object containing changes and metadata
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Entry {
    /// Business Account ID
    #[serde(default)]
    pub id: String,
    /// Array of changes that occurred
    #[serde(default)]
    pub changes: Vec<Change>,
}

/// Change object containing the actual webhook data
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Change {
    /// The field that changed (e.g., "messages")
    #[serde(default)]
    pub field: String,
    /// The value containing the actual data
    #[serde(default)]
    pub value: Value,
}

/// Value object containing messages, contacts and statuses
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Value {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messaging_product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Array of contacts (senders)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<Contact>>,
    /// Array of messages received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
    /// Array of statuses (for sent messages)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<Status>>,
}

/// Metadata about the WhatsApp Business phone number
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Metadata {
    pub display_phone_number: String,
    pub phone_number_id: String,
}

/// Contact information for the message sender
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    /// WhatsApp ID (phone number)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wa_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Message types WhatsApp can deliver to a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    Video,
    Audio,
    Document,
    Sticker,
    Location,
    Contacts,
    Interactive,
    Button,
    Order,
    System,
    Reaction,
    #[serde(other)]
    Unknown,
}

/// Message object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    /// Sender's WhatsApp ID (phone number)
    pub from: String,
    /// Message ID
    #[serde(default)]
    pub id: String,
    /// Timestamp of the message
    #[serde(default)]
    pub timestamp: String,
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<MediaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<MediaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<MediaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticker: Option<MediaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interactive: Option<InteractiveMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<ButtonMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction: Option<ReactionMessage>,
    /// Context (if this is a reply to another message or a forward)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    /// Payloads without a typed field (`contacts`, `order`, `system`,
    /// `referral`, ...), forwarded to the flow engine as received.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Message {
    /// A reaction only points at another message, it carries nothing a flow
    /// could consume.
    pub fn is_reaction(&self) -> bool {
        self.msg_type == MessageType::Reaction
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextMessage {
    pub body: String,
}

/// Media message content (image, video, document, audio, sticker)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaMessage {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocationMessage {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Interactive reply (button or list selection)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InteractiveMessage {
    #[serde(rename = "type")]
    pub interactive_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_reply: Option<InteractiveReply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_reply: Option<InteractiveReply>,
    /// Other replies, such as `nfm_reply` of a WhatsApp Flow
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InteractiveReply {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Quick reply button pressed on a template message
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ButtonMessage {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReactionMessage {
    pub message_id: String,
    /// Missing when the user removes the reaction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

/// Context of a reply or a forwarded message
///
/// A forward carries only the `forwarded` flags, no message id.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Context {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequently_forwarded: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Status update for sent messages
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Status {
    #[serde(default)]
    pub id: String,
    /// Status (sent, delivered, read, failed)
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
    pub recipient_id: String,
    /// `None` for a plain receipt, `Some` only when delivery failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<StatusError>>,
}

/// Error reported by WhatsApp for a failed delivery
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusError {
    pub code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_data: Option<serde_json::Value>,
}
