//! Extraction of the inbound message and its sender from a webhook payload.

use super::schemas::{Message, WebhookPayload};

/// The canonical fields of a preview webhook delivery.
#[derive(Debug, Clone)]
pub struct ExtractedMessage<'a> {
    pub message: Option<&'a Message>,
    /// Profile name of the first contact, empty when WhatsApp sent none.
    pub contact_name: &'a str,
    /// Sender of the message, empty without a message. Not checked against
    /// the `contacts` array.
    pub contact_phone_number: &'a str,
}

impl<'a> ExtractedMessage<'a> {
    /// The message a flow can consume: present and not a reaction.
    pub fn actionable_message(&self) -> Option<&'a Message> {
        self.message.filter(|message| !message.is_reaction())
    }
}

/// Reads the first message and contact of the first entry/change.
///
/// Never fails, missing fields degrade to `None` or an empty string.
pub fn extract(payload: &WebhookPayload) -> ExtractedMessage<'_> {
    let value = payload.first_value();

    let message = value
        .and_then(|value| value.messages.as_ref())
        .and_then(|messages| messages.first());

    let contact_name = value
        .and_then(|value| value.contacts.as_ref())
        .and_then(|contacts| contacts.first())
        .and_then(|contact| contact.profile.as_ref())
        .and_then(|profile| profile.name.as_deref())
        .unwrap_or_default();

    ExtractedMessage {
        message,
        contact_name,
        contact_phone_number: message.map(|message| message.from.as_str()).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload_with_value(value: serde_json::Value) -> WebhookPayload {
        serde_json::from_value(json!({
            "object": "whatsapp_business_account",
            "entry": [{ "id": "102290129340398", "changes": [{ "field": "messages", "value": value }] }]
        }))
        .unwrap()
    }

    #[test]
    fn test_extract_text_message_with_contact() {
        let payload = payload_with_value(json!({
            "contacts": [{ "profile": { "name": "Kerry Fisher" }, "wa_id": "16315551234" }],
            "messages": [{ "from": "16315551234", "id": "wamid.1", "timestamp": "1", "type": "text", "text": { "body": "hi" } }]
        }));

        let extracted = extract(&payload);

        assert_eq!(extracted.contact_name, "Kerry Fisher");
        assert_eq!(extracted.contact_phone_number, "16315551234");
        assert_eq!(extracted.actionable_message().unwrap().id, "wamid.1");
    }

    #[test]
    fn test_extract_without_contacts_defaults_to_empty_name() {
        let payload = payload_with_value(json!({
            "messages": [{ "from": "16315551234", "id": "wamid.1", "timestamp": "1", "type": "text", "text": { "body": "hi" } }]
        }));

        let extracted = extract(&payload);

        assert_eq!(extracted.contact_name, "");
        assert_eq!(extracted.contact_phone_number, "16315551234");
    }

    #[test]
    fn test_phone_number_comes_from_message_not_contact() {
        let payload = payload_with_value(json!({
            "contacts": [{ "profile": { "name": "Kerry Fisher" }, "wa_id": "999" }],
            "messages": [{ "from": "16315551234", "id": "wamid.1", "timestamp": "1", "type": "text", "text": { "body": "hi" } }]
        }));

        assert_eq!(extract(&payload).contact_phone_number, "16315551234");
    }

    #[test]
    fn test_extract_without_message() {
        let payload = payload_with_value(json!({
            "contacts": [{ "profile": { "name": "Kerry Fisher" }, "wa_id": "16315551234" }]
        }));

        let extracted = extract(&payload);

        assert!(extracted.message.is_none());
        assert!(extracted.actionable_message().is_none());
        assert_eq!(extracted.contact_phone_number, "");
        assert_eq!(extracted.contact_name, "Kerry Fisher");
    }

    #[test]
    fn test_reaction_is_not_actionable() {
        let payload = payload_with_value(json!({
            "messages": [{
                "from": "16315551234", "id": "wamid.2", "timestamp": "1", "type": "reaction",
                "reaction": { "message_id": "wamid.1", "emoji": "\u{1F44D}" }
            }]
        }));

        let extracted = extract(&payload);

        assert!(extracted.message.is_some());
        assert!(extracted.actionable_message().is_none());
    }

    #[test]
    fn test_only_first_message_is_considered() {
        let payload = payload_with_value(json!({
            "messages": [
                { "from": "111", "id": "wamid.1", "timestamp": "1", "type": "reaction", "reaction": { "message_id": "wamid.0" } },
                { "from": "222", "id": "wamid.2", "timestamp": "2", "type": "text", "text": { "body": "hi" } }
            ]
        }));

        let extracted = extract(&payload);

        assert_eq!(extracted.contact_phone_number, "111");
        assert!(extracted.actionable_message().is_none());
    }

    #[test]
    fn test_extract_from_empty_payload() {
        let payload = WebhookPayload::default();
        let extracted = extract(&payload);

        assert!(extracted.message.is_none());
        assert_eq!(extracted.contact_name, "");
        assert_eq!(extracted.contact_phone_number, "");
    }
}
