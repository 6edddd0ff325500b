//! Webhook handlers for external integrations
//!
//! ## Modules
//!
//! - [`whatsapp`] - WhatsApp Business Platform preview webhook

pub mod routes;
pub mod whatsapp;
