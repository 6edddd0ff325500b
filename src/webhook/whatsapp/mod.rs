//! WhatsApp preview webhook integration module
//!
//! ## Submodules
//!
//! - [`schemas`] - Data structures of the webhook payloads
//! - [`classifier`] - Extraction of the inbound message and its sender
//! - [`error_policy`] - Handling of failed delivery statuses
//! - [`handler`] - Dispatch of a delivery and its acknowledgment
//! - [`routes`] - HTTP endpoint handlers
//! - [`security`] - Payload signature verification

pub mod classifier;
pub mod error_policy;
pub mod errors;
pub mod handler;
pub mod routes;
pub mod schemas;
pub mod security;
pub mod session;

pub use routes::{receive, verify};
