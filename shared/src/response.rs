//! API Response types
//!
//! Every HTTP response from the floor server follows the same JSON shape:
//!
//! ```json
//! { "success": true, "message": "Reservation created", "reservation": { ... } }
//! ```
//!
//! The payload fields are flattened into the envelope, so each endpoint
//! contributes its own top-level keys next to `success` / `message`.

use serde::{Deserialize, Serialize};

/// Unified response envelope
///
/// `message` is omitted when empty; `data` is flattened into the object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Successful response carrying a payload
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Successful response with a payload and a human-readable message
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// Successful response with only a message (deletes, acknowledgements)
    pub fn message_only(message: impl Into<String>) -> Envelope<()> {
        Envelope {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Failed response; the HTTP status carries the error class
    pub fn fail(message: impl Into<String>) -> Envelope<()> {
        Envelope {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}
