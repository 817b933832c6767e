//! Attribution API response.

use serde::{Deserialize, Serialize};

/// Response body returned by the attribution API.
///
/// The body is passed through as received: `code` and `message` default when
/// missing and `data` is kept as an opaque JSON value for the caller to decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionResponse {
    /// Platform result code (`0` on success).
    #[serde(default)]
    pub code: i64,
    /// Human-readable result message.
    #[serde(default)]
    pub message: String,
    /// Optional payload of unspecified shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ConversionResponse {
    /// Whether the platform reported success (`code == 0`).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code == 0
    }
}
