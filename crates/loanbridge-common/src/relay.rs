//! Transient shapes exchanged across the proxy boundary.

use serde::{Deserialize, Serialize};

/// Content type assumed for upstream responses that declare none.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Structured JSON error body returned by gateway endpoints.
///
/// Serializes to exactly `{"error":"<message>"}`, which is the shape the
/// dashboard expects from every failed gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure message.
    pub error: String,
}

impl ErrorBody {
    /// Creates an error body with the given message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// A forwarded upstream response: status, content type, and raw body text.
///
/// Constructed per proxy call and discarded once relayed; the body is never
/// re-serialized or parsed on the way through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayedResponse {
    /// The upstream's original status code.
    pub status: u16,
    /// The upstream's content type, or [`DEFAULT_CONTENT_TYPE`] if absent.
    pub content_type: String,
    /// The raw response body text.
    pub body: String,
}
