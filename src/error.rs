//! Error types for the AgniKit client.

use thiserror::Error;

/// Result type for AgniKit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the AgniKit client.
///
/// Every failing operation surfaces exactly one of these kinds; the client
/// performs no local recovery or retry, so each error is attributable to
/// either the transport, the HTTP layer, the response schema, or the service
/// itself.
#[derive(Error, Debug)]
pub enum Error {
    /// Network-layer failure (DNS, connection reset, timeout), not
    /// attributable to the service.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-2xx status code.
    #[error("HTTP error {status}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Raw response body, when one could be read
        body: Option<String>,
    },

    /// The response body was not valid JSON or violated the expected schema.
    #[error("decode error{}: {reason}", field.as_deref().map(|f| format!(" at `{f}`")).unwrap_or_default())]
    Decode {
        /// The offending field, when known
        field: Option<String>,
        /// What went wrong
        reason: String,
    },

    /// A well-formed response explicitly signaled failure via `success: false`.
    #[error("service error: {}", message.as_deref().unwrap_or("no message"))]
    Service {
        /// Error message from the service, if any
        message: Option<String>,
    },

    /// A request precondition failed before any network call was made.
    #[error("validation error: {0}")]
    Validation(String),

    /// Client configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a decode error for a specific field.
    pub(crate) fn decode(field: &str, reason: impl Into<String>) -> Self {
        Error::Decode {
            field: Some(field.to_string()),
            reason: reason.into(),
        }
    }

    /// Create a decode error from a serde failure on a whole document.
    pub(crate) fn from_json(err: serde_json::Error) -> Self {
        Error::Decode {
            field: None,
            reason: err.to_string(),
        }
    }

    /// Create an HTTP error from a non-2xx response, consuming its body.
    ///
    /// No decode of the body is attempted beyond reading it as text; the
    /// status code alone classifies the failure.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.ok().filter(|b| !b.is_empty());
        Error::Http { status, body }
    }
}
