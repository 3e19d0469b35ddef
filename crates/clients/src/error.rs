//! Transport-level errors shared by all clients.

/// Errors from the external-service client layer.
///
/// Timeouts surface as [`ClientError::Request`] (the underlying client
/// enforces a per-request deadline), so no external call can hang a run.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The service rejected our credentials.
    #[error("Authentication failed: {0}")]
    Auth(String),
}
