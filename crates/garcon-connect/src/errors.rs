//! Connector error types.

use thiserror::Error;

/// Errors raised by the outward connectors.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// A required credential was absent at construction time.
    #[error("missing connector credential: {0}")]
    MissingCredential(&'static str),

    /// Transport-level failure.
    #[error("connector http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service answered with a non-success status.
    #[error("connector api error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// A response body did not match the expected shape.
    #[error("unexpected connector response: {0}")]
    UnexpectedResponse(String),

    /// The caller handed the connector data it cannot send.
    #[error("invalid connector input: {0}")]
    InvalidInput(String),
}
