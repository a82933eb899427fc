//! Assistant runtime error types.

use thiserror::Error;

/// Errors raised at the assistant-runtime boundary.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// A required credential was absent at construction time. Fatal, never
    /// retried.
    #[error("missing assistant credential: {0}")]
    MissingCredential(&'static str),

    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("assistant http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The runtime answered with a non-success status.
    #[error("assistant api error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// A response body did not match the expected shape.
    #[error("unexpected assistant response: {0}")]
    UnexpectedResponse(String),
}

impl AssistantError {
    /// Whether a bounded retry with backoff is worth attempting.
    ///
    /// Only transport failures and throttling/server-side statuses qualify;
    /// 4xx responses and shape mismatches are not transient.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::MissingCredential(_) | Self::UnexpectedResponse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(
            AssistantError::Api {
                status: 503,
                message: "overloaded".into()
            }
            .is_transient()
        );
        assert!(
            AssistantError::Api {
                status: 429,
                message: "rate limited".into()
            }
            .is_transient()
        );
        assert!(
            !AssistantError::Api {
                status: 404,
                message: "no such run".into()
            }
            .is_transient()
        );
        assert!(!AssistantError::MissingCredential("apiKey").is_transient());
    }
}
