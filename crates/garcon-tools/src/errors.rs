//! Tool error types.

use thiserror::Error;

/// Errors raised by tool handlers.
///
/// The split decides what the assistant gets to see: a [`Domain`] message is
/// forwarded verbatim as the tool output, while [`Internal`] failures are
/// logged and replaced with a generic message by the dispatcher.
///
/// [`Domain`]: ToolError::Domain
/// [`Internal`]: ToolError::Internal
#[derive(Debug, Error)]
pub enum ToolError {
    /// A business-rule failure with a patron-facing, localized message.
    #[error("{message}")]
    Domain {
        /// The message forwarded to the assistant.
        message: String,
    },

    /// An infrastructure failure the patron must not see.
    #[error("internal tool error: {message}")]
    Internal {
        /// Diagnostic detail, for logs only.
        message: String,
    },
}

impl ToolError {
    /// A domain failure the assistant relays to the patron.
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain {
            message: message.into(),
        }
    }

    /// An internal failure, surfaced to the assistant only as a generic
    /// error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<garcon_store::StoreError> for ToolError {
    fn from(e: garcon_store::StoreError) -> Self {
        Self::internal(e.to_string())
    }
}

impl From<garcon_connect::ConnectError> for ToolError {
    fn from(e: garcon_connect::ConnectError) -> Self {
        Self::internal(e.to_string())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        Self::internal(e.to_string())
    }
}
