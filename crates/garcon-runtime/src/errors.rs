//! Runtime error types.

use std::time::Duration;

use thiserror::Error;

use garcon_assistant::RunStatus;
use garcon_core::ids::EstablishmentId;

/// Errors raised by the orchestrator and its services.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Assistant runtime failure.
    #[error(transparent)]
    Assistant(#[from] garcon_assistant::AssistantError),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] garcon_store::StoreError),

    /// Connector failure.
    #[error(transparent)]
    Connect(#[from] garcon_connect::ConnectError),

    /// Pool checkout failure.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// The assistant run reached a failure terminal state.
    #[error("run ended in terminal status {status:?}")]
    RunFailed {
        /// The terminal status reported by the runtime.
        status: RunStatus,
    },

    /// The run did not reach a terminal state before the poll deadline.
    #[error("run timed out after {waited:?}")]
    TimedOut {
        /// How long the driver polled before giving up.
        waited: Duration,
    },

    /// A payment event referenced a checkout session no order is bound to.
    #[error("no order bound to checkout session {0}")]
    UnknownCheckoutSession(String),

    /// An order references an establishment that no longer exists.
    #[error("unknown establishment {0}")]
    UnknownEstablishment(EstablishmentId),
}
