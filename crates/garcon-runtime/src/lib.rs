//! # garcon-runtime
//!
//! The debounced conversational orchestrator. Inbound messages are
//! coalesced per conversation by the [`DebounceScheduler`]; once a
//! conversation has been quiet for the debounce window, a flush tick hands
//! it to the [`RunDriver`], which drives one assistant run to completion,
//! answering tool calls through the dispatcher along the way. The
//! [`Orchestrator`] facade wires it all together and forwards replies to
//! the patron over WhatsApp.

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod debounce;
pub mod dispatcher;
pub mod driver;
pub mod errors;
pub mod orchestrator;
pub mod orders;

#[cfg(test)]
pub(crate) mod testutil;

pub use debounce::DebounceScheduler;
pub use dispatcher::{GENERIC_TOOL_ERROR, execute_tool_calls};
pub use driver::RunDriver;
pub use errors::RuntimeError;
pub use orchestrator::{
    ConversationKey, Orchestrator, OrchestratorConfig, RUN_FAILURE_REPLY, spawn_flush_loop,
};
pub use orders::OrderService;
