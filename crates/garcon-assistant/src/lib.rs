//! # garcon-assistant
//!
//! The assistant-runtime boundary: run/tool-call wire types, the
//! [`AssistantRuntime`] trait the orchestrator drives, and the
//! [`OpenAiAssistants`] client implementing it against the Assistants v2
//! API.
//!
//! The trait exists so the run driver and its tests never touch HTTP; in
//! production the reqwest-backed client is plugged in, in tests a scripted
//! fake.

#![deny(unsafe_code)]

pub mod client;
pub mod errors;
pub mod types;

pub use client::{OpenAiAssistants, OpenAiConfig};
pub use errors::AssistantError;
pub use types::{AssistantRuntime, RunSnapshot, RunStatus, ToolCall, ToolOutput};
