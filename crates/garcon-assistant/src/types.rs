//! Run state, tool-call exchange types, and the runtime trait.

use async_trait::async_trait;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use garcon_core::ids::{RunId, ThreadId};

use crate::errors::AssistantError;

/// Status of an assistant run, as reported by the runtime.
///
/// Statuses the runtime may add later deserialize into [`RunStatus::Other`]
/// instead of failing; the driver treats those as still-in-progress and
/// relies on its poll deadline to bail out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Accepted, not yet started.
    Queued,
    /// Executing.
    InProgress,
    /// Blocked on tool outputs from us.
    RequiresAction,
    /// Finished successfully. Terminal.
    Completed,
    /// Runtime-side failure. Terminal.
    Failed,
    /// Ran past the runtime's own deadline. Terminal.
    Expired,
    /// Cancellation requested, not yet effective.
    Cancelling,
    /// Cancelled. Terminal.
    Cancelled,
    /// Ended early (e.g. token limit). Terminal.
    Incomplete,
    /// A status this client does not know.
    Other(String),
}

impl RunStatus {
    /// Parse a wire status string.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "queued" => Self::Queued,
            "in_progress" => Self::InProgress,
            "requires_action" => Self::RequiresAction,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            "expired" => Self::Expired,
            "cancelling" => Self::Cancelling,
            "cancelled" => Self::Cancelled,
            "incomplete" => Self::Incomplete,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire form of the status.
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::RequiresAction => "requires_action",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Expired => "expired",
            Self::Cancelling => "cancelling",
            Self::Cancelled => "cancelled",
            Self::Incomplete => "incomplete",
            Self::Other(s) => s,
        }
    }

    /// Whether no further polling can change this status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Expired | Self::Cancelled | Self::Incomplete
        )
    }

    /// Whether this is a terminal status other than [`RunStatus::Completed`].
    pub fn is_failure(&self) -> bool {
        self.is_terminal() && *self != Self::Completed
    }
}

impl Serialize for RunStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for RunStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&s))
    }
}

/// One tool invocation requested by the assistant mid-run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call ID the output must be keyed by.
    pub id: String,
    /// Registered function name.
    pub name: String,
    /// Parsed JSON arguments. `Null` when the runtime sent malformed JSON;
    /// the handler then reports an argument error for this one call.
    pub arguments: serde_json::Value,
}

/// The answer to one [`ToolCall`], keyed by its call ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// ID of the call being answered.
    pub tool_call_id: String,
    /// JSON-encoded handler output.
    pub output: String,
}

/// Snapshot of a run at one poll.
#[derive(Debug, Clone)]
pub struct RunSnapshot {
    /// The run's ID.
    pub id: RunId,
    /// Status at poll time.
    pub status: RunStatus,
    /// Pending tool calls. Non-empty only when `status` is
    /// [`RunStatus::RequiresAction`].
    pub tool_calls: Vec<ToolCall>,
}

/// The external assistant runtime, as consumed by the run driver.
#[async_trait]
pub trait AssistantRuntime: Send + Sync {
    /// Create a fresh conversation thread.
    async fn create_thread(&self) -> Result<ThreadId, AssistantError>;

    /// Append a user message to a thread.
    async fn add_user_message(&self, thread: &ThreadId, text: &str) -> Result<(), AssistantError>;

    /// Start a run on a thread, carrying conversation-specific instructions.
    async fn create_run(
        &self,
        thread: &ThreadId,
        instructions: &str,
    ) -> Result<RunId, AssistantError>;

    /// Fetch the current state of a run.
    async fn retrieve_run(
        &self,
        thread: &ThreadId,
        run: &RunId,
    ) -> Result<RunSnapshot, AssistantError>;

    /// Submit the outputs for a `requires_action` batch.
    async fn submit_tool_outputs(
        &self,
        thread: &ThreadId,
        run: &RunId,
        outputs: &[ToolOutput],
    ) -> Result<(), AssistantError>;

    /// Texts of the assistant messages produced by a completed run,
    /// **newest first** (the raw API order — callers must reverse for
    /// chronological order).
    async fn list_run_messages(
        &self,
        thread: &ThreadId,
        run: &RunId,
    ) -> Result<Vec<String>, AssistantError>;
}
