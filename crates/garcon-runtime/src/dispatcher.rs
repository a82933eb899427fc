//! Tool dispatcher: answers one batch of assistant tool calls.
//!
//! Failure isolation contract: every call gets exactly one output. Domain
//! errors travel to the assistant verbatim (they are written for the
//! patron); anything else is logged in full here and replaced by a generic
//! message, so internals never leak into the chat channel.

use std::time::Instant;

use metrics::{counter, histogram};
use serde_json::json;
use tracing::{error, info, instrument, warn};

use garcon_assistant::{ToolCall, ToolOutput};
use garcon_tools::{ToolContext, ToolError, ToolRegistry};

/// Patron-safe message substituted for any non-domain tool failure.
pub const GENERIC_TOOL_ERROR: &str = "Erro ao executar ação.";

/// Execute one batch of tool calls, returning exactly one output per call.
#[instrument(skip_all, fields(batch = calls.len(), patron = %ctx.patron.phone_number))]
pub async fn execute_tool_calls(
    calls: &[ToolCall],
    registry: &ToolRegistry,
    ctx: &ToolContext,
) -> Vec<ToolOutput> {
    let mut outputs = Vec::with_capacity(calls.len());
    for call in calls {
        outputs.push(execute_one(call, registry, ctx).await);
    }
    outputs
}

async fn execute_one(call: &ToolCall, registry: &ToolRegistry, ctx: &ToolContext) -> ToolOutput {
    let start = Instant::now();
    let Some(tool) = registry.get(&call.name) else {
        // An unregistered name is a configuration error, not something the
        // assistant can fix by retrying; answer generically so the run can
        // still complete.
        error!(tool_name = %call.name, "tool call for unregistered tool");
        counter!("garcon_tool_executions_total", "tool" => call.name.clone(), "outcome" => "unregistered").increment(1);
        return error_output(call, GENERIC_TOOL_ERROR);
    };

    let result = tool.execute(call.arguments.clone(), ctx).await;
    histogram!("garcon_tool_duration_seconds", "tool" => call.name.clone())
        .record(start.elapsed().as_secs_f64());

    match result {
        Ok(payload) => {
            info!(tool_name = %call.name, "tool executed");
            counter!("garcon_tool_executions_total", "tool" => call.name.clone(), "outcome" => "ok").increment(1);
            ToolOutput {
                tool_call_id: call.id.clone(),
                output: payload.to_string(),
            }
        }
        Err(ToolError::Domain { message }) => {
            warn!(tool_name = %call.name, %message, "tool domain error");
            counter!("garcon_tool_executions_total", "tool" => call.name.clone(), "outcome" => "domain_error").increment(1);
            error_output(call, &message)
        }
        Err(err) => {
            error!(tool_name = %call.name, error = %err, "tool internal error");
            counter!("garcon_tool_executions_total", "tool" => call.name.clone(), "outcome" => "internal_error").increment(1);
            error_output(call, GENERIC_TOOL_ERROR)
        }
    }
}

fn error_output(call: &ToolCall, message: &str) -> ToolOutput {
    ToolOutput {
        tool_call_id: call.id.clone(),
        output: json!({ "error": message }).to_string(),
    }
}
