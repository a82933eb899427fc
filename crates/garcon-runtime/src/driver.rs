//! Run driver: drives one assistant run to a terminal state.
//!
//! One turn is a bounded-interval poll loop. `requires_action` hands the
//! batch to the dispatcher and submits the outputs; a failure status ends
//! the turn as [`RuntimeError::RunFailed`]; a run that never terminates is
//! cut off at the poll deadline as [`RuntimeError::TimedOut`] — unknown
//! statuses are polled like in-progress ones and bounded the same way.

use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, histogram};
use tokio::time::Instant;
use tracing::{info, instrument, warn};

use garcon_assistant::{AssistantRuntime, RunStatus};
use garcon_core::domain::{Establishment, Patron};
use garcon_tools::{ToolContext, ToolDeps, ToolRegistry};

use crate::dispatcher::execute_tool_calls;
use crate::errors::RuntimeError;

/// Drives one conversation turn against the assistant runtime.
pub struct RunDriver {
    runtime: Arc<dyn AssistantRuntime>,
    registry: Arc<ToolRegistry>,
    deps: Arc<ToolDeps>,
    poll_interval: Duration,
    poll_deadline: Duration,
}

impl RunDriver {
    /// Build a driver.
    pub fn new(
        runtime: Arc<dyn AssistantRuntime>,
        registry: Arc<ToolRegistry>,
        deps: Arc<ToolDeps>,
        poll_interval: Duration,
        poll_deadline: Duration,
    ) -> Self {
        Self {
            runtime,
            registry,
            deps,
            poll_interval,
            poll_deadline,
        }
    }

    /// Execute one turn and return the assistant's reply texts in
    /// chronological order.
    #[instrument(skip_all, fields(patron = %patron.phone_number, establishment_id = %establishment.id))]
    pub async fn run(
        &self,
        patron: &Patron,
        establishment: &Establishment,
    ) -> Result<Vec<String>, RuntimeError> {
        let run_id = self
            .runtime
            .create_run(&patron.thread_id, &establishment.instructions)
            .await?;
        let started = Instant::now();

        loop {
            let snapshot = self.runtime.retrieve_run(&patron.thread_id, &run_id).await?;
            match snapshot.status {
                RunStatus::Completed => break,
                RunStatus::RequiresAction => {
                    // Fresh context per batch; the patron binding may matter
                    // to every handler.
                    let ctx = ToolContext {
                        patron: patron.clone(),
                        establishment: establishment.clone(),
                        deps: Arc::clone(&self.deps),
                    };
                    let outputs =
                        execute_tool_calls(&snapshot.tool_calls, &self.registry, &ctx).await;
                    self.runtime
                        .submit_tool_outputs(&patron.thread_id, &run_id, &outputs)
                        .await?;
                }
                status if status.is_failure() => {
                    warn!(?status, run_id = %run_id, "run ended in failure status");
                    counter!("garcon_runs_total", "outcome" => "failed").increment(1);
                    return Err(RuntimeError::RunFailed { status });
                }
                // Queued, in progress, or a status this build does not
                // know: keep polling until the deadline decides.
                _ => {}
            }

            if started.elapsed() >= self.poll_deadline {
                warn!(run_id = %run_id, waited = ?started.elapsed(), "run poll deadline exceeded");
                counter!("garcon_runs_total", "outcome" => "timed_out").increment(1);
                return Err(RuntimeError::TimedOut {
                    waited: started.elapsed(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }

        let mut texts = self
            .runtime
            .list_run_messages(&patron.thread_id, &run_id)
            .await?;
        // The runtime returns newest-first; replies go out oldest-first.
        texts.reverse();

        counter!("garcon_runs_total", "outcome" => "completed").increment(1);
        histogram!("garcon_run_duration_seconds").record(started.elapsed().as_secs_f64());
        info!(run_id = %run_id, replies = texts.len(), "run completed");
        Ok(texts)
    }
}
