//! Orchestrator facade: the public entry points of the conversational
//! backend.
//!
//! `on_inbound_message` appends to the conversation and arms the debounce
//! timer; `on_flush_tick` drains due conversations and runs each turn
//! concurrently, forwarding replies over WhatsApp. The pending map is the
//! only shared mutable state; everything slow happens after entries have
//! left it, so one stuck conversation never blocks the others.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use garcon_assistant::AssistantRuntime;
use garcon_connect::Messenger;
use garcon_core::domain::{Establishment, Patron};
use garcon_core::ids::ConversationId;
use garcon_settings::GarconSettings;
use garcon_store::{ConnectionPool, EstablishmentRepo, PatronRepo};
use garcon_tools::{ToolDeps, ToolRegistry};

use crate::debounce::DebounceScheduler;
use crate::driver::RunDriver;
use crate::errors::RuntimeError;

/// Patron-safe reply sent when a whole turn fails.
pub const RUN_FAILURE_REPLY: &str =
    "Não consegui responder agora. Pode tentar de novo em instantes?";

/// Identifies one pending conversation across tenants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    /// The tenant the conversation belongs to.
    pub establishment_id: garcon_core::ids::EstablishmentId,
    /// The conversation, keyed by the patron's phone number.
    pub conversation: ConversationId,
}

/// Timing knobs for the orchestrator, usually read from settings.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Quiescence window before a turn is due.
    pub debounce_window: Duration,
    /// Interval between assistant run polls.
    pub poll_interval: Duration,
    /// Maximum wall-clock duration of one run.
    pub poll_deadline: Duration,
}

impl From<&GarconSettings> for OrchestratorConfig {
    fn from(settings: &GarconSettings) -> Self {
        Self {
            debounce_window: Duration::from_secs(settings.orchestrator.debounce_window_secs),
            poll_interval: Duration::from_millis(settings.assistant.poll_interval_ms),
            poll_deadline: Duration::from_secs(settings.assistant.poll_timeout_secs),
        }
    }
}

/// The debounced conversational orchestrator.
pub struct Orchestrator {
    scheduler: DebounceScheduler<ConversationKey>,
    driver: RunDriver,
    runtime: Arc<dyn AssistantRuntime>,
    messenger: Arc<dyn Messenger>,
    pool: ConnectionPool,
    window: Duration,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Wire up the orchestrator.
    pub fn new(
        config: &OrchestratorConfig,
        runtime: Arc<dyn AssistantRuntime>,
        messenger: Arc<dyn Messenger>,
        registry: Arc<ToolRegistry>,
        deps: Arc<ToolDeps>,
        pool: ConnectionPool,
    ) -> Self {
        Self {
            scheduler: DebounceScheduler::new(),
            driver: RunDriver::new(
                Arc::clone(&runtime),
                registry,
                deps,
                config.poll_interval,
                config.poll_deadline,
            ),
            runtime,
            messenger,
            pool,
            window: config.debounce_window,
        }
    }

    /// Handle one inbound message: bind the patron (creating the assistant
    /// thread lazily on first contact), append the message to the thread,
    /// and arm the debounce timer.
    #[instrument(skip_all, fields(establishment_id = %establishment.id, phone))]
    pub async fn on_inbound_message(
        &self,
        establishment: &Establishment,
        phone: &str,
        text: &str,
    ) -> Result<(), RuntimeError> {
        let existing = {
            let conn = self.pool.get()?;
            PatronRepo::get_by_phone(&conn, phone, &establishment.id)?
        };
        let patron = match existing {
            Some(patron) => patron,
            None => {
                let thread_id = self.runtime.create_thread().await?;
                let patron = Patron {
                    phone_number: phone.to_string(),
                    thread_id,
                    establishment_id: establishment.id.clone(),
                };
                let conn = self.pool.get()?;
                PatronRepo::insert(&conn, &patron)?;
                info!(phone, thread_id = %patron.thread_id, "patron bound to new thread");
                patron
            }
        };

        self.runtime
            .add_user_message(&patron.thread_id, text)
            .await?;
        self.scheduler.request(ConversationKey {
            establishment_id: establishment.id.clone(),
            conversation: ConversationId::new(phone),
        });
        debug!(pending = self.scheduler.len(), "message accepted");
        Ok(())
    }

    /// Drain every due conversation and run its turn. Turns run
    /// concurrently; only the conversations whose turn actually executed
    /// are returned — drained-but-unresolvable ones are dropped.
    pub async fn on_flush_tick(&self) -> Vec<ConversationKey> {
        let due = self.scheduler.take_due(Instant::now(), self.window);
        if due.is_empty() {
            return due;
        }
        let turns = due.iter().map(|key| self.run_turn(key));
        let executed = futures::future::join_all(turns).await;
        due.into_iter()
            .zip(executed)
            .filter_map(|(key, ran)| ran.then_some(key))
            .collect()
    }

    /// Returns `true` when a run was driven for the conversation, whether
    /// it completed or failed.
    async fn run_turn(&self, key: &ConversationKey) -> bool {
        let (patron, establishment) = match self.resolve(key) {
            Ok(Some(pair)) => pair,
            Ok(None) => {
                // No recipient to answer; drop the turn, keep the map clean.
                warn!(conversation = %key.conversation, "due conversation has no patron, dropping");
                return false;
            }
            Err(e) => {
                error!(conversation = %key.conversation, error = %e, "failed to resolve conversation");
                return false;
            }
        };

        match self.driver.run(&patron, &establishment).await {
            Ok(replies) => {
                for text in replies {
                    if let Err(e) = self
                        .messenger
                        .send_text(&establishment, &patron.phone_number, &text)
                        .await
                    {
                        error!(conversation = %key.conversation, error = %e, "reply delivery failed");
                    }
                }
            }
            Err(e) => {
                error!(conversation = %key.conversation, error = %e, "turn failed");
                if let Err(e) = self
                    .messenger
                    .send_text(&establishment, &patron.phone_number, RUN_FAILURE_REPLY)
                    .await
                {
                    error!(conversation = %key.conversation, error = %e, "failure reply delivery failed");
                }
            }
        }
        true
    }

    fn resolve(
        &self,
        key: &ConversationKey,
    ) -> Result<Option<(Patron, Establishment)>, RuntimeError> {
        let conn = self.pool.get()?;
        let Some(patron) =
            PatronRepo::get_by_phone(&conn, key.conversation.as_str(), &key.establishment_id)?
        else {
            return Ok(None);
        };
        let Some(establishment) = EstablishmentRepo::get_by_id(&conn, &key.establishment_id)?
        else {
            return Ok(None);
        };
        Ok(Some((patron, establishment)))
    }
}

/// Spawn the periodic flush task. Cancel the token to stop it.
pub fn spawn_flush_loop(
    orchestrator: Arc<Orchestrator>,
    interval: Duration,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let _ = orchestrator.on_flush_tick().await;
                }
            }
        }
    })
}
