//! Shared test fixtures: scripted assistant runtime, recording messenger
//! and payment gateway, seeded in-memory store.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use garcon_assistant::{
    AssistantError, AssistantRuntime, RunSnapshot, RunStatus, ToolCall, ToolOutput,
};
use garcon_connect::{
    CheckoutSession, ConnectError, Geocoder, Messenger, PaymentGateway,
};
use garcon_core::domain::{Address, Establishment, MenuItem, Order, Patron};
use garcon_core::ids::{AddressId, EstablishmentId, MenuItemId, RunId, ThreadId};
use garcon_store::{
    AddressRepo, ConnectionPool, EstablishmentRepo, MenuItemRepo, PatronRepo, new_in_memory,
    run_migrations,
};
use garcon_tools::{OrderPlacement, PlacedOrder, ToolContext, ToolDeps, ToolError};

/// Assistant runtime that replays a scripted sequence of run snapshots.
pub struct FakeRuntime {
    script: Mutex<VecDeque<RunSnapshot>>,
    /// Status returned once the script is exhausted.
    pub fallback_status: RunStatus,
    /// Replies returned by `list_run_messages`, newest-first as the real
    /// API returns them.
    pub replies_newest_first: Vec<String>,
    pub threads_created: AtomicUsize,
    pub runs_created: AtomicUsize,
    pub user_messages: Mutex<Vec<(ThreadId, String)>>,
    pub submitted_batches: Mutex<Vec<Vec<ToolOutput>>>,
}

impl FakeRuntime {
    pub fn new(script: Vec<RunSnapshot>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback_status: RunStatus::Completed,
            replies_newest_first: Vec::new(),
            threads_created: AtomicUsize::new(0),
            runs_created: AtomicUsize::new(0),
            user_messages: Mutex::new(Vec::new()),
            submitted_batches: Mutex::new(Vec::new()),
        }
    }

    pub fn completing_with(replies_newest_first: Vec<&str>) -> Self {
        Self {
            replies_newest_first: replies_newest_first
                .into_iter()
                .map(String::from)
                .collect(),
            ..Self::new(vec![])
        }
    }

    pub fn snapshot(status: RunStatus, tool_calls: Vec<ToolCall>) -> RunSnapshot {
        RunSnapshot {
            id: RunId::new("run_1"),
            status,
            tool_calls,
        }
    }
}

#[async_trait]
impl AssistantRuntime for FakeRuntime {
    async fn create_thread(&self) -> Result<ThreadId, AssistantError> {
        let n = self.threads_created.fetch_add(1, Ordering::SeqCst);
        Ok(ThreadId::new(format!("thread_{n}")))
    }

    async fn add_user_message(&self, thread: &ThreadId, text: &str) -> Result<(), AssistantError> {
        self.user_messages
            .lock()
            .push((thread.clone(), text.to_string()));
        Ok(())
    }

    async fn create_run(
        &self,
        _thread: &ThreadId,
        _instructions: &str,
    ) -> Result<RunId, AssistantError> {
        let _ = self.runs_created.fetch_add(1, Ordering::SeqCst);
        Ok(RunId::new("run_1"))
    }

    async fn retrieve_run(
        &self,
        _thread: &ThreadId,
        run: &RunId,
    ) -> Result<RunSnapshot, AssistantError> {
        Ok(self.script.lock().pop_front().unwrap_or(RunSnapshot {
            id: run.clone(),
            status: self.fallback_status.clone(),
            tool_calls: vec![],
        }))
    }

    async fn submit_tool_outputs(
        &self,
        _thread: &ThreadId,
        _run: &RunId,
        outputs: &[ToolOutput],
    ) -> Result<(), AssistantError> {
        self.submitted_batches.lock().push(outputs.to_vec());
        Ok(())
    }

    async fn list_run_messages(
        &self,
        _thread: &ThreadId,
        _run: &RunId,
    ) -> Result<Vec<String>, AssistantError> {
        Ok(self.replies_newest_first.clone())
    }
}

/// Messenger that records every send.
#[derive(Default)]
pub struct FakeMessenger {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Messenger for FakeMessenger {
    async fn send_text(
        &self,
        _establishment: &Establishment,
        to: &str,
        body: &str,
    ) -> Result<(), ConnectError> {
        self.sent.lock().push((to.to_string(), body.to_string()));
        Ok(())
    }
}

/// Payment gateway that returns a fixed session.
pub struct FakeGateway;

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_checkout_session(
        &self,
        _order: &Order,
    ) -> Result<CheckoutSession, ConnectError> {
        Ok(CheckoutSession {
            id: "cs_test".into(),
            url: "https://pay.example/cs_test".into(),
        })
    }
}

/// Geocoder with fixed answers.
pub struct FakeGeocoder;

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn resolve_addresses(&self, _text: &str) -> Result<Vec<Value>, ConnectError> {
        Ok(vec![])
    }

    async fn travel_seconds(
        &self,
        _origin: &Address,
        _destination: &Address,
    ) -> Result<Option<u64>, ConnectError> {
        Ok(Some(600))
    }
}

/// Order placement that never places anything (for contexts whose tests
/// never order).
pub struct NoPlacement;

#[async_trait]
impl OrderPlacement for NoPlacement {
    async fn place_order(&self, _order: Order) -> Result<PlacedOrder, ToolError> {
        Err(ToolError::internal("placement not wired in this test"))
    }
}

pub fn establishment_address() -> Address {
    Address {
        id: AddressId::new("adr_est"),
        street: "Rua da Aurora".into(),
        number: "100".into(),
        complement: None,
        neighborhood: "Boa Vista".into(),
        city: "Recife".into(),
        state: "PE".into(),
        country: "Brasil".into(),
        zipcode: "50050-000".into(),
    }
}

pub fn establishment() -> Establishment {
    Establishment {
        id: EstablishmentId::new("est_1"),
        name: "Cantina da Vó".into(),
        address: establishment_address(),
        production_minutes: 30,
        contact_number: "+5581988880000".into(),
        instructions: "Entregamos só no Recife.".into(),
        whatsapp_api_key: "wa-token".into(),
        whatsapp_number_id: "1234567890".into(),
    }
}

pub fn patron() -> Patron {
    Patron {
        phone_number: "+5581999990000".into(),
        thread_id: ThreadId::new("thread_1"),
        establishment_id: EstablishmentId::new("est_1"),
    }
}

/// In-memory store seeded with the establishment, its address, one menu
/// item, and the default patron.
pub fn seeded_pool() -> ConnectionPool {
    let pool = new_in_memory().unwrap();
    let conn = pool.get().unwrap();
    run_migrations(&conn).unwrap();
    AddressRepo::insert(&conn, &establishment_address()).unwrap();
    EstablishmentRepo::insert(&conn, &establishment()).unwrap();
    MenuItemRepo::insert(
        &conn,
        &MenuItem {
            id: MenuItemId::new("item_1"),
            name: "Marmita G".into(),
            price: "25.90".into(),
            description: "Marmita grande".into(),
            is_active: true,
        },
        &EstablishmentId::new("est_1"),
    )
    .unwrap();
    PatronRepo::insert(&conn, &patron()).unwrap();
    pool
}

pub fn tool_deps(pool: ConnectionPool) -> Arc<ToolDeps> {
    Arc::new(ToolDeps {
        pool,
        geocoder: Arc::new(FakeGeocoder),
        orders: Arc::new(NoPlacement),
        eta_margin_minutes: 10,
    })
}

pub fn tool_context() -> ToolContext {
    ToolContext {
        patron: patron(),
        establishment: establishment(),
        deps: tool_deps(seeded_pool()),
    }
}
