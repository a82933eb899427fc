//! Core trait and the execution context for tool handlers.
//!
//! [`OrderPlacement`] inverts the dependency on the order service: the
//! runtime crate implements it, so `create_order` can place an order with a
//! checkout session without this crate knowing about payment gateways.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use garcon_connect::Geocoder;
use garcon_core::domain::{Establishment, Order, Patron};
use garcon_store::ConnectionPool;

use crate::errors::ToolError;

/// An order that has been persisted with an open checkout session.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    /// URL the patron opens to pay.
    pub payment_url: String,
    /// The stored order, checkout session attached.
    pub order: Order,
}

/// Places orders and opens their checkout sessions.
#[async_trait]
pub trait OrderPlacement: Send + Sync {
    /// Persist the order and create its checkout session.
    async fn place_order(&self, order: Order) -> Result<PlacedOrder, ToolError>;
}

/// Shared dependencies handed to every tool invocation.
pub struct ToolDeps {
    /// Database pool.
    pub pool: ConnectionPool,
    /// Geocoding client.
    pub geocoder: Arc<dyn Geocoder>,
    /// Order placement service.
    pub orders: Arc<dyn OrderPlacement>,
    /// Fixed safety margin added to every ETA, in minutes.
    pub eta_margin_minutes: u32,
}

/// Execution context for one tool call.
pub struct ToolContext {
    /// The patron whose conversation triggered the run.
    pub patron: Patron,
    /// The tenant the patron talks to. Every lookup is scoped to it.
    pub establishment: Establishment,
    /// Shared dependencies.
    pub deps: Arc<ToolDeps>,
}

/// The trait every tool handler implements.
///
/// Arguments arrive as the JSON object the assistant produced; the result
/// is the JSON the dispatcher serializes into the tool output. Argument
/// schemas live on the assistant configuration, not here.
#[async_trait]
pub trait GarconTool: Send + Sync {
    /// Tool name, the exact string the assistant calls.
    fn name(&self) -> &'static str;

    /// Execute the tool.
    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError>;
}
