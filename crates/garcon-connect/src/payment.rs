//! Stripe checkout sessions and webhook event parsing.
//!
//! Checkout sessions are created over the form-encoded Stripe API with one
//! BRL line item per order item. Webhook payloads are parsed by
//! [`parse_checkout_event`], a pure function the payment flow calls with the
//! already-deserialized event body.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::info;

use garcon_core::domain::Order;

use crate::errors::ConnectError;

/// A newly created checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    /// Session ID (`cs_...`), stored on the order for webhook correlation.
    pub id: String,
    /// URL the patron opens to pay.
    pub url: String,
}

/// Outcome of a checkout webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutEvent {
    /// The session the event refers to.
    pub session_id: String,
    /// `true` only for `checkout.session.completed`.
    pub success: bool,
}

/// Payment gateway boundary.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a checkout session for an order. Every line item is priced in
    /// BRL from the menu item's stored price.
    async fn create_checkout_session(&self, order: &Order)
    -> Result<CheckoutSession, ConnectError>;
}

/// Configuration for [`StripeGateway`].
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// API base URL (`https://api.stripe.com`).
    pub base_url: String,
    /// Secret API key.
    pub api_key: Option<String>,
    /// Redirect target after successful payment.
    pub success_url: String,
    /// Redirect target after abandoned payment.
    pub cancel_url: String,
}

/// Stripe-backed payment gateway.
pub struct StripeGateway {
    base_url: String,
    api_key: String,
    success_url: String,
    cancel_url: String,
    client: reqwest::Client,
}

impl StripeGateway {
    /// Build a gateway from config.
    pub fn new(config: StripeConfig) -> Result<Self, ConnectError> {
        let api_key = config
            .api_key
            .ok_or(ConnectError::MissingCredential("payment.apiKey"))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            success_url: config.success_url,
            cancel_url: config.cancel_url,
            client: reqwest::Client::new(),
        })
    }

    /// Flatten an order into Stripe's bracketed form params.
    fn build_form(&self, order: &Order) -> Result<Vec<(String, String)>, ConnectError> {
        let mut form = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), self.success_url.clone()),
            ("cancel_url".to_string(), self.cancel_url.clone()),
        ];
        for (i, item) in order.items.iter().enumerate() {
            let cents = item.menu_item.price_cents().ok_or_else(|| {
                ConnectError::InvalidInput(format!(
                    "menu item {} has unparseable price {:?}",
                    item.menu_item.id, item.menu_item.price
                ))
            })?;
            form.push((
                format!("line_items[{i}][price_data][currency]"),
                "brl".to_string(),
            ));
            form.push((
                format!("line_items[{i}][price_data][product_data][name]"),
                item.menu_item.name.clone(),
            ));
            form.push((
                format!("line_items[{i}][price_data][unit_amount]"),
                cents.to_string(),
            ));
            form.push((format!("line_items[{i}][quantity]"), item.amount.to_string()));
        }
        Ok(form)
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout_session(
        &self,
        order: &Order,
    ) -> Result<CheckoutSession, ConnectError> {
        let form = self.build_form(order)?;
        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .form(&form)
            .send()
            .await?;
        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            let message = payload
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("no error message")
                .to_string();
            return Err(ConnectError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let id = payload
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ConnectError::UnexpectedResponse("session without id".into()))?
            .to_string();
        let url = payload
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| ConnectError::UnexpectedResponse("session without url".into()))?
            .to_string();
        info!(order_id = %order.id, session_id = %id, "checkout session created");
        Ok(CheckoutSession { id, url })
    }
}

/// Extract the session outcome from a checkout webhook event body.
///
/// Only `checkout.session.completed` counts as success; every other
/// checkout session event (`async_payment_failed`, `expired`, ...) is a
/// failure for the referenced session.
pub fn parse_checkout_event(payload: &Value) -> Result<CheckoutEvent, ConnectError> {
    let session_id = payload
        .pointer("/data/object/id")
        .and_then(Value::as_str)
        .ok_or_else(|| ConnectError::UnexpectedResponse("event without session id".into()))?
        .to_string();
    let kind = payload
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ConnectError::UnexpectedResponse("event without type".into()))?;
    Ok(CheckoutEvent {
        session_id,
        success: kind == "checkout.session.completed",
    })
}
