//! Outbound messaging over the WhatsApp Cloud API.
//!
//! Credentials are per establishment: each tenant has its own Graph API
//! token and phone-number ID, so the client takes the establishment on
//! every send instead of holding a token itself.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use garcon_core::domain::Establishment;

use crate::errors::ConnectError;

/// Outbound messenger boundary.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a plain text message from the establishment's WhatsApp number
    /// to a patron's phone number.
    async fn send_text(
        &self,
        establishment: &Establishment,
        to: &str,
        body: &str,
    ) -> Result<(), ConnectError>;
}

/// WhatsApp Cloud API messenger.
pub struct WhatsAppCloud {
    base_url: String,
    client: reqwest::Client,
}

impl WhatsAppCloud {
    /// Build a messenger against the given Graph API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Messenger for WhatsAppCloud {
    async fn send_text(
        &self,
        establishment: &Establishment,
        to: &str,
        body: &str,
    ) -> Result<(), ConnectError> {
        let url = format!("{}/{}/messages", self.base_url, establishment.whatsapp_number_id);
        let payload = json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": to,
            "type": "text",
            "text": { "preview_url": false, "body": body },
        });
        let response = self
            .client
            .post(url)
            .bearer_auth(&establishment.whatsapp_api_key)
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let payload: Value = response.json().await.unwrap_or(Value::Null);
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
        debug!(establishment_id = %establishment.id, to, "message sent");
        Ok(())
    }
}
