//! Geocoding and routing over the Google Maps web APIs.
//!
//! Two operations back the address tools: free-text address resolution
//! (places text search followed by a details lookup per candidate) and
//! travel time between two addresses (directions).

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use garcon_core::domain::Address;

use crate::errors::ConnectError;

/// Geocoding boundary.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve free-text into candidate addresses.
    ///
    /// Each candidate is a flat JSON object keyed by address component type
    /// (`route`, `street_number`, `sublocality_level_1`, ...), exactly the
    /// shape the assistant is prompted to read. Empty when nothing matched.
    async fn resolve_addresses(&self, text: &str) -> Result<Vec<Value>, ConnectError>;

    /// Travel time between two addresses in seconds. `None` when no route
    /// exists.
    async fn travel_seconds(
        &self,
        origin: &Address,
        destination: &Address,
    ) -> Result<Option<u64>, ConnectError>;
}

/// Configuration for [`GoogleMaps`].
#[derive(Debug, Clone)]
pub struct GoogleMapsConfig {
    /// API base URL (`https://maps.googleapis.com`).
    pub base_url: String,
    /// API key.
    pub api_key: Option<String>,
}

/// Google Maps web API client.
pub struct GoogleMaps {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GoogleMaps {
    /// Build a client from config.
    pub fn new(config: GoogleMapsConfig) -> Result<Self, ConnectError> {
        let api_key = config
            .api_key
            .ok_or(ConnectError::MissingCredential("geocoding.apiKey"))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        })
    }

    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, ConnectError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;
        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            let message = payload
                .get("error_message")
                .and_then(Value::as_str)
                .unwrap_or("no error message")
                .to_string();
            return Err(ConnectError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(payload)
    }

    /// Flatten `address_components` into `{type: long_name}`.
    fn flatten_components(components: &[Value]) -> Value {
        let mut flat = Map::new();
        for component in components {
            let Some(kind) = component
                .pointer("/types/0")
                .and_then(Value::as_str)
            else {
                continue;
            };
            let Some(name) = component.get("long_name").and_then(Value::as_str) else {
                continue;
            };
            let _ = flat.insert(kind.to_string(), Value::String(name.to_string()));
        }
        Value::Object(flat)
    }
}

#[async_trait]
impl Geocoder for GoogleMaps {
    async fn resolve_addresses(&self, text: &str) -> Result<Vec<Value>, ConnectError> {
        let search = self
            .get_json("/maps/api/place/textsearch/json", &[("query", text)])
            .await?;
        let place_ids: Vec<String> = search
            .get("results")
            .and_then(Value::as_array)
            .map(|results| {
                results
                    .iter()
                    .filter_map(|r| r.get("place_id").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        debug!(query = text, candidates = place_ids.len(), "places resolved");

        let mut details = Vec::with_capacity(place_ids.len());
        for place_id in &place_ids {
            let detail = self
                .get_json(
                    "/maps/api/place/details/json",
                    &[("place_id", place_id.as_str()), ("fields", "address_component")],
                )
                .await?;
            let components = detail
                .pointer("/result/address_components")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            details.push(Self::flatten_components(&components));
        }
        Ok(details)
    }

    async fn travel_seconds(
        &self,
        origin: &Address,
        destination: &Address,
    ) -> Result<Option<u64>, ConnectError> {
        let origin = origin.to_string();
        let destination = destination.to_string();
        let payload = self
            .get_json(
                "/maps/api/directions/json",
                &[("origin", origin.as_str()), ("destination", destination.as_str())],
            )
            .await?;
        Ok(payload
            .pointer("/routes/0/legs/0/duration/value")
            .and_then(Value::as_u64))
    }
}
