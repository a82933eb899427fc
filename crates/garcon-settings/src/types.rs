//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`
//! so partial JSON files work — missing fields get their default value
//! during deserialization.

use serde::{Deserialize, Serialize};

/// Root settings type for the Garcon backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GarconSettings {
    /// Settings schema version.
    pub version: String,
    /// Assistant runtime settings.
    pub assistant: AssistantSettings,
    /// Orchestrator timing settings.
    pub orchestrator: OrchestratorSettings,
    /// Database settings.
    pub database: DatabaseSettings,
    /// Payment gateway settings.
    pub payment: PaymentSettings,
    /// Outbound messaging settings.
    pub messaging: MessagingSettings,
    /// Geocoding settings.
    pub geocoding: GeocodingSettings,
}

impl Default for GarconSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            assistant: AssistantSettings::default(),
            orchestrator: OrchestratorSettings::default(),
            database: DatabaseSettings::default(),
            payment: PaymentSettings::default(),
            messaging: MessagingSettings::default(),
            geocoding: GeocodingSettings::default(),
        }
    }
}

/// Assistant runtime (OpenAI Assistants API) settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssistantSettings {
    /// API base URL.
    pub base_url: String,
    /// API key. No default; must come from file or `GARCON_ASSISTANT_API_KEY`.
    pub api_key: Option<String>,
    /// ID of the pre-configured assistant.
    pub assistant_id: Option<String>,
    /// Interval between run-status polls, in milliseconds.
    pub poll_interval_ms: u64,
    /// Maximum wall-clock duration of one run before it is timed out, in seconds.
    pub poll_timeout_secs: u64,
    /// Maximum retries for transient network failures per request.
    pub max_transient_retries: u32,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            assistant_id: None,
            poll_interval_ms: 500,
            poll_timeout_secs: 120,
            max_transient_retries: 2,
        }
    }
}

/// Orchestrator timing settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrchestratorSettings {
    /// Quiescence window after the last inbound message before a turn is
    /// due, in seconds.
    pub debounce_window_secs: u64,
    /// Interval between flush ticks, in seconds.
    pub flush_interval_secs: u64,
    /// Fixed safety margin added to every ETA, in minutes.
    pub eta_margin_minutes: u32,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            debounce_window_secs: 10,
            flush_interval_secs: 1,
            eta_margin_minutes: 10,
        }
    }
}

/// Database settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    /// Path to the SQLite database file.
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "garcon.db".to_string(),
        }
    }
}

/// Payment gateway (Stripe) settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentSettings {
    /// API base URL.
    pub base_url: String,
    /// Secret API key. No default; must come from file or `GARCON_PAYMENT_API_KEY`.
    pub api_key: Option<String>,
    /// Where the checkout redirects on success.
    pub success_url: String,
    /// Where the checkout redirects on cancellation.
    pub cancel_url: String,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.stripe.com".to_string(),
            api_key: None,
            success_url: "https://www.google.com".to_string(),
            cancel_url: "https://www.google.com".to_string(),
        }
    }
}

/// Outbound messaging (WhatsApp Cloud API) settings.
///
/// Per-establishment credentials live in the store; only the Graph API base
/// URL is global.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessagingSettings {
    /// Graph API base URL.
    pub base_url: String,
}

impl Default for MessagingSettings {
    fn default() -> Self {
        Self {
            base_url: "https://graph.facebook.com/v19.0".to_string(),
        }
    }
}

/// Geocoding (Google Maps) settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeocodingSettings {
    /// API base URL.
    pub base_url: String,
    /// API key. No default; must come from file or `GARCON_GEOCODING_API_KEY`.
    pub api_key: Option<String>,
}

impl Default for GeocodingSettings {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com".to_string(),
            api_key: None,
        }
    }
}
