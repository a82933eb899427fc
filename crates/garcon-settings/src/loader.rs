//! Settings loading: defaults → JSON file → environment overrides.

use std::path::Path;

use serde_json::Value;

use crate::errors::Result;
use crate::types::GarconSettings;

/// Default settings file name, resolved relative to the working directory.
pub const SETTINGS_FILE: &str = "garcon.json";

/// Load settings from [`SETTINGS_FILE`] if present, then apply `GARCON_*`
/// environment overrides. A missing file is not an error — defaults apply.
pub fn load_settings() -> Result<GarconSettings> {
    load_settings_from_path(Path::new(SETTINGS_FILE))
}

/// Load settings from a specific file path with env overrides applied.
pub fn load_settings_from_path(path: &Path) -> Result<GarconSettings> {
    let mut merged = serde_json::to_value(GarconSettings::default())?;

    if path.exists() {
        let raw = std::fs::read_to_string(path)?;
        let file_value: Value = serde_json::from_str(&raw)?;
        deep_merge(&mut merged, &file_value);
        tracing::debug!(?path, "settings file merged");
    }

    let mut settings: GarconSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursively merge `overlay` into `base`. Objects merge key-by-key; any
/// other value in the overlay replaces the base value wholesale.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => {
                        let _ = base_map.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value.clone();
        }
    }
}

/// Apply `GARCON_*` environment variable overrides (highest priority).
fn apply_env_overrides(settings: &mut GarconSettings) {
    if let Ok(v) = std::env::var("GARCON_ASSISTANT_API_KEY") {
        settings.assistant.api_key = Some(v);
    }
    if let Ok(v) = std::env::var("GARCON_ASSISTANT_ID") {
        settings.assistant.assistant_id = Some(v);
    }
    if let Ok(v) = std::env::var("GARCON_PAYMENT_API_KEY") {
        settings.payment.api_key = Some(v);
    }
    if let Ok(v) = std::env::var("GARCON_GEOCODING_API_KEY") {
        settings.geocoding.api_key = Some(v);
    }
    if let Ok(v) = std::env::var("GARCON_DB_PATH") {
        settings.database.path = v;
    }
    if let Ok(v) = std::env::var("GARCON_DEBOUNCE_WINDOW_SECS")
        && let Ok(secs) = v.parse()
    {
        settings.orchestrator.debounce_window_secs = secs;
    }
}
