//! # garcon-settings
//!
//! Configuration management with layered sources for the Garcon backend.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`GarconSettings::default()`]
//! 2. **JSON file** — `garcon.json` (deep-merged over defaults)
//! 3. **Environment variables** — `GARCON_*` overrides (highest priority)
//!
//! Credentials (assistant API key, payment API key, geocoding API key) have
//! no compiled default; constructing a client without them is a
//! configuration error surfaced immediately, never retried.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path};
pub use types::*;
