//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML files, JSON
//! files, and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `POLYGLOT_DEBUG` | `debug` |
//! | `POLYGLOT_LOG_LEVEL` | `log_level` |
//! | `POLYGLOT_LOCALE` | `locale` |
//! | `POLYGLOT_DEFAULT_LOCALE` | `default_locale` |
//! | `POLYGLOT_FALLBACK_LOCALE` | `fallback_locale` (empty clears it) |
//! | `POLYGLOT_ENABLE_FALLBACKS` | `enable_fallbacks` |
//! | `POLYGLOT_TIME_ZONE` | `time_zone` |
//! | `POLYGLOT_TZ_DATA` | `tz_data` |
//! | `POLYGLOT_LOCALE_DIRS` | `locale_dirs` (colon-separated) |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use polyglot_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/polyglot.toml").unwrap();
//! let settings = settings_loader::from_json_file_with_env("config/polyglot.json").unwrap();
//! ```

use std::path::{Path, PathBuf};

use crate::error::PolyglotError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, PolyglotError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| PolyglotError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, PolyglotError> {
    from_toml_str(&read_config(path.as_ref(), "TOML")?)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, PolyglotError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, PolyglotError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| PolyglotError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, PolyglotError> {
    from_json_str(&read_config(path.as_ref(), "JSON")?)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, PolyglotError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a file, choosing the format by extension.
///
/// `.toml` files are parsed as TOML, everything else as JSON. Environment
/// overrides are applied afterwards.
pub fn from_file_with_env(path: impl AsRef<Path>) -> Result<Settings, PolyglotError> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => from_toml_file_with_env(path),
        _ => from_json_file_with_env(path),
    }
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// Boolean variables accept "true"/"1"/"yes" (case-insensitive) as true and
/// anything else as false.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("POLYGLOT_DEBUG") {
        settings.debug = parse_bool(&val);
    }

    if let Ok(val) = std::env::var("POLYGLOT_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("POLYGLOT_LOCALE") {
        settings.locale = val;
    }

    if let Ok(val) = std::env::var("POLYGLOT_DEFAULT_LOCALE") {
        settings.default_locale = val;
    }

    if let Ok(val) = std::env::var("POLYGLOT_FALLBACK_LOCALE") {
        let val = val.trim().to_string();
        settings.fallback_locale = if val.is_empty() { None } else { Some(val) };
    }

    if let Ok(val) = std::env::var("POLYGLOT_ENABLE_FALLBACKS") {
        settings.enable_fallbacks = parse_bool(&val);
    }

    if let Ok(val) = std::env::var("POLYGLOT_TIME_ZONE") {
        settings.time_zone = val;
    }

    if let Ok(val) = std::env::var("POLYGLOT_TZ_DATA") {
        settings.tz_data = Some(PathBuf::from(val));
    }

    if let Ok(val) = std::env::var("POLYGLOT_LOCALE_DIRS") {
        settings.locale_dirs = val
            .split(':')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();
    }
}

// ============================================================
// Helpers
// ============================================================

fn parse_bool(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn read_config(path: &Path, format: &str) -> Result<String, PolyglotError> {
    std::fs::read_to_string(path).map_err(|e| {
        PolyglotError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(value: serde_json::Value, format: &str) -> Result<Settings, PolyglotError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        PolyglotError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        PolyglotError::ConfigurationError(format!(
            "Failed to deserialize settings from {format}: {e}"
        ))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
