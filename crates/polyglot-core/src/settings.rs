//! Settings for polyglot.
//!
//! This module provides the [`Settings`] struct, which holds runtime
//! configuration for translation lookup, logging and time zones, and
//! [`LazySettings`], a globally-accessible, lazily-initialized instance.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// What to render when a translation key cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingBehaviour {
    /// Render a bracketed `[locale.scope]` marker.
    #[default]
    Message,
    /// Render a humanised guess from the last key segment.
    Guess,
}

/// The complete set of polyglot settings.
///
/// # Examples
///
/// ```
/// use polyglot_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.default_locale, "en");
/// assert!(settings.enable_fallbacks);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,

    // ── Translation ──────────────────────────────────────────────────

    /// The locale every lookup chain ends with before `"en"`.
    pub default_locale: String,
    /// The locale active when nothing else has been activated.
    pub locale: String,
    /// An extra locale tried after the requested one.
    pub fallback_locale: Option<String>,
    /// Whether to walk the fallback chain at all.
    pub enable_fallbacks: bool,
    /// What to render for missing keys.
    pub missing_behaviour: MissingBehaviour,
    /// Text prepended to guessed translations.
    pub missing_translation_prefix: String,
    /// Directories scanned for `*.json` bundles at startup.
    pub locale_dirs: Vec<PathBuf>,

    // ── Time ─────────────────────────────────────────────────────────

    /// The default time zone name (e.g. "UTC", "Europe/Sofia").
    pub time_zone: String,
    /// Optional packed timezone bundle replacing the bundled data.
    pub tz_data: Option<PathBuf>,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,

            default_locale: "en".to_string(),
            locale: "en".to_string(),
            fallback_locale: None,
            enable_fallbacks: true,
            missing_behaviour: MissingBehaviour::Message,
            missing_translation_prefix: String::new(),
            locale_dirs: Vec::new(),

            time_zone: "UTC".to_string(),
            tz_data: None,

            log_level: "info".to_string(),

            extra: HashMap::new(),
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup to set the
/// settings, then use [`get`](LazySettings::get) to access them.
///
/// # Panics
///
/// [`get`](LazySettings::get) panics if settings have not been configured.
/// [`configure`](LazySettings::configure) panics if called more than once.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called exactly once.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured.
    pub fn configure(&self, settings: Settings) {
        self.inner
            .set(settings)
            .expect("Settings have already been configured");
    }

    /// Returns a reference to the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if settings have not been configured.
    pub fn get(&self) -> &Settings {
        self.inner
            .get()
            .expect("Settings have not been configured. Call SETTINGS.configure() first.")
    }

    /// Returns the configured settings, if any.
    pub fn try_get(&self) -> Option<&Settings> {
        self.inner.get()
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
///
/// Call `SETTINGS.configure(settings)` once at application startup. Code that
/// runs before that (or in tests) sees [`Settings::default`] through
/// [`LazySettings::try_get`].
pub static SETTINGS: LazySettings = LazySettings::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.default_locale, "en");
        assert_eq!(s.locale, "en");
        assert!(s.fallback_locale.is_none());
        assert!(s.enable_fallbacks);
        assert_eq!(s.missing_behaviour, MissingBehaviour::Message);
        assert!(s.missing_translation_prefix.is_empty());
        assert!(s.locale_dirs.is_empty());
        assert_eq!(s.time_zone, "UTC");
        assert!(s.tz_data.is_none());
        assert_eq!(s.log_level, "info");
    }

    #[test]
    fn test_missing_behaviour_serde() {
        let json = serde_json::to_string(&MissingBehaviour::Guess).unwrap();
        assert_eq!(json, "\"guess\"");
        let back: MissingBehaviour = serde_json::from_str("\"message\"").unwrap();
        assert_eq!(back, MissingBehaviour::Message);
    }

    #[test]
    fn test_lazy_settings_configure_and_get() {
        let lazy = LazySettings::new();
        assert!(!lazy.is_configured());
        assert!(lazy.try_get().is_none());

        let mut settings = Settings::default();
        settings.debug = false;
        settings.locale = "bg".to_string();

        lazy.configure(settings);
        assert!(lazy.is_configured());
        assert!(!lazy.get().debug);
        assert_eq!(lazy.get().locale, "bg");
    }

    #[test]
    #[should_panic(expected = "already been configured")]
    fn test_lazy_settings_double_configure_panics() {
        let lazy = LazySettings::new();
        lazy.configure(Settings::default());
        lazy.configure(Settings::default());
    }

    #[test]
    #[should_panic(expected = "not been configured")]
    fn test_lazy_settings_get_before_configure_panics() {
        let lazy = LazySettings::new();
        let _ = lazy.get();
    }
}
