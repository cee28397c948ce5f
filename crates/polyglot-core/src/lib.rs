//! # polyglot-core
//!
//! Translation store, plural rules, interpolation and the translation
//! runtime, together with the settings, logging and error types shared by
//! the other polyglot crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Runtime settings and global configuration
//! - [`settings_loader`] - TOML/JSON settings files and environment overrides
//! - [`logging`] - Tracing-based logging integration
//! - [`i18n`] - Store, plural rules, interpolation, lookup and number formatting
//! - [`bundled`] - English and Bulgarian bundles embedded in the binary

pub mod bundled;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{PolyglotError, PolyglotResult};
pub use i18n::{I18n, TranslateOptions, Translations};
pub use settings::{Settings, SETTINGS};
