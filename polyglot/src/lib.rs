//! # polyglot
//!
//! Translation lookup with CLDR plural rules and interpolation, calendar
//! arithmetic, localised date formatting and a packed timezone database.
//!
//! This is the meta-crate re-exporting the sub-crates. Depend on it for
//! everything, or on the individual crates for finer-grained control.
//!
//! ## Quick Start
//!
//! ```
//! use polyglot::core::bundled::bundled_translations;
//! use polyglot::core::i18n::{I18n, TranslateOptions};
//!
//! let i18n = I18n::from_translations(bundled_translations().unwrap());
//! let opts = TranslateOptions::new().locale("bg");
//! assert_eq!(i18n.pluralize(5, "js.topic.replies", &opts), "5 отговора");
//! ```

/// Store, plural rules, interpolation, lookup, settings and errors.
pub use polyglot_core as core;

/// Calendar arithmetic, strftime, relative ages and time zones.
#[cfg(feature = "tz")]
pub use polyglot_tz as tz;

/// The management command framework.
#[cfg(feature = "cli")]
pub use polyglot_cli as cli;

/// Third-party crates re-exported for convenience.
pub use chrono;
pub use serde_json;
pub use tracing;

/// The most commonly used items.
pub mod prelude {
    pub use polyglot_core::i18n::{p, t, I18n, TranslateOptions, Translations};
    pub use polyglot_core::{PolyglotError, PolyglotResult, Settings, SETTINGS};

    #[cfg(feature = "tz")]
    pub use polyglot_tz::{calendar::Unit, relative::Style, TzDatabase, Zone};
}
