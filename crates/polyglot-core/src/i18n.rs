//! Translation runtime.
//!
//! - **Store**: locale tables loaded from JSON bundles ([`store`]).
//! - **Plural rules**: CLDR category selection per language ([`plural`]).
//! - **Interpolation**: `{{name}}` and `%{name}` placeholders ([`interpolate`]).
//! - **Lookup**: locale chains, pluralization and missing markers ([`I18n`]).
//! - **Activation**: thread-local `activate()`, `deactivate()`, `get_language()`.
//!
//! ## Quick Start
//!
//! ```
//! use polyglot_core::i18n::{self, TranslateOptions};
//!
//! i18n::store::load_bundle(r#"{"bg": {"js": {"hello": "Здравей, {{name}}!"}}}"#).unwrap();
//!
//! i18n::activate("bg");
//! let opts = TranslateOptions::new().value("name", "Мария");
//! assert_eq!(i18n::t("js.hello", &opts), "Здравей, Мария!");
//! i18n::deactivate();
//! ```

pub mod interpolate;
pub mod lazy;
pub mod number;
pub mod plural;
pub mod runtime;
pub mod store;

use std::cell::RefCell;

pub use interpolate::{Value, Values};
pub use lazy::LazyTranslation;
pub use plural::{PluralCategory, PluralRule};
pub use runtime::{I18n, I18nConfig, TranslateOptions};
pub use store::{Node, Translations};

use crate::settings::SETTINGS;

// ── Thread-local language state ──────────────────────────────────────────

thread_local! {
    static CURRENT_LANGUAGE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Activates the given locale for the current thread.
///
/// # Examples
///
/// ```
/// use polyglot_core::i18n;
///
/// i18n::activate("bg");
/// assert_eq!(i18n::get_language(), "bg");
/// i18n::deactivate();
/// ```
pub fn activate(locale: &str) {
    CURRENT_LANGUAGE.with(|cell| {
        *cell.borrow_mut() = Some(locale.to_string());
    });
}

/// Clears the current thread's locale, reverting to the configured one.
pub fn deactivate() {
    CURRENT_LANGUAGE.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

/// Returns the locale active on the current thread.
///
/// Falls back to `SETTINGS.locale` when configured, otherwise `"en"`.
pub fn get_language() -> String {
    CURRENT_LANGUAGE.with(|cell| {
        cell.borrow().clone().unwrap_or_else(|| {
            SETTINGS
                .try_get()
                .map_or_else(|| runtime::ROOT_LOCALE.to_string(), |s| s.locale.clone())
        })
    })
}

/// Runs `f` with `locale` active, restoring the previous state afterwards.
pub fn with_locale<R>(locale: &str, f: impl FnOnce() -> R) -> R {
    let previous = CURRENT_LANGUAGE.with(|cell| cell.borrow().clone());
    activate(locale);
    let result = f();
    CURRENT_LANGUAGE.with(|cell| {
        *cell.borrow_mut() = previous;
    });
    result
}

// ── Global shortcuts ─────────────────────────────────────────────────────

/// Translates `scope` against the process-wide store.
pub fn t(scope: &str, options: &TranslateOptions) -> String {
    I18n::global().translate(scope, options)
}

/// Translates `scope` with a count against the process-wide store.
///
/// # Examples
///
/// ```
/// use polyglot_core::i18n::{self, TranslateOptions};
///
/// i18n::store::load_bundle(
///     r#"{"bg": {"js": {"likes": {"one": "1 харесване", "other": "%{count} харесвания"}}}}"#,
/// ).unwrap();
/// let bg = TranslateOptions::new().locale("bg");
/// assert_eq!(i18n::p(1, "js.likes", &bg), "1 харесване");
/// assert_eq!(i18n::p(12, "js.likes", &bg), "12 харесвания");
/// ```
pub fn p(count: impl Into<f64>, scope: &str, options: &TranslateOptions) -> String {
    I18n::global().pluralize(count, scope, options)
}

/// Returns `true` if `scope` resolves for the current locale.
pub fn exists(scope: &str) -> bool {
    I18n::global().exists(scope, &get_language())
}

/// Returns a translation evaluated each time it is displayed.
pub fn t_lazy(scope: &str, options: TranslateOptions) -> LazyTranslation {
    LazyTranslation::new(scope, options)
}
