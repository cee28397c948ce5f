//! Lazy translations.
//!
//! [`LazyTranslation`] defers the lookup until the value is displayed, so it
//! can be built before bundles are loaded or a locale is activated.

use std::fmt;

use super::runtime::{I18n, TranslateOptions};

/// A translation evaluated against the global runtime each time it is
/// displayed, using the locale active on the calling thread at that moment
/// unless `options.locale` pins one.
///
/// # Examples
///
/// ```
/// use polyglot_core::i18n::{self, TranslateOptions};
/// use polyglot_core::i18n::lazy::LazyTranslation;
///
/// let title = LazyTranslation::new("js.lazy_doc.title", TranslateOptions::new());
/// assert_eq!(title.to_string(), "[en.js.lazy_doc.title]");
///
/// i18n::store::load_bundle(r#"{"pt": {"js": {"lazy_doc": {"title": "Olá"}}}}"#).unwrap();
/// i18n::activate("pt");
/// assert_eq!(title.to_string(), "Olá");
/// i18n::deactivate();
/// ```
#[derive(Clone, PartialEq)]
pub struct LazyTranslation {
    scope: String,
    options: TranslateOptions,
}

impl LazyTranslation {
    pub fn new(scope: impl Into<String>, options: TranslateOptions) -> Self {
        Self {
            scope: scope.into(),
            options,
        }
    }

    /// The untranslated dotted key.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub const fn options(&self) -> &TranslateOptions {
        &self.options
    }

    /// Resolves the translation now.
    pub fn evaluate(&self) -> String {
        I18n::global().translate(&self.scope, &self.options)
    }

    /// Resolves the translation with an explicit runtime.
    pub fn evaluate_with(&self, i18n: &I18n) -> String {
        i18n.translate(&self.scope, &self.options)
    }
}

impl fmt::Display for LazyTranslation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.evaluate())
    }
}

impl fmt::Debug for LazyTranslation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyTranslation")
            .field("scope", &self.scope)
            .field("count", &self.options.count)
            .finish_non_exhaustive()
    }
}

impl PartialEq<str> for LazyTranslation {
    fn eq(&self, other: &str) -> bool {
        self.evaluate() == other
    }
}

impl From<LazyTranslation> for String {
    fn from(lazy: LazyTranslation) -> Self {
        lazy.evaluate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::store::{self, Translations};

    #[test]
    fn test_lazy_follows_activation() {
        crate::i18n::deactivate();
        store::load_bundle(r#"{"lazy-test": {"js": {"lazy": {"greet": "Saludo"}}}}"#).unwrap();

        let lazy = LazyTranslation::new("js.lazy.greet", TranslateOptions::new());
        assert_eq!(lazy.to_string(), "[en.js.lazy.greet]");

        crate::i18n::activate("lazy-test");
        assert_eq!(lazy.to_string(), "Saludo");
        crate::i18n::deactivate();
    }

    #[test]
    fn test_lazy_pinned_locale_and_count() {
        store::load_bundle(
            r#"{"lazy-pin": {"js": {"lazy": {"n": {"one": "uno", "other": "%{count} muchos"}}}}}"#,
        )
        .unwrap();
        let lazy = LazyTranslation::new(
            "js.lazy.n",
            TranslateOptions::new().locale("lazy-pin").count(4),
        );
        assert!(lazy == *"4 muchos");
        let s: String = lazy.into();
        assert_eq!(s, "4 muchos");
    }

    #[test]
    fn test_evaluate_with_explicit_runtime() {
        let mut translations = Translations::new();
        translations.load_bundle(r#"{"en": {"ok": "OK"}}"#).unwrap();
        let i18n = I18n::from_translations(translations);
        let lazy = LazyTranslation::new("ok", TranslateOptions::new().locale("en"));
        assert_eq!(lazy.evaluate_with(&i18n), "OK");
    }

    #[test]
    fn test_lazy_debug() {
        let lazy = LazyTranslation::new("js.debug_test", TranslateOptions::new());
        let debug = format!("{lazy:?}");
        assert!(debug.contains("LazyTranslation"));
        assert!(debug.contains("js.debug_test"));
    }

    #[test]
    fn test_lazy_equality_compares_key_and_options() {
        let a = LazyTranslation::new("same", TranslateOptions::new());
        let b = LazyTranslation::new("same", TranslateOptions::new());
        let c = LazyTranslation::new("same", TranslateOptions::new().count(2));
        assert!(a == b);
        assert!(a != c);
        assert_eq!(a.scope(), "same");
    }
}
