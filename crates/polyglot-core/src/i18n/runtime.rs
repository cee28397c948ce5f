//! The translation runtime: locale chains, lookup, pluralization and
//! missing-translation rendering on top of a [`Translations`] store.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Key in no locale of the chain | `[<locale>.<scope>]` (or a guess) |
//! | Plural map without the category or `other` | `[<locale>.<scope>.<category>]` |
//! | Map found but no `count` given | `[<locale>.<scope>]` |
//! | Placeholder without value | `[missing {{name}} value]` |

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::i18n::interpolate::{interpolate, Value, Values};
use crate::i18n::plural::{resolve_category, PluralCategory, PluralRule};
use crate::i18n::store::{self, Node, Translations};
use crate::logging::lookup_span;
use crate::settings::{MissingBehaviour, Settings, SETTINGS};

/// The locale every chain ends with.
pub const ROOT_LOCALE: &str = "en";

/// Lookup configuration for an [`I18n`] instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nConfig {
    pub default_locale: String,
    pub fallback_locale: Option<String>,
    pub enable_fallbacks: bool,
    pub missing_behaviour: MissingBehaviour,
    pub missing_translation_prefix: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for I18nConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            default_locale: settings.default_locale.clone(),
            fallback_locale: settings.fallback_locale.clone(),
            enable_fallbacks: settings.enable_fallbacks,
            missing_behaviour: settings.missing_behaviour,
            missing_translation_prefix: settings.missing_translation_prefix.clone(),
        }
    }
}

/// Per-call options for [`I18n::translate`].
///
/// # Examples
///
/// ```
/// use polyglot_core::i18n::TranslateOptions;
///
/// let opts = TranslateOptions::new()
///     .locale("bg")
///     .scope("js.topic")
///     .count(3)
///     .value("username", "иван");
/// assert_eq!(opts.full_scope("replies"), "js.topic.replies");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslateOptions {
    /// Locale to start the chain from; the thread's active language if unset.
    pub locale: Option<String>,
    /// Prefix joined in front of the requested key.
    pub scope: Option<String>,
    /// Selects a plural form and is exposed to templates as `count`.
    pub count: Option<f64>,
    /// Template used when no locale provides the key.
    pub default_value: Option<String>,
    pub values: Values,
}

impl TranslateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    #[must_use]
    pub fn count(mut self, count: impl Into<f64>) -> Self {
        self.count = Some(count.into());
        self
    }

    #[must_use]
    pub fn default_value(mut self, template: impl Into<String>) -> Self {
        self.default_value = Some(template.into());
        self
    }

    #[must_use]
    pub fn value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name, value);
        self
    }

    /// Joins the `scope` prefix and `key` with a dot.
    pub fn full_scope(&self, key: &str) -> String {
        match self.scope.as_deref().map(|s| s.trim_matches('.')) {
            Some(prefix) if !prefix.is_empty() => {
                let key = key.trim_start_matches('.');
                if key.is_empty() {
                    prefix.to_string()
                } else {
                    format!("{prefix}.{key}")
                }
            }
            _ => key.to_string(),
        }
    }

    fn values_with_count(&self) -> Values {
        let mut values = self.values.clone();
        if let Some(count) = self.count {
            values.insert_if_absent("count", count);
        }
        values
    }
}

/// A translation runtime bound to a store and a lookup configuration.
///
/// Cloning is cheap: clones share the same store.
#[derive(Debug, Clone)]
pub struct I18n {
    config: I18nConfig,
    store: Arc<RwLock<Translations>>,
    plural_rules: HashMap<String, PluralRule>,
}

impl I18n {
    /// Creates a runtime over an explicit store.
    pub fn new(config: I18nConfig, store: Arc<RwLock<Translations>>) -> Self {
        Self {
            config,
            store,
            plural_rules: HashMap::new(),
        }
    }

    /// Wraps an owned [`Translations`] with the default configuration.
    pub fn from_translations(translations: Translations) -> Self {
        Self::new(I18nConfig::default(), Arc::new(RwLock::new(translations)))
    }

    /// The runtime over the process-wide store, configured from
    /// [`SETTINGS`] when they have been configured.
    pub fn global() -> Self {
        let config = SETTINGS
            .try_get()
            .map_or_else(I18nConfig::default, I18nConfig::from);
        Self::new(config, store::shared())
    }

    pub const fn config(&self) -> &I18nConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut I18nConfig {
        &mut self.config
    }

    pub const fn store(&self) -> &Arc<RwLock<Translations>> {
        &self.store
    }

    /// Overrides the plural rule used for one locale.
    pub fn set_plural_rule(&mut self, locale: impl Into<String>, rule: PluralRule) {
        self.plural_rules.insert(locale.into(), rule);
    }

    /// The plural rule for a locale: an override, else the CLDR family.
    pub fn plural_rule(&self, locale: &str) -> PluralRule {
        self.plural_rules
            .get(locale)
            .cloned()
            .unwrap_or_else(|| PluralRule::for_locale(locale))
    }

    /// The ordered list of locales tried for `requested`.
    ///
    /// `requested`, then (with fallbacks enabled) its language-only form,
    /// the fallback locale, the default locale and finally `"en"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use polyglot_core::i18n::{I18n, I18nConfig};
    /// use polyglot_core::i18n::store::Translations;
    ///
    /// let mut i18n = I18n::from_translations(Translations::new());
    /// i18n.config_mut().fallback_locale = Some("ru".into());
    /// assert_eq!(i18n.locale_chain("bg-BG"), vec!["bg-BG", "bg", "ru", "en"]);
    /// ```
    pub fn locale_chain(&self, requested: &str) -> Vec<String> {
        let mut chain: Vec<String> = Vec::new();
        let mut push = |locale: &str| {
            if !locale.is_empty() && !chain.iter().any(|l| l == locale) {
                chain.push(locale.to_string());
            }
        };

        push(requested);
        if self.config.enable_fallbacks {
            if let Some((language, _)) = requested.split_once(['-', '_']) {
                push(language);
            }
            if let Some(fallback) = &self.config.fallback_locale {
                push(fallback);
            }
            push(&self.config.default_locale);
            push(ROOT_LOCALE);
        }
        chain
    }

    fn requested_locale(options: &TranslateOptions) -> String {
        options
            .locale
            .clone()
            .unwrap_or_else(crate::i18n::get_language)
    }

    /// Finds the first locale in the chain that defines `scope`.
    ///
    /// Returns the locale that matched and a copy of the node.
    pub fn lookup(&self, scope: &str, options: &TranslateOptions) -> Option<(String, Node)> {
        let requested = Self::requested_locale(options);
        let full_scope = options.full_scope(scope);
        let store = self.store.read().expect("translation store lock poisoned");
        self.locale_chain(&requested).into_iter().find_map(|locale| {
            store
                .lookup(&locale, &full_scope)
                .cloned()
                .map(|node| (locale, node))
        })
    }

    /// Returns `true` if any locale in the chain of `locale` defines `scope`.
    pub fn exists(&self, scope: &str, locale: &str) -> bool {
        let store = self.store.read().expect("translation store lock poisoned");
        self.locale_chain(locale)
            .iter()
            .any(|l| store.lookup(l, scope).is_some())
    }

    /// Translates `scope` (the `t` operation).
    ///
    /// # Examples
    ///
    /// ```
    /// use polyglot_core::i18n::{I18n, TranslateOptions};
    /// use polyglot_core::i18n::store::Translations;
    ///
    /// let mut store = Translations::new();
    /// store.load_bundle(r#"{
    ///     "bg": {"js": {"replies": {"one": "%{count} отговор", "other": "%{count} отговора"}}},
    ///     "en": {"js": {"share": "Share"}}
    /// }"#).unwrap();
    /// let i18n = I18n::from_translations(store);
    ///
    /// let bg = TranslateOptions::new().locale("bg");
    /// assert_eq!(i18n.translate("js.replies", &bg.clone().count(1)), "1 отговор");
    /// assert_eq!(i18n.translate("js.replies", &bg.clone().count(7)), "7 отговора");
    /// assert_eq!(i18n.translate("js.share", &bg), "Share");
    /// assert_eq!(i18n.translate("js.nope", &bg), "[bg.js.nope]");
    /// ```
    pub fn translate(&self, scope: &str, options: &TranslateOptions) -> String {
        let requested = Self::requested_locale(options);
        let full_scope = options.full_scope(scope);
        let values = options.values_with_count();
        let _span = lookup_span(&requested, &full_scope).entered();

        let store = self.store.read().expect("translation store lock poisoned");
        for locale in self.locale_chain(&requested) {
            let Some(node) = store.lookup(&locale, &full_scope) else {
                continue;
            };
            if locale != requested {
                tracing::debug!(resolved = %locale, "translation resolved through fallback");
            }
            return match node {
                Node::Text(template) => interpolate(template, &values),
                Node::Map(forms) => match options.count {
                    Some(count) => {
                        self.render_plural(&requested, &locale, &full_scope, forms, count, &values)
                    }
                    None => self.missing_translation(&requested, &full_scope),
                },
                Node::List(_) => self.missing_translation(&requested, &full_scope),
                scalar => scalar.to_string(),
            };
        }
        drop(store);

        if let Some(default) = &options.default_value {
            return interpolate(default, &values);
        }
        tracing::debug!("missing translation");
        self.missing_translation(&requested, &full_scope)
    }

    /// Translates `scope` with a forced `count` (the `p` operation).
    pub fn pluralize(&self, count: impl Into<f64>, scope: &str, options: &TranslateOptions) -> String {
        let options = options.clone().count(count);
        self.translate(scope, &options)
    }

    /// Returns the strings of a list node (day names, month names).
    ///
    /// `null` entries become empty strings.
    pub fn translate_list(&self, scope: &str, locale: &str) -> Option<Vec<String>> {
        let (_, node) = self.lookup(scope, &TranslateOptions::new().locale(locale))?;
        match node {
            Node::List(items) => Some(
                items
                    .iter()
                    .map(|item| item.scalar_text().unwrap_or_default())
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Like [`I18n::translate`] but `None` instead of a missing marker.
    pub fn try_translate(&self, scope: &str, options: &TranslateOptions) -> Option<String> {
        let found = self.lookup(scope, options)?;
        match found.1 {
            Node::Text(_) | Node::Number(_) | Node::Bool(_) | Node::Null => {
                Some(self.translate(scope, options))
            }
            Node::Map(_) if options.count.is_some() => Some(self.translate(scope, options)),
            _ => None,
        }
    }

    fn render_plural(
        &self,
        requested: &str,
        found_in: &str,
        full_scope: &str,
        forms: &std::collections::BTreeMap<String, Node>,
        count: f64,
        values: &Values,
    ) -> String {
        let rule = self.plural_rule(found_in);
        let has = |category: PluralCategory| {
            forms
                .get(category.as_str())
                .is_some_and(|node| node.scalar_text().is_some())
        };
        match resolve_category(count, &rule, has) {
            Some(category) => {
                let template = forms
                    .get(category.as_str())
                    .and_then(Node::scalar_text)
                    .unwrap_or_default();
                interpolate(&template, values)
            }
            None => {
                let category = rule.categorize(count);
                self.missing_translation(requested, &format!("{full_scope}.{category}"))
            }
        }
    }

    /// Renders the marker (or guess) for an unresolved key.
    pub fn missing_translation(&self, locale: &str, full_scope: &str) -> String {
        match self.config.missing_behaviour {
            MissingBehaviour::Message => format!("[{locale}.{full_scope}]"),
            MissingBehaviour::Guess => format!(
                "{}{}",
                self.config.missing_translation_prefix,
                humanize_key(full_scope)
            ),
        }
    }
}

/// Turns the last segment of a dotted key into words.
///
/// `some_key` → `some key`, `someKey` → `some key`.
pub fn humanize_key(full_scope: &str) -> String {
    let last = full_scope.rsplit('.').next().unwrap_or_default();
    let mut out = String::with_capacity(last.len() + 4);
    let mut prev_lower = false;
    for c in last.chars() {
        if c == '_' || c == '-' {
            out.push(' ');
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower {
                out.push(' ');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &str = r#"{
        "en": {
            "js": {
                "share": "Share",
                "welcome": "Welcome, {{username}}!",
                "replies": { "one": "%{count} reply", "other": "%{count} replies" },
                "search": {
                    "results": { "zero": "No results", "one": "1 result", "other": "%{count} results" }
                },
                "admin": { "title": "Admin" },
                "max_posts": 50
            }
        },
        "bg": {
            "js": {
                "welcome": "Добре дошли, {{username}}!",
                "replies": { "one": "%{count} отговор", "other": "%{count} отговора" },
                "broken": { "one": "%{count} нещо" }
            }
        },
        "ru": {
            "js": {
                "replies": {
                    "one": "%{count} ответ",
                    "few": "%{count} ответа",
                    "many": "%{count} ответов",
                    "other": "%{count} ответа"
                }
            }
        }
    }"#;

    fn i18n() -> I18n {
        let mut store = Translations::new();
        store.load_bundle(BUNDLE).unwrap();
        I18n::from_translations(store)
    }

    fn bg() -> TranslateOptions {
        TranslateOptions::new().locale("bg")
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture_debug_log(f: impl FnOnce()) -> String {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = log.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_lookup_events_carry_locale_and_scope() {
        let i18n = i18n();
        let out = capture_debug_log(|| {
            i18n.translate("js.nope", &bg());
            i18n.translate("js.share", &bg());
        });

        let missing = out
            .lines()
            .find(|line| line.contains("missing translation"))
            .unwrap();
        assert!(missing.contains("lookup{"), "{out}");
        assert!(missing.contains("bg") && missing.contains("js.nope"), "{out}");

        let fallback = out
            .lines()
            .find(|line| line.contains("resolved through fallback"))
            .unwrap();
        assert!(fallback.contains("js.share") && fallback.contains("resolved=en"), "{out}");
    }

    #[test]
    fn test_simple_translation() {
        assert_eq!(i18n().translate("js.share", &TranslateOptions::new().locale("en")), "Share");
    }

    #[test]
    fn test_interpolation() {
        let opts = bg().value("username", "Петър");
        assert_eq!(i18n().translate("js.welcome", &opts), "Добре дошли, Петър!");
    }

    #[test]
    fn test_missing_interpolation_value() {
        assert_eq!(
            i18n().translate("js.welcome", &bg()),
            "Добре дошли, [missing {{username}} value]!"
        );
    }

    #[test]
    fn test_fallback_to_en() {
        assert_eq!(i18n().translate("js.share", &bg()), "Share");
    }

    #[test]
    fn test_region_falls_back_to_language() {
        let opts = TranslateOptions::new().locale("bg-BG").count(2);
        assert_eq!(i18n().translate("js.replies", &opts), "2 отговора");
    }

    #[test]
    fn test_fallbacks_disabled() {
        let mut i18n = i18n();
        i18n.config_mut().enable_fallbacks = false;
        assert_eq!(i18n.locale_chain("bg-BG"), vec!["bg-BG"]);
        assert_eq!(i18n.translate("js.share", &bg()), "[bg.js.share]");
    }

    #[test]
    fn test_fallback_locale_precedes_default() {
        let mut i18n = i18n();
        i18n.config_mut().fallback_locale = Some("ru".to_string());
        let opts = TranslateOptions::new().locale("uk").count(3);
        // Found in ru, so the ru rule selects "few".
        assert_eq!(i18n.translate("js.replies", &opts), "3 ответа");
        let opts = TranslateOptions::new().locale("uk").count(5);
        assert_eq!(i18n.translate("js.replies", &opts), "5 ответов");
    }

    #[test]
    fn test_locale_chain_dedup_and_order() {
        let mut i18n = i18n();
        i18n.config_mut().default_locale = "bg".to_string();
        i18n.config_mut().fallback_locale = Some("bg".to_string());
        assert_eq!(i18n.locale_chain("bg_BG"), vec!["bg_BG", "bg", "en"]);
        assert_eq!(i18n.locale_chain("en"), vec!["en", "bg"]);
        assert_eq!(i18n.locale_chain(""), vec!["bg", "en"]);
    }

    #[test]
    fn test_pluralization_bulgarian() {
        let i18n = i18n();
        assert_eq!(i18n.pluralize(1, "js.replies", &bg()), "1 отговор");
        assert_eq!(i18n.pluralize(0, "js.replies", &bg()), "0 отговора");
        assert_eq!(i18n.pluralize(21, "js.replies", &bg()), "21 отговора");
        assert_eq!(i18n.pluralize(1.5, "js.replies", &bg()), "1.5 отговора");
    }

    #[test]
    fn test_explicit_zero_form() {
        let i18n = i18n();
        let en = TranslateOptions::new().locale("en");
        assert_eq!(i18n.pluralize(0, "js.search.results", &en), "No results");
        assert_eq!(i18n.pluralize(1, "js.search.results", &en), "1 result");
        assert_eq!(i18n.pluralize(4, "js.search.results", &en), "4 results");
    }

    #[test]
    fn test_plural_without_category_or_other() {
        assert_eq!(i18n().pluralize(3, "js.broken", &bg()), "[bg.js.broken.other]");
    }

    #[test]
    fn test_map_without_count_is_missing() {
        assert_eq!(i18n().translate("js.replies", &bg()), "[bg.js.replies]");
    }

    #[test]
    fn test_count_available_to_plain_text() {
        let mut store = Translations::new();
        store
            .load_bundle(r#"{"en": {"n": "{{count}} items"}}"#)
            .unwrap();
        let i18n = I18n::from_translations(store);
        let opts = TranslateOptions::new().locale("en").count(4);
        assert_eq!(i18n.translate("n", &opts), "4 items");
    }

    #[test]
    fn test_explicit_count_value_wins() {
        let opts = bg().count(2).value("count", "две");
        assert_eq!(i18n().translate("js.replies", &opts), "две отговора");
    }

    #[test]
    fn test_scope_option() {
        let opts = TranslateOptions::new().locale("en").scope("js.admin");
        assert_eq!(i18n().translate("title", &opts), "Admin");
        let opts = TranslateOptions::new().locale("en").scope(".js.");
        assert_eq!(i18n().translate(".share", &opts), "Share");
    }

    #[test]
    fn test_default_value() {
        let opts = bg().default_value("Липсва {{what}}").value("what", "ключ");
        assert_eq!(i18n().translate("js.nothing", &opts), "Липсва ключ");
    }

    #[test]
    fn test_missing_marker_uses_requested_locale() {
        assert_eq!(i18n().translate("js.nothing.here", &bg()), "[bg.js.nothing.here]");
        assert_eq!(i18n().translate("", &bg()), "[bg.]");
    }

    #[test]
    fn test_missing_guess_behaviour() {
        let mut i18n = i18n();
        i18n.config_mut().missing_behaviour = MissingBehaviour::Guess;
        i18n.config_mut().missing_translation_prefix = "EE: ".to_string();
        assert_eq!(i18n.translate("js.topic.closedByStaff", &bg()), "EE: closed by staff");
        assert_eq!(i18n.translate("js.topic.not_found", &bg()), "EE: not found");
    }

    #[test]
    fn test_number_node_renders() {
        assert_eq!(i18n().translate("js.max_posts", &bg()), "50");
    }

    #[test]
    fn test_custom_plural_rule_override() {
        fn everything_one(_: f64) -> PluralCategory {
            PluralCategory::One
        }
        let mut i18n = i18n();
        i18n.set_plural_rule("bg", PluralRule::Custom(everything_one));
        assert_eq!(i18n.pluralize(9, "js.replies", &bg()), "9 отговор");
    }

    #[test]
    fn test_exists_and_try_translate() {
        let i18n = i18n();
        assert!(i18n.exists("js.share", "bg"));
        assert!(!i18n.exists("js.nope", "bg"));
        assert_eq!(i18n.try_translate("js.share", &bg()).as_deref(), Some("Share"));
        assert!(i18n.try_translate("js.nope", &bg()).is_none());
        assert!(i18n.try_translate("js.replies", &bg()).is_none());
    }

    #[test]
    fn test_translate_list() {
        let mut store = Translations::new();
        store
            .load_bundle(r#"{"en": {"date": {"month_names": [null, "January", "February"]}}}"#)
            .unwrap();
        let i18n = I18n::from_translations(store);
        assert_eq!(
            i18n.translate_list("date.month_names", "bg").unwrap(),
            vec!["", "January", "February"]
        );
        assert!(i18n.translate_list("date", "en").is_none());
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("a.b.some_key"), "some key");
        assert_eq!(humanize_key("someKey"), "some key");
        assert_eq!(humanize_key("HTML"), "html");
        assert_eq!(humanize_key(""), "");
    }
}
