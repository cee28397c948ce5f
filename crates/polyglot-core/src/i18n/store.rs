//! Translation store: locale code → nested translation table.
//!
//! Tables are loaded from JSON bundles shaped like
//!
//! ```json
//! {
//!   "bg": {
//!     "js": {
//!       "topic": {
//!         "title": "Тема",
//!         "replies": { "one": "%{count} отговор", "other": "%{count} отговора" }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Keys are addressed with dotted paths (`js.topic.title`). A table is never
//! merged: loading a bundle that contains a locale replaces that locale's
//! whole table ("last loaded wins"), while other locales stay as they were.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock};

use crate::error::{PolyglotError, PolyglotResult};
use crate::i18n::interpolate::format_float;
use crate::i18n::plural::PluralCategory;

/// One node of a translation table.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
    List(Vec<Node>),
    Map(BTreeMap<String, Node>),
}

impl Node {
    /// Returns the text of a `Text` node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the children of a `Map` node.
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns `true` for a non-empty map whose keys are all plural categories.
    pub fn is_plural_forms(&self) -> bool {
        self.as_map().is_some_and(|m| {
            !m.is_empty() && m.keys().all(|k| PluralCategory::is_category_key(k))
        })
    }

    /// Walks a dotted path below this node. Empty segments are skipped.
    pub fn get_path(&self, dotted: &str) -> Option<&Self> {
        dotted
            .split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| node.as_map()?.get(segment))
    }

    /// Renders scalar nodes; lists and maps have no text form.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(format_float(*n)),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null => Some(String::new()),
            Self::List(_) | Self::Map(_) => None,
        }
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scalar_text() {
            Some(text) => f.write_str(&text),
            None => f.write_str("[object]"),
        }
    }
}

/// All loaded translation tables, keyed by locale code.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    locales: HashMap<String, Node>,
}

impl Translations {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON bundle, replacing the table of every locale it contains.
    ///
    /// Returns the loaded locale codes, sorted.
    ///
    /// # Examples
    ///
    /// ```
    /// use polyglot_core::i18n::store::Translations;
    ///
    /// let mut store = Translations::new();
    /// store.load_bundle(r#"{"bg": {"js": {"ok": "Добре"}}}"#).unwrap();
    /// assert_eq!(store.lookup("bg", "js.ok").and_then(|n| n.as_text()), Some("Добре"));
    /// ```
    pub fn load_bundle(&mut self, json: &str) -> PolyglotResult<Vec<String>> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| PolyglotError::BundleParse(format!("invalid JSON: {e}")))?;
        self.load_value(value)
    }

    /// Loads an already-parsed bundle. See [`Translations::load_bundle`].
    pub fn load_value(&mut self, value: serde_json::Value) -> PolyglotResult<Vec<String>> {
        let serde_json::Value::Object(bundle) = value else {
            return Err(PolyglotError::BundleParse(
                "bundle must be an object keyed by locale".to_string(),
            ));
        };

        // Validate everything before touching the store so a bad bundle
        // leaves it unchanged.
        let mut tables = Vec::with_capacity(bundle.len());
        for (locale, table) in bundle {
            validate_locale(&locale)?;
            if !table.is_object() {
                return Err(PolyglotError::BundleParse(format!(
                    "table for locale '{locale}' must be an object"
                )));
            }
            tables.push((locale, Node::from(table)));
        }

        let mut loaded = Vec::with_capacity(tables.len());
        for (locale, root) in tables {
            tracing::info!(locale = %locale, keys = count_leaves(&root), "loaded translation table");
            loaded.push(locale.clone());
            self.locales.insert(locale, root);
        }
        loaded.sort_unstable();
        Ok(loaded)
    }

    /// Replaces the table for one locale.
    pub fn insert_locale(&mut self, locale: impl Into<String>, root: Node) {
        self.locales.insert(locale.into(), root);
    }

    /// Looks up a dotted key in one locale's table.
    pub fn lookup(&self, locale: &str, dotted_key: &str) -> Option<&Node> {
        if dotted_key.split('.').all(str::is_empty) {
            return None;
        }
        self.locales.get(locale)?.get_path(dotted_key)
    }

    /// All loaded locale codes, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }

    /// Returns `true` if a table is loaded for `locale`.
    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    /// Removes one locale's table.
    pub fn remove_locale(&mut self, locale: &str) -> Option<Node> {
        self.locales.remove(locale)
    }

    /// Removes every table.
    pub fn clear(&mut self) {
        self.locales.clear();
    }

    /// Flattens one locale into `dotted.key -> node` leaves.
    ///
    /// Plural-form mappings are leaves: they are reported once under their
    /// parent key rather than as `key.one`, `key.other`.
    pub fn flatten(&self, locale: &str) -> BTreeMap<String, &Node> {
        let mut out = BTreeMap::new();
        if let Some(root) = self.locales.get(locale) {
            flatten_into(root, String::new(), &mut out);
        }
        out
    }

    // -----------------------------------------------------------------
    // Coverage
    // -----------------------------------------------------------------

    /// Every leaf key across every locale, sorted and deduplicated.
    pub fn all_keys(&self) -> Vec<String> {
        let keys: BTreeSet<String> = self
            .locales
            .keys()
            .flat_map(|locale| self.flatten(locale).into_keys())
            .collect();
        keys.into_iter().collect()
    }

    /// Keys from `reference` that `locale` does not define itself.
    pub fn missing_keys(&self, locale: &str, reference: &[String]) -> Vec<String> {
        let own = self.flatten(locale);
        let mut missing: Vec<String> = reference
            .iter()
            .filter(|key| !own.contains_key(key.as_str()))
            .cloned()
            .collect();
        missing.sort_unstable();
        missing
    }

    /// Compares every locale against the keys of `reference_locale`.
    pub fn coverage_report(&self, reference_locale: &str) -> CoverageReport {
        let reference: Vec<String> = self.flatten(reference_locale).into_keys().collect();
        let total = reference.len();

        let locales = self
            .locales()
            .into_iter()
            .map(|tag| {
                let missing = self.missing_keys(tag, &reference);
                let present = total.saturating_sub(missing.len());
                #[allow(clippy::cast_precision_loss)]
                let coverage_percent = if total == 0 {
                    100.0
                } else {
                    (present as f32 / total as f32) * 100.0
                };
                LocaleCoverage {
                    locale: tag.to_string(),
                    present,
                    missing,
                    coverage_percent,
                }
            })
            .collect();

        CoverageReport {
            reference_locale: reference_locale.to_string(),
            total_keys: total,
            locales,
        }
    }
}

/// Coverage of every locale relative to a reference locale.
#[derive(Debug, Clone)]
pub struct CoverageReport {
    pub reference_locale: String,
    /// Number of leaf keys in the reference locale.
    pub total_keys: usize,
    pub locales: Vec<LocaleCoverage>,
}

/// Per-locale coverage statistics.
#[derive(Debug, Clone)]
pub struct LocaleCoverage {
    pub locale: String,
    pub present: usize,
    pub missing: Vec<String>,
    /// 0.0 to 100.0.
    pub coverage_percent: f32,
}

fn validate_locale(locale: &str) -> PolyglotResult<()> {
    let valid = !locale.is_empty()
        && locale
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PolyglotError::InvalidLocale(locale.to_string()))
    }
}

fn flatten_into<'a>(node: &'a Node, prefix: String, out: &mut BTreeMap<String, &'a Node>) {
    match node {
        Node::Map(children) if !node.is_plural_forms() => {
            for (key, child) in children {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(child, path, out);
            }
        }
        _ if prefix.is_empty() => {}
        _ => {
            out.insert(prefix, node);
        }
    }
}

fn count_leaves(root: &Node) -> usize {
    let mut out = BTreeMap::new();
    flatten_into(root, String::new(), &mut out);
    out.len()
}

// ── Process-wide store ───────────────────────────────────────────────────

/// The process-wide store shared by [`crate::i18n::I18n::global`].
pub fn shared() -> Arc<RwLock<Translations>> {
    static STORE: OnceLock<Arc<RwLock<Translations>>> = OnceLock::new();
    Arc::clone(STORE.get_or_init(|| Arc::new(RwLock::new(Translations::new()))))
}

/// Loads a JSON bundle into the process-wide store.
pub fn load_bundle(json: &str) -> PolyglotResult<Vec<String>> {
    let store = shared();
    let mut guard = store.write().expect("translation store lock poisoned");
    guard.load_bundle(json)
}

/// Loads a JSON bundle file into the process-wide store.
pub fn load_bundle_file(path: impl AsRef<Path>) -> PolyglotResult<Vec<String>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    load_bundle(&content).map_err(|e| match e {
        PolyglotError::BundleParse(msg) => {
            PolyglotError::BundleParse(format!("{}: {msg}", path.as_ref().display()))
        }
        other => other,
    })
}

/// Loads every `*.json` bundle in a directory, in file-name order.
///
/// Returns the loaded locale codes, sorted and deduplicated.
pub fn load_dir(dir: impl AsRef<Path>) -> PolyglotResult<Vec<String>> {
    let mut paths: Vec<_> = std::fs::read_dir(dir.as_ref())?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    paths.sort();

    let mut loaded = BTreeSet::new();
    for path in paths {
        loaded.extend(load_bundle_file(&path)?);
    }
    Ok(loaded.into_iter().collect())
}
