//! Placeholder substitution for translation templates.
//!
//! Two placeholder syntaxes are recognised and may be mixed in one template:
//! `{{name}}` and `%{name}`. Whitespace just inside the braces is ignored.
//!
//! # Invariants
//!
//! 1. **Single pass**: substituted values are never re-scanned, so a value
//!    containing `{{x}}` is emitted literally.
//! 2. **Visible misses**: a placeholder without a value renders
//!    `[missing {{name}} value]`, quoting the placeholder as written.

use std::fmt;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// A value that can be substituted into a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{}", format_float(*x)),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Formats a float without a trailing `.0` when it holds an integer.
pub(crate) fn format_float(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{x:.0}")
    } else {
        x.to_string()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        i64::try_from(i).map_or_else(|_| Self::Str(i.to_string()), Self::Int)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Named values for interpolation, in insertion order.
///
/// # Examples
///
/// ```
/// use polyglot_core::i18n::interpolate::{interpolate, Values};
///
/// let values = Values::new().with("username", "иван").with("count", 3);
/// assert_eq!(
///     interpolate("{{username}} има %{count} съобщения", &values),
///     "иван има 3 съобщения"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Values {
    entries: Vec<(String, Value)>,
}

impl Values {
    /// Creates an empty set of values.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds (or replaces) a value and returns `self` for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds or replaces a value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Adds a value only if the name is not already present.
    pub fn insert_if_absent(&mut self, name: &str, value: impl Into<Value>) {
        if !self.contains(name) {
            self.entries.push((name.to_string(), value.into()));
        }
    }

    /// Returns the value for `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Returns `true` if a value named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (k, v) in iter {
            values.insert(k, v);
        }
        values
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([^{}]*?)\s*\}\}|%\{\s*([^{}]*?)\s*\}").expect("valid placeholder regex")
    })
}

fn placeholder_name<'t>(caps: &Captures<'t>) -> &'t str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map_or("", |m| m.as_str())
}

/// Substitutes `{{name}}` and `%{name}` placeholders from `values`.
///
/// # Examples
///
/// ```
/// use polyglot_core::i18n::interpolate::{interpolate, Values};
///
/// assert_eq!(
///     interpolate("Hi {{name}}, you have %{n} new", &Values::new().with("name", "Ana")),
///     "Hi Ana, you have [missing %{n} value] new"
/// );
/// ```
pub fn interpolate(template: &str, values: &Values) -> String {
    if !template.contains("{{") && !template.contains("%{") {
        return template.to_string();
    }
    placeholder_regex()
        .replace_all(template, |caps: &Captures<'_>| {
            let name = placeholder_name(caps);
            values.get(name).map_or_else(
                || {
                    tracing::debug!(placeholder = name, "missing interpolation value");
                    format!("[missing {} value]", &caps[0])
                },
                ToString::to_string,
            )
        })
        .into_owned()
}

/// Lists the placeholder names used by a template, in order of first use.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in placeholder_regex().captures_iter(template) {
        let name = placeholder_name(&caps);
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}
