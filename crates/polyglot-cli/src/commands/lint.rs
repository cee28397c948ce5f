//! The `lint` command.
//!
//! Compares every locale with a reference locale and reports:
//!
//! | id | level | meaning |
//! |---|---|---|
//! | `placeholder.unknown` | error | a placeholder the reference never supplies |
//! | `plural.shape` | error | plural forms on one side, plain text on the other |
//! | `plural.missing` | warning | a category the locale's rule produces has no form |
//! | `key.orphan` | warning | a key the reference does not have |
//! | `plural.unused` | info | a form the locale's rule never selects |

use std::collections::BTreeSet;
use std::fmt;

use async_trait::async_trait;
use polyglot_core::i18n::interpolate::placeholders;
use polyglot_core::i18n::{I18n, Node, PluralCategory};
use polyglot_core::{PolyglotError, PolyglotResult};

use crate::command::ManagementCommand;
use crate::context::CommandContext;

/// Checks placeholders and plural forms of every locale.
pub struct LintCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LintLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for LintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    pub level: LintLevel,
    pub id: &'static str,
    pub locale: String,
    pub key: String,
    pub msg: String,
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {}.{}: {}",
            self.level, self.id, self.locale, self.key, self.msg
        )
    }
}

/// Placeholder names used anywhere in a text or plural-form node.
fn node_placeholders(node: &Node) -> BTreeSet<String> {
    match node {
        Node::Text(text) => placeholders(text).into_iter().collect(),
        Node::Map(forms) if node.is_plural_forms() => {
            forms.values().flat_map(node_placeholders).collect()
        }
        _ => BTreeSet::new(),
    }
}

fn form_categories(node: &Node) -> Vec<PluralCategory> {
    node.as_map()
        .map(|forms| forms.keys().filter_map(|k| k.parse().ok()).collect())
        .unwrap_or_default()
}

/// Runs every check against `reference`.
pub fn lint(i18n: &I18n, reference: &str) -> Vec<LintIssue> {
    let store = i18n.store().read().expect("translation store lock poisoned");
    let reference_keys = store.flatten(reference);
    let mut issues = Vec::new();

    for locale in store.locales() {
        let rule_categories = i18n.plural_rule(locale).categories();
        let issue = |level, id, key: &str, msg: String| LintIssue {
            level,
            id,
            locale: locale.to_string(),
            key: key.to_string(),
            msg,
        };

        for (key, node) in store.flatten(locale) {
            if node.is_plural_forms() {
                let present = form_categories(node);
                for category in &rule_categories {
                    if !present.contains(category) {
                        issues.push(issue(
                            LintLevel::Warning,
                            "plural.missing",
                            &key,
                            format!("no `{category}` form"),
                        ));
                    }
                }
                for category in &present {
                    if *category != PluralCategory::Zero && !rule_categories.contains(category) {
                        issues.push(issue(
                            LintLevel::Info,
                            "plural.unused",
                            &key,
                            format!("`{category}` is never selected"),
                        ));
                    }
                }
            }

            if locale == reference {
                continue;
            }
            let Some(expected) = reference_keys.get(&key) else {
                issues.push(issue(
                    LintLevel::Warning,
                    "key.orphan",
                    &key,
                    format!("not present in {reference}"),
                ));
                continue;
            };

            if expected.is_plural_forms() != node.is_plural_forms() {
                let (want, got) = if expected.is_plural_forms() {
                    ("plural forms", "text")
                } else {
                    ("text", "plural forms")
                };
                issues.push(issue(
                    LintLevel::Error,
                    "plural.shape",
                    &key,
                    format!("{reference} has {want}, found {got}"),
                ));
            }

            let mut allowed = node_placeholders(expected);
            if expected.is_plural_forms() {
                allowed.insert("count".to_string());
            }
            for name in node_placeholders(node).difference(&allowed) {
                issues.push(issue(
                    LintLevel::Error,
                    "placeholder.unknown",
                    &key,
                    format!("`{name}` is not supplied by {reference}"),
                ));
            }
        }
    }

    issues.sort_by(|a, b| {
        (&a.locale, &a.key, a.id).cmp(&(&b.locale, &b.key, b.id))
    });
    issues
}

#[async_trait]
impl ManagementCommand for LintCommand {
    fn name(&self) -> &'static str {
        "lint"
    }

    fn help(&self) -> &'static str {
        "Check placeholders and plural forms against a reference locale"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("reference")
                .long("reference")
                .short('r')
                .help("Reference locale (defaults to the configured default locale)"),
        )
        .arg(
            clap::Arg::new("strict")
                .long("strict")
                .action(clap::ArgAction::SetTrue)
                .help("Fail on warnings as well as errors"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> PolyglotResult<()> {
        let reference = matches
            .get_one::<String>("reference")
            .map_or(ctx.settings.default_locale.as_str(), String::as_str);
        let issues = lint(&ctx.i18n, reference);

        let errors = issues.iter().filter(|i| i.level == LintLevel::Error).count();
        let warnings = issues.iter().filter(|i| i.level == LintLevel::Warning).count();

        for issue in &issues {
            println!("{issue}");
        }
        tracing::info!(
            "Lint identified {} issue(s) ({} error(s), {} warning(s))",
            issues.len(),
            errors,
            warnings
        );

        let failing = if matches.get_flag("strict") {
            errors + warnings
        } else {
            errors
        };
        if failing > 0 {
            return Err(PolyglotError::BundleParse(format!(
                "lint found {failing} blocking issue(s)"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyglot_core::bundled::bundled_translations;
    use polyglot_core::i18n::Translations;

    fn i18n(bundle: &str) -> I18n {
        let mut store = Translations::new();
        store.load_bundle(bundle).unwrap();
        I18n::from_translations(store)
    }

    fn ids(issues: &[LintIssue]) -> Vec<(&str, &str, &str)> {
        issues
            .iter()
            .map(|i| (i.locale.as_str(), i.key.as_str(), i.id))
            .collect()
    }

    #[test]
    fn test_bundled_data_is_clean() {
        let i18n = I18n::from_translations(bundled_translations().unwrap());
        let issues = lint(&i18n, "en");
        assert!(
            issues.iter().all(|i| i.level < LintLevel::Warning),
            "{issues:#?}"
        );
    }

    #[test]
    fn test_unknown_placeholder() {
        let i18n = i18n(
            r#"{
                "en": {"hi": "Hi {{name}}", "n": {"one": "%{count} item", "other": "%{count} items"}},
                "bg": {"hi": "Здравей {{nmae}}", "n": {"one": "%{count} нещо", "other": "%{count} неща"}}
            }"#,
        );
        let issues = lint(&i18n, "en");
        assert_eq!(ids(&issues), vec![("bg", "hi", "placeholder.unknown")]);
        assert_eq!(issues[0].level, LintLevel::Error);
        assert!(issues[0].to_string().starts_with("ERROR (placeholder.unknown) bg.hi:"));
    }

    #[test]
    fn test_count_is_allowed_in_plural_forms() {
        let i18n = i18n(
            r#"{
                "en": {"n": {"one": "one item", "other": "items"}},
                "bg": {"n": {"one": "%{count} нещо", "other": "%{count} неща"}}
            }"#,
        );
        assert!(lint(&i18n, "en").is_empty());
    }

    #[test]
    fn test_plural_shape_mismatch() {
        let i18n = i18n(
            r#"{
                "en": {"n": {"one": "item", "other": "items"}},
                "bg": {"n": "неща"}
            }"#,
        );
        assert_eq!(ids(&lint(&i18n, "en")), vec![("bg", "n", "plural.shape")]);
    }

    #[test]
    fn test_missing_and_unused_categories() {
        let i18n = i18n(
            r#"{
                "en": {"n": {"one": "item", "other": "items"}},
                "ru": {"n": {"one": "штука", "few": "штуки", "two": "две", "other": "штук"}}
            }"#,
        );
        let issues = lint(&i18n, "en");
        assert_eq!(
            ids(&issues),
            vec![("ru", "n", "plural.missing"), ("ru", "n", "plural.unused")]
        );
        assert!(issues[0].msg.contains("many"));
        assert!(issues[1].msg.contains("two"));
    }

    #[test]
    fn test_croatian_one_few_other_is_complete() {
        let i18n = i18n(
            r#"{
                "en": {"r": {"one": "%{count} reply", "other": "%{count} replies"}},
                "hr": {"r": {"one": "%{count} odgovor", "few": "%{count} odgovora", "other": "%{count} odgovora"}}
            }"#,
        );
        assert!(lint(&i18n, "en").is_empty());

        let with_many = self::i18n(
            r#"{
                "en": {"r": {"one": "reply", "other": "replies"}},
                "hr": {"r": {"one": "odgovor", "few": "odgovora", "many": "odgovora", "other": "odgovora"}}
            }"#,
        );
        assert_eq!(ids(&lint(&with_many, "en")), vec![("hr", "r", "plural.unused")]);
    }

    #[test]
    fn test_orphan_keys() {
        let i18n = i18n(r#"{"en": {"a": "A"}, "bg": {"a": "А", "b": "Б"}}"#);
        let issues = lint(&i18n, "en");
        assert_eq!(ids(&issues), vec![("bg", "b", "key.orphan")]);
        assert_eq!(issues[0].level, LintLevel::Warning);
    }

    #[test]
    fn test_level_ordering() {
        assert!(LintLevel::Info < LintLevel::Warning);
        assert!(LintLevel::Warning < LintLevel::Error);
        assert_eq!(LintLevel::Warning.to_string(), "WARNING");
    }
}
