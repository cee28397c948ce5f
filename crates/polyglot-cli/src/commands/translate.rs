//! The `translate` command.

use async_trait::async_trait;
use polyglot_core::i18n::{I18n, TranslateOptions, Value};
use polyglot_core::{PolyglotError, PolyglotResult};

use crate::command::ManagementCommand;
use crate::context::CommandContext;

/// Renders one key, optionally with a count and interpolation values.
pub struct TranslateCommand;

/// Parses a `name=value` pair. Integer values are passed as numbers.
pub fn parse_var(pair: &str) -> PolyglotResult<(String, Value)> {
    let (name, raw) = pair
        .split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| {
            PolyglotError::ConfigurationError(format!("expected name=value, got {pair:?}"))
        })?;
    let value = raw
        .parse::<i64>()
        .map_or_else(|_| Value::from(raw), Value::from);
    Ok((name.to_string(), value))
}

/// Builds the options for a `translate` invocation.
pub fn build_options(
    locale: &str,
    count: Option<f64>,
    vars: &[String],
) -> PolyglotResult<TranslateOptions> {
    let mut options = TranslateOptions::new().locale(locale);
    if let Some(count) = count {
        options = options.count(count);
    }
    for pair in vars {
        let (name, value) = parse_var(pair)?;
        options = options.value(name, value);
    }
    Ok(options)
}

/// The rendered text for `key`.
pub fn render(
    i18n: &I18n,
    key: &str,
    locale: &str,
    count: Option<f64>,
    vars: &[String],
) -> PolyglotResult<String> {
    let options = build_options(locale, count, vars)?;
    Ok(i18n.translate(key, &options))
}

#[async_trait]
impl ManagementCommand for TranslateCommand {
    fn name(&self) -> &'static str {
        "translate"
    }

    fn help(&self) -> &'static str {
        "Render a translation key"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("key")
                .required(true)
                .help("Dotted key, e.g. js.topic.replies"),
        )
        .arg(
            clap::Arg::new("locale")
                .long("locale")
                .short('l')
                .help("Locale to render in (defaults to the configured locale)"),
        )
        .arg(
            clap::Arg::new("count")
                .long("count")
                .short('c')
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(f64))
                .help("Count selecting the plural form"),
        )
        .arg(
            clap::Arg::new("var")
                .long("var")
                .action(clap::ArgAction::Append)
                .help("Interpolation value as name=value; may be repeated"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> PolyglotResult<()> {
        let key = matches
            .get_one::<String>("key")
            .map_or("", String::as_str);
        let locale = matches
            .get_one::<String>("locale")
            .map_or_else(|| ctx.default_locale(), String::as_str);
        let count = matches.get_one::<f64>("count").copied();
        let vars: Vec<String> = matches
            .get_many::<String>("var")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        println!("{}", render(&ctx.i18n, key, locale, count, &vars)?);
        Ok(())
    }
}
