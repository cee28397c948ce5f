//! The `age` command.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use polyglot_core::PolyglotResult;
use polyglot_tz::relative::{relative_age, Style};

use crate::command::ManagementCommand;
use crate::commands::tz::parse_instant;
use crate::context::CommandContext;

/// Renders how long ago an instant was, e.g. `3d` or `преди 3 дни`.
pub struct AgeCommand;

#[async_trait]
impl ManagementCommand for AgeCommand {
    fn name(&self) -> &'static str {
        "age"
    }

    fn help(&self) -> &'static str {
        "Render the relative age of an instant"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("date")
                .required(true)
                .help("RFC 3339 instant, e.g. 2024-05-07T11:00:00Z"),
        )
        .arg(
            clap::Arg::new("style")
                .long("style")
                .short('s')
                .default_value("tiny")
                .value_parser(["tiny", "medium", "medium_with_ago"])
                .help("Output style"),
        )
        .arg(
            clap::Arg::new("locale")
                .long("locale")
                .short('l')
                .help("Locale to render in (defaults to the configured locale)"),
        )
        .arg(
            clap::Arg::new("now")
                .long("now")
                .help("RFC 3339 instant to measure from (defaults to now)"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> PolyglotResult<()> {
        let date = parse_instant(
            matches
                .get_one::<String>("date")
                .map_or("", String::as_str),
        )?;
        let now = match matches.get_one::<String>("now") {
            Some(value) => parse_instant(value)?,
            None => Utc::now(),
        };
        let style: Style = matches
            .get_one::<String>("style")
            .map_or("tiny", String::as_str)
            .parse()?;
        let locale = matches
            .get_one::<String>("locale")
            .map_or_else(|| ctx.default_locale(), String::as_str);

        println!("{}", render(&date, &now, style, ctx, locale));
        Ok(())
    }
}

pub fn render(
    date: &DateTime<Utc>,
    now: &DateTime<Utc>,
    style: Style,
    ctx: &CommandContext,
    locale: &str,
) -> String {
    relative_age(
        &date.fixed_offset(),
        &now.fixed_offset(),
        style,
        &ctx.i18n,
        locale,
    )
}
