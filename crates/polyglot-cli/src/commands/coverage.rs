//! The `coverage` command.

use async_trait::async_trait;
use polyglot_core::i18n::store::CoverageReport;
use polyglot_core::PolyglotResult;

use crate::command::ManagementCommand;
use crate::context::CommandContext;

/// Reports, per locale, how many keys of a reference locale are translated.
pub struct CoverageCommand;

/// One line per locale: `bg  95.0%  38/40`.
pub fn render_table(report: &CoverageReport, list_missing: bool) -> Vec<String> {
    let mut lines = vec![format!(
        "reference {} ({} keys)",
        report.reference_locale, report.total_keys
    )];
    for entry in &report.locales {
        lines.push(format!(
            "{:<8} {:>5.1}%  {}/{}",
            entry.locale, entry.coverage_percent, entry.present, report.total_keys
        ));
        if list_missing {
            lines.extend(entry.missing.iter().map(|key| format!("    - {key}")));
        }
    }
    lines
}

pub fn render_json(report: &CoverageReport) -> serde_json::Value {
    let locales: Vec<serde_json::Value> = report
        .locales
        .iter()
        .map(|entry| {
            serde_json::json!({
                "locale": entry.locale,
                "present": entry.present,
                "missing": entry.missing,
                "coverage_percent": entry.coverage_percent,
            })
        })
        .collect();
    serde_json::json!({
        "reference_locale": report.reference_locale,
        "total_keys": report.total_keys,
        "locales": locales,
    })
}

#[async_trait]
impl ManagementCommand for CoverageCommand {
    fn name(&self) -> &'static str {
        "coverage"
    }

    fn help(&self) -> &'static str {
        "Show translation coverage against a reference locale"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("reference")
                .long("reference")
                .short('r')
                .help("Reference locale (defaults to the configured default locale)"),
        )
        .arg(
            clap::Arg::new("missing")
                .long("missing")
                .action(clap::ArgAction::SetTrue)
                .help("List the missing keys of each locale"),
        )
        .arg(
            clap::Arg::new("json")
                .long("json")
                .action(clap::ArgAction::SetTrue)
                .help("Print the report as JSON"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> PolyglotResult<()> {
        let reference = matches
            .get_one::<String>("reference")
            .map_or(ctx.settings.default_locale.as_str(), String::as_str);

        let report = {
            let store = ctx
                .i18n
                .store()
                .read()
                .expect("translation store lock poisoned");
            store.coverage_report(reference)
        };

        if report.total_keys == 0 {
            tracing::warn!(reference, "reference locale has no keys");
        }

        if matches.get_flag("json") {
            println!("{}", serde_json::to_string_pretty(&render_json(&report))?);
        } else {
            for line in render_table(&report, matches.get_flag("missing")) {
                println!("{line}");
            }
        }
        Ok(())
    }
}
