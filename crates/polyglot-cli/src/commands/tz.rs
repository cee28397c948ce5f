//! The `tz` command.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use polyglot_core::{PolyglotError, PolyglotResult};
use polyglot_tz::format::{strftime_with, DateNames};
use polyglot_tz::tz::TzDatabase;

use crate::command::ManagementCommand;
use crate::context::CommandContext;

/// Shows the local time, abbreviation and offset of a zone.
pub struct TzCommand;

pub(crate) fn parse_instant(value: &str) -> PolyglotResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PolyglotError::ConfigurationError(format!("invalid date {value:?}: {e}")))
}

/// `Europe/Sofia  2024-07-01 15:00:00 EEST (+0300)`
pub fn describe_zone(db: &TzDatabase, name: &str, at: &DateTime<Utc>) -> PolyglotResult<String> {
    let zone = db.zone(name)?;
    let local = zone.to_local(at);
    let abbr = zone.abbr(at.timestamp_millis());
    let when = strftime_with(
        &local,
        "%Y-%m-%d %H:%M:%S %Z (%z)",
        &DateNames::english(),
        Some(abbr),
    );
    Ok(format!("{}  {when}", zone.name()))
}

/// Zone names, optionally limited to one country.
pub fn list_zones(db: &TzDatabase, country: Option<&str>) -> Vec<String> {
    match country {
        Some(code) => db.zones_for_country(code),
        None => db.names(),
    }
}

#[async_trait]
impl ManagementCommand for TzCommand {
    fn name(&self) -> &'static str {
        "tz"
    }

    fn help(&self) -> &'static str {
        "Show the local time in a time zone"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("zone")
                .required_unless_present("list")
                .help("Zone name or alias, e.g. Europe/Sofia"),
        )
        .arg(
            clap::Arg::new("at")
                .long("at")
                .help("RFC 3339 instant to convert (defaults to now)"),
        )
        .arg(
            clap::Arg::new("pack")
                .long("pack")
                .action(clap::ArgAction::SetTrue)
                .help("Print the zone in packed form"),
        )
        .arg(
            clap::Arg::new("list")
                .long("list")
                .action(clap::ArgAction::SetTrue)
                .help("List zone names instead"),
        )
        .arg(
            clap::Arg::new("country")
                .long("country")
                .requires("list")
                .help("With --list, only zones of this ISO country code"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> PolyglotResult<()> {
        if matches.get_flag("list") {
            let country = matches.get_one::<String>("country").map(String::as_str);
            for name in list_zones(&ctx.tz, country) {
                println!("{name}");
            }
            return Ok(());
        }

        let name = matches
            .get_one::<String>("zone")
            .map_or("UTC", String::as_str);
        if matches.get_flag("pack") {
            println!("{}", ctx.tz.zone(name)?.pack());
            return Ok(());
        }

        let at = match matches.get_one::<String>("at") {
            Some(value) => parse_instant(value)?,
            None => Utc::now(),
        };
        println!("{}", describe_zone(&ctx.tz, name, &at)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> TzDatabase {
        TzDatabase::bundled().unwrap()
    }

    #[test]
    fn test_describe_zone() {
        let at = parse_instant("2024-07-01T12:00:00Z").unwrap();
        assert_eq!(
            describe_zone(&db(), "Europe/Sofia", &at).unwrap(),
            "Europe/Sofia  2024-07-01 15:00:00 EEST (+0300)"
        );
        assert_eq!(
            describe_zone(&db(), "us/eastern", &at).unwrap(),
            "US/Eastern  2024-07-01 08:00:00 EDT (-0400)"
        );
    }

    #[test]
    fn test_unknown_zone() {
        let at = parse_instant("2024-07-01T12:00:00Z").unwrap();
        let err = describe_zone(&db(), "Mars/Olympus", &at).unwrap_err();
        assert_eq!(err.code(), "tz");
    }

    #[test]
    fn test_parse_instant() {
        let at = parse_instant("2024-07-01T15:00:00+03:00").unwrap();
        assert_eq!(at.to_rfc3339(), "2024-07-01T12:00:00+00:00");
        assert!(parse_instant("yesterday").is_err());
    }

    #[test]
    fn test_list_zones() {
        assert_eq!(list_zones(&db(), Some("bg")), vec!["Europe/Sofia".to_string()]);
        let all = list_zones(&db(), None);
        assert!(all.contains(&"America/New_York".to_string()));
        assert!(all.contains(&"UTC".to_string()));
    }

    #[test]
    fn test_arguments() {
        let cmd = || TzCommand.add_arguments(clap::Command::new("tz"));
        assert!(cmd().try_get_matches_from(["tz"]).is_err());
        assert!(cmd().try_get_matches_from(["tz", "--list"]).is_ok());
        assert!(cmd().try_get_matches_from(["tz", "UTC", "--country", "BG"]).is_err());
    }
}
