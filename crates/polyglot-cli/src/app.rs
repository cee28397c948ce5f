//! Argument parsing, settings and data loading around the registry.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use polyglot_core::logging::setup_logging;
use polyglot_core::{settings_loader, PolyglotError, PolyglotResult, Settings, SETTINGS};

use crate::command::CommandRegistry;
use crate::commands::register_builtin_commands;
use crate::context::CommandContext;

/// A registry holding every built-in command.
pub fn builtin_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);
    registry
}

/// The full `polyglot` application: the registry's subcommands plus the
/// global `--settings` and `--locale-dir` flags.
pub fn build_app(registry: &CommandRegistry) -> clap::Command {
    registry
        .build_cli()
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            clap::Arg::new("settings")
                .long("settings")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Settings file (.toml, otherwise JSON)"),
        )
        .arg(
            clap::Arg::new("locale-dir")
                .long("locale-dir")
                .global(true)
                .action(clap::ArgAction::Append)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Directory of *.json bundles loaded after the embedded ones"),
        )
}

/// Settings from `--settings` when given, else defaults, with environment
/// overrides applied either way.
pub fn load_settings(path: Option<&PathBuf>) -> PolyglotResult<Settings> {
    match path {
        Some(path) => settings_loader::from_file_with_env(path),
        None => Ok(settings_loader::from_env()),
    }
}

/// Parses `args`, loads settings and data, and runs the chosen command.
pub async fn run<I, T>(args: I) -> PolyglotResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let registry = builtin_registry();
    let matches = match build_app(&registry).try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) => {
            return match e.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    let _ = e.print();
                    Ok(())
                }
                _ => Err(PolyglotError::ConfigurationError(e.to_string())),
            }
        }
    };

    let settings = load_settings(matches.get_one::<PathBuf>("settings"))?;
    setup_logging(&settings);
    if !SETTINGS.is_configured() {
        SETTINGS.configure(settings.clone());
    }

    let locale_dirs: Vec<PathBuf> = matches
        .get_many::<PathBuf>("locale-dir")
        .map(|dirs| dirs.cloned().collect())
        .unwrap_or_default();
    let ctx = CommandContext::load(settings, &locale_dirs)?;

    registry.execute(&matches, &ctx).await
}

/// Process exit status for an error, by its code.
pub fn exit_status(err: &PolyglotError) -> u8 {
    match err.code() {
        "config" => 2,
        "data" => 3,
        "locale" => 4,
        "tz" => 5,
        "date" => 6,
        "io" => 7,
        _ => 1,
    }
}
