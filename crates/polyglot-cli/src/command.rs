//! The management command framework.
//!
//! A [`ManagementCommand`] names itself, declares its arguments and handles
//! a parsed invocation. [`CommandRegistry`] collects commands and builds the
//! `polyglot` clap application from them.
//!
//! ## Defining a Custom Command
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use polyglot_cli::command::ManagementCommand;
//! use polyglot_cli::context::CommandContext;
//! use polyglot_core::PolyglotResult;
//!
//! struct LocalesCommand;
//!
//! #[async_trait]
//! impl ManagementCommand for LocalesCommand {
//!     fn name(&self) -> &str { "locales" }
//!     fn help(&self) -> &str { "List loaded locales" }
//!
//!     async fn handle(
//!         &self,
//!         _matches: &clap::ArgMatches,
//!         ctx: &CommandContext,
//!     ) -> PolyglotResult<()> {
//!         let store = ctx.i18n.store().read().expect("translation store lock poisoned");
//!         for locale in store.locales() {
//!             println!("{locale}");
//!         }
//!         Ok(())
//!     }
//! }
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;
use polyglot_core::{PolyglotError, PolyglotResult};

use crate::context::CommandContext;

/// A command that can be registered and invoked through the CLI.
#[async_trait]
pub trait ManagementCommand: Send + Sync {
    /// The subcommand name.
    fn name(&self) -> &str;

    /// One-line help text.
    fn help(&self) -> &str;

    /// Adds positional arguments, flags or options. Defaults to none.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Runs the command.
    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext)
        -> PolyglotResult<()>;
}

/// Commands by name, kept sorted for help output.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Box<dyn ManagementCommand>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command, replacing any with the same name.
    pub fn register(&mut self, command: Box<dyn ManagementCommand>) {
        let name = command.name().to_string();
        self.commands.insert(name, command);
    }

    pub fn get(&self, name: &str) -> Option<&dyn ManagementCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Registered command names, sorted.
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Builds the top-level clap `Command` with one subcommand per entry.
    pub fn build_cli(&self) -> clap::Command {
        let mut app = clap::Command::new("polyglot")
            .about("Translation, plural rule and time zone tooling")
            .subcommand_required(true)
            .arg_required_else_help(true);

        for (name, cmd) in &self.commands {
            let subcmd = clap::Command::new(name.clone()).about(cmd.help().to_string());
            app = app.subcommand(cmd.add_arguments(subcmd));
        }
        app
    }

    /// Dispatches to the subcommand named in `matches`.
    pub async fn execute(
        &self,
        matches: &clap::ArgMatches,
        ctx: &CommandContext,
    ) -> PolyglotResult<()> {
        let (name, sub_matches) = matches.subcommand().ok_or_else(|| {
            PolyglotError::ConfigurationError("No subcommand specified".to_string())
        })?;

        let cmd = self.get(name).ok_or_else(|| {
            PolyglotError::ConfigurationError(format!("Unknown command: {name}"))
        })?;

        tracing::debug!(command = name, "running command");
        cmd.handle(sub_matches, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyglot_core::Settings;

    struct EchoCommand {
        cmd_name: String,
    }

    impl EchoCommand {
        fn new(name: &str) -> Self {
            Self {
                cmd_name: name.to_string(),
            }
        }
    }

    #[async_trait]
    impl ManagementCommand for EchoCommand {
        fn name(&self) -> &str {
            &self.cmd_name
        }

        fn help(&self) -> &'static str {
            "Echo a word"
        }

        fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
            cmd.arg(clap::Arg::new("word").required(true)).arg(
                clap::Arg::new("loud")
                    .long("loud")
                    .action(clap::ArgAction::SetTrue),
            )
        }

        async fn handle(
            &self,
            matches: &clap::ArgMatches,
            _ctx: &CommandContext,
        ) -> PolyglotResult<()> {
            match matches.get_one::<String>("word").map(String::as_str) {
                Some("fail") => Err(PolyglotError::ConfigurationError("deliberate".into())),
                _ => Ok(()),
            }
        }
    }

    fn ctx() -> CommandContext {
        CommandContext::bundled(Settings::default()).unwrap()
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(EchoCommand::new("echo")));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("echo").unwrap().help(), "Echo a word");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_list_commands_sorted() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(EchoCommand::new("zebra")));
        registry.register(Box::new(EchoCommand::new("alpha")));
        registry.register(Box::new(EchoCommand::new("alpha")));
        assert_eq!(registry.list_commands(), vec!["alpha", "zebra"]);
    }

    #[test]
    fn test_build_cli_with_arguments() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(EchoCommand::new("echo")));

        let matches = registry
            .build_cli()
            .try_get_matches_from(["polyglot", "echo", "hi", "--loud"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "echo");
        assert!(sub.get_flag("loud"));

        assert!(registry
            .build_cli()
            .try_get_matches_from(["polyglot", "echo"])
            .is_err());
    }

    #[tokio::test]
    async fn test_execute_dispatches() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(EchoCommand::new("echo")));
        let ctx = ctx();

        let ok = registry
            .build_cli()
            .try_get_matches_from(["polyglot", "echo", "hi"])
            .unwrap();
        assert!(registry.execute(&ok, &ctx).await.is_ok());

        let fail = registry
            .build_cli()
            .try_get_matches_from(["polyglot", "echo", "fail"])
            .unwrap();
        let err = registry.execute(&fail, &ctx).await.unwrap_err();
        assert_eq!(err.code(), "config");
    }
}
