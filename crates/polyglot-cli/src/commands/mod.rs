//! Built-in commands.

pub mod age;
pub mod coverage;
pub mod lint;
pub mod translate;
pub mod tz;

pub use age::AgeCommand;
pub use coverage::CoverageCommand;
pub use lint::LintCommand;
pub use translate::TranslateCommand;
pub use tz::TzCommand;

use crate::command::CommandRegistry;

/// Registers every built-in command.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(TranslateCommand));
    registry.register(Box::new(CoverageCommand));
    registry.register(Box::new(LintCommand));
    registry.register(Box::new(TzCommand));
    registry.register(Box::new(AgeCommand));
}
