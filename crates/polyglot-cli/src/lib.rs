//! # polyglot-cli
//!
//! The `polyglot` management binary and the command framework behind it.
//!
//! | Command | Does |
//! |---|---|
//! | `translate <key>` | render a key with `--locale`, `--count`, `--var name=value` |
//! | `coverage` | per-locale coverage against `--reference` |
//! | `lint` | placeholder and plural-form checks against `--reference` |
//! | `tz <zone>` | local time, abbreviation and offset; `--list`, `--pack` |
//! | `age <date>` | relative age of an instant in the chosen `--style` |
//!
//! ## Quick Start
//!
//! ```rust
//! use polyglot_cli::app::builtin_registry;
//!
//! let registry = builtin_registry();
//! let names = registry.list_commands();
//! assert!(names.contains(&"translate"));
//! assert!(names.contains(&"lint"));
//! ```

// - significant_drop_tightening: store guards are held across whole reports
// - unused_async: command handlers keep one async signature
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::unused_async)]

pub mod app;
pub mod command;
pub mod commands;
pub mod context;

pub use command::{CommandRegistry, ManagementCommand};
pub use context::CommandContext;
