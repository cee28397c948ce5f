//! # polyglot-tz
//!
//! Date and time support for polyglot: calendar arithmetic, `strftime` with
//! localised names, relative ages and a packed IANA timezone database.
//!
//! ## Modules
//!
//! - [`calendar`] - Add, subtract, start/end of unit, differences, comparisons
//! - [`format`] - `strftime` and `localize` backed by the translation tables
//! - [`relative`] - "3d" / "3 days ago" style ages
//! - [`tz`] - Base-60 packed zones and the zone database
//! - [`timezone`] - Per-thread active zone and local time conversion

pub mod calendar;
pub mod format;
pub mod relative;
pub mod timezone;
pub mod tz;

pub use calendar::Unit;
pub use format::{localize, strftime, DateNames};
pub use relative::{relative_age, Style};
pub use tz::{TzDatabase, Zone};
