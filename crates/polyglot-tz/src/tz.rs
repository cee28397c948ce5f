//! Packed IANA time zone data.
//!
//! - [`base60`]: the number encoding used by packed strings
//! - [`Zone`]: one unpacked zone with offset, abbreviation and wall-time lookups
//! - [`TzDatabase`]: zones, links and countries, with lazily unpacked zones

pub mod base60;
pub mod database;
pub mod zone;

pub use base60::{pack_base60, unpack_base60};
pub use database::{global, normalize_name, PackedBundle, TzDatabase};
pub use zone::{ParseOptions, Zone, UNBOUNDED};
