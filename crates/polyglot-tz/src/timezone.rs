//! Per-thread active time zone.
//!
//! ## Quick Start
//!
//! ```
//! use chrono::{FixedOffset, TimeZone};
//! use polyglot_tz::timezone;
//!
//! let utc = FixedOffset::east_opt(0).unwrap();
//! let noon = utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
//!
//! timezone::activate_timezone("Europe/Sofia").unwrap();
//! assert_eq!(timezone::localtime(&noon).to_rfc3339(), "2024-07-01T15:00:00+03:00");
//! timezone::deactivate_timezone();
//! ```

use std::cell::RefCell;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};

use polyglot_core::{PolyglotResult, SETTINGS};

use crate::tz::{self, Zone};

thread_local! {
    /// `None` means the configured default zone.
    static CURRENT_TIMEZONE: RefCell<Option<Arc<Zone>>> = const { RefCell::new(None) };
}

/// Activates a zone from the global database for the current thread.
pub fn activate_timezone(name: &str) -> PolyglotResult<()> {
    let zone = tz::global().zone(name)?;
    activate_zone(zone);
    Ok(())
}

/// Activates an already resolved zone for the current thread.
pub fn activate_zone(zone: Arc<Zone>) {
    CURRENT_TIMEZONE.with(|cell| {
        *cell.borrow_mut() = Some(zone);
    });
}

/// Deactivates the current thread's zone, reverting to the default.
pub fn deactivate_timezone() {
    CURRENT_TIMEZONE.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

/// Returns `true` if a zone has been activated for the current thread.
pub fn is_timezone_active() -> bool {
    CURRENT_TIMEZONE.with(|cell| cell.borrow().is_some())
}

/// The zone used when none is active: `SETTINGS.time_zone`, else UTC.
pub fn default_timezone() -> Arc<Zone> {
    let name = SETTINGS
        .try_get()
        .map_or("UTC", |settings| settings.time_zone.as_str());
    tz::global().zone(name).unwrap_or_else(|e| {
        tracing::warn!(zone = %name, error = %e, "falling back to UTC");
        Arc::new(Zone::utc())
    })
}

/// Returns the current thread's zone.
pub fn current_timezone() -> Arc<Zone> {
    CURRENT_TIMEZONE
        .with(|cell| cell.borrow().clone())
        .unwrap_or_else(default_timezone)
}

/// Returns the current date and time in UTC.
pub fn now() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

/// Returns the current date and time in the current thread's zone.
pub fn localnow() -> DateTime<FixedOffset> {
    current_timezone().to_local(&Utc::now())
}

/// Converts a datetime to the current thread's zone.
pub fn localtime(dt: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    localtime_in(dt, &current_timezone())
}

/// Converts a datetime to a specific zone.
pub fn localtime_in(dt: &DateTime<FixedOffset>, zone: &Zone) -> DateTime<FixedOffset> {
    zone.to_local(&dt.with_timezone(&Utc))
}

/// The abbreviation in effect for `dt` in the current thread's zone.
pub fn abbreviation(dt: &DateTime<FixedOffset>) -> String {
    current_timezone().abbr(dt.timestamp_millis()).to_string()
}
