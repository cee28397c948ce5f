//! Calendar arithmetic on `DateTime<FixedOffset>`.
//!
//! Calendar units (years, quarters, months, weeks, days) move the wall-clock
//! date and keep the time of day; month arithmetic clamps the day to the
//! length of the target month. Time units are exact durations.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, FixedOffset, Months, NaiveDate, TimeDelta, Timelike};

use polyglot_core::{PolyglotError, PolyglotResult};

/// A unit of calendar arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Year,
    Quarter,
    Month,
    /// A week starting on Sunday.
    Week,
    /// A week starting on Monday.
    IsoWeek,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl Unit {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Quarter => "quarter",
            Self::Month => "month",
            Self::Week => "week",
            Self::IsoWeek => "isoWeek",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Millisecond => "millisecond",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = PolyglotError;

    /// Short aliases are case-sensitive (`M` is month, `m` is minute);
    /// long and plural names are not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s {
            "y" => Self::Year,
            "Q" => Self::Quarter,
            "M" => Self::Month,
            "w" => Self::Week,
            "W" => Self::IsoWeek,
            "d" | "D" => Self::Day,
            "h" => Self::Hour,
            "m" => Self::Minute,
            "s" => Self::Second,
            "ms" => Self::Millisecond,
            _ => match s.to_ascii_lowercase().as_str() {
                "year" | "years" => Self::Year,
                "quarter" | "quarters" => Self::Quarter,
                "month" | "months" => Self::Month,
                "week" | "weeks" => Self::Week,
                "isoweek" | "isoweeks" | "iso_week" | "iso_weeks" => Self::IsoWeek,
                "day" | "days" | "date" => Self::Day,
                "hour" | "hours" => Self::Hour,
                "minute" | "minutes" => Self::Minute,
                "second" | "seconds" => Self::Second,
                "millisecond" | "milliseconds" => Self::Millisecond,
                _ => return Err(PolyglotError::UnknownUnit(s.to_string())),
            },
        };
        Ok(unit)
    }
}

fn out_of_range(dt: &DateTime<FixedOffset>, what: impl fmt::Display) -> PolyglotError {
    PolyglotError::DateOutOfRange(format!("{} {what}", dt.to_rfc3339()))
}

fn shift_months(dt: &DateTime<FixedOffset>, months: i64) -> Option<DateTime<FixedOffset>> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        dt.checked_add_months(magnitude)
    } else {
        dt.checked_sub_months(magnitude)
    }
}

fn shift_days(dt: &DateTime<FixedOffset>, days: i64) -> Option<DateTime<FixedOffset>> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        dt.checked_add_days(magnitude)
    } else {
        dt.checked_sub_days(magnitude)
    }
}

/// Adds `amount` units to `dt`. Negative amounts subtract.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use polyglot_tz::calendar::{add, Unit};
///
/// let jan31 = DateTime::parse_from_rfc3339("2024-01-31T10:00:00+02:00").unwrap();
/// assert_eq!(add(&jan31, 1, Unit::Month).unwrap().to_rfc3339(), "2024-02-29T10:00:00+02:00");
/// ```
pub fn add(
    dt: &DateTime<FixedOffset>,
    amount: i64,
    unit: Unit,
) -> PolyglotResult<DateTime<FixedOffset>> {
    let result = match unit {
        Unit::Year => amount.checked_mul(12).and_then(|m| shift_months(dt, m)),
        Unit::Quarter => amount.checked_mul(3).and_then(|m| shift_months(dt, m)),
        Unit::Month => shift_months(dt, amount),
        Unit::Week | Unit::IsoWeek => amount.checked_mul(7).and_then(|d| shift_days(dt, d)),
        Unit::Day => shift_days(dt, amount),
        Unit::Hour => TimeDelta::try_hours(amount).and_then(|d| dt.checked_add_signed(d)),
        Unit::Minute => TimeDelta::try_minutes(amount).and_then(|d| dt.checked_add_signed(d)),
        Unit::Second => TimeDelta::try_seconds(amount).and_then(|d| dt.checked_add_signed(d)),
        Unit::Millisecond => {
            TimeDelta::try_milliseconds(amount).and_then(|d| dt.checked_add_signed(d))
        }
    };
    result.ok_or_else(|| out_of_range(dt, format_args!("+ {amount} {unit}")))
}

/// Subtracts `amount` units from `dt`.
pub fn subtract(
    dt: &DateTime<FixedOffset>,
    amount: i64,
    unit: Unit,
) -> PolyglotResult<DateTime<FixedOffset>> {
    let negated = amount
        .checked_neg()
        .ok_or_else(|| out_of_range(dt, format_args!("- {amount} {unit}")))?;
    add(dt, negated, unit)
}

/// The first instant of the unit containing `dt`, in `dt`'s offset.
pub fn start_of(dt: &DateTime<FixedOffset>, unit: Unit) -> PolyglotResult<DateTime<FixedOffset>> {
    let date = dt.date_naive();
    let time = dt.time();
    let midnight = |d: NaiveDate| d.and_hms_opt(0, 0, 0);

    let naive = match unit {
        Unit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).and_then(midnight),
        Unit::Quarter => {
            NaiveDate::from_ymd_opt(date.year(), date.month0() / 3 * 3 + 1, 1).and_then(midnight)
        }
        Unit::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1).and_then(midnight),
        Unit::Week => date
            .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_sunday())))
            .and_then(midnight),
        Unit::IsoWeek => date
            .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
            .and_then(midnight),
        Unit::Day => midnight(date),
        Unit::Hour => date.and_hms_opt(time.hour(), 0, 0),
        Unit::Minute => date.and_hms_opt(time.hour(), time.minute(), 0),
        Unit::Second => date.and_hms_opt(time.hour(), time.minute(), time.second()),
        Unit::Millisecond => date.and_hms_milli_opt(
            time.hour(),
            time.minute(),
            time.second(),
            time.nanosecond() / 1_000_000,
        ),
    };

    naive
        .and_then(|n| n.and_local_timezone(*dt.offset()).single())
        .ok_or_else(|| out_of_range(dt, format_args!("start of {unit}")))
}

/// The last millisecond of the unit containing `dt`.
pub fn end_of(dt: &DateTime<FixedOffset>, unit: Unit) -> PolyglotResult<DateTime<FixedOffset>> {
    let next = add(&start_of(dt, unit)?, 1, unit)?;
    subtract(&next, 1, Unit::Millisecond)
}

/// Months from `b` to `a`, fractional relative to the neighbouring
/// month anchors of `a`.
fn month_diff(a: &DateTime<FixedOffset>, b: &DateTime<FixedOffset>) -> Option<f64> {
    let b = b.with_timezone(a.offset());
    if a.day() < b.day() {
        return month_diff(&b, a).map(|m| -m);
    }

    let whole = i64::from(b.year() - a.year()) * 12 + i64::from(b.month()) - i64::from(a.month());
    let anchor = shift_months(a, whole)?;
    let to_b = millis_between(&b, &anchor);

    let adjust = if to_b < 0.0 {
        let anchor2 = shift_months(a, whole - 1)?;
        to_b / millis_between(&anchor, &anchor2)
    } else {
        let anchor2 = shift_months(a, whole + 1)?;
        to_b / millis_between(&anchor2, &anchor)
    };

    #[allow(clippy::cast_precision_loss)]
    let months = -(whole as f64 + adjust);
    Some(if months == 0.0 { 0.0 } else { months })
}

#[allow(clippy::cast_precision_loss)]
fn millis_between(later: &DateTime<FixedOffset>, earlier: &DateTime<FixedOffset>) -> f64 {
    later
        .timestamp_millis()
        .saturating_sub(earlier.timestamp_millis()) as f64
}

/// The difference `a - b` in `unit`.
///
/// Month, quarter and year differences are calendar-aware. Day and week
/// differences discount a change of UTC offset between the two values.
/// Unless `as_float` is set, the result is truncated towards zero.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use polyglot_tz::calendar::{diff, Unit};
///
/// let a = DateTime::parse_from_rfc3339("2024-03-15T00:00:00Z").unwrap();
/// let b = DateTime::parse_from_rfc3339("2024-01-15T00:00:00Z").unwrap();
/// assert_eq!(diff(&a, &b, Unit::Month, false).unwrap(), 2.0);
/// assert_eq!(diff(&b, &a, Unit::Day, false).unwrap(), -60.0);
/// ```
pub fn diff(
    a: &DateTime<FixedOffset>,
    b: &DateTime<FixedOffset>,
    unit: Unit,
    as_float: bool,
) -> PolyglotResult<f64> {
    let delta = millis_between(a, b);
    let zone_delta =
        f64::from(b.offset().local_minus_utc() - a.offset().local_minus_utc()) * 1000.0;
    let months = || month_diff(a, b).ok_or_else(|| out_of_range(a, "month difference"));

    let output = match unit {
        Unit::Year => months()? / 12.0,
        Unit::Quarter => months()? / 3.0,
        Unit::Month => months()?,
        Unit::Week | Unit::IsoWeek => (delta - zone_delta) / 604_800_000.0,
        Unit::Day => (delta - zone_delta) / 86_400_000.0,
        Unit::Hour => delta / 3_600_000.0,
        Unit::Minute => delta / 60_000.0,
        Unit::Second => delta / 1000.0,
        Unit::Millisecond => delta,
    };

    // `+ 0.0` turns a truncated `-0.0` into `0.0`.
    Ok(if as_float { output } else { output.trunc() + 0.0 })
}

/// `a` is before `b`; with a unit, the whole unit of `a` is before `b`.
pub fn is_before(
    a: &DateTime<FixedOffset>,
    b: &DateTime<FixedOffset>,
    unit: Option<Unit>,
) -> PolyglotResult<bool> {
    match unit {
        None | Some(Unit::Millisecond) => Ok(a < b),
        Some(unit) => Ok(end_of(a, unit)? < *b),
    }
}

/// `a` is after `b`; with a unit, the whole unit of `a` is after `b`.
pub fn is_after(
    a: &DateTime<FixedOffset>,
    b: &DateTime<FixedOffset>,
    unit: Option<Unit>,
) -> PolyglotResult<bool> {
    match unit {
        None | Some(Unit::Millisecond) => Ok(a > b),
        Some(unit) => Ok(*b < start_of(a, unit)?),
    }
}

/// `b` falls inside the unit containing `a` (or is the same instant).
pub fn is_same(
    a: &DateTime<FixedOffset>,
    b: &DateTime<FixedOffset>,
    unit: Option<Unit>,
) -> PolyglotResult<bool> {
    match unit {
        None | Some(Unit::Millisecond) => Ok(a == b),
        Some(unit) => Ok(start_of(a, unit)? <= *b && *b <= end_of(a, unit)?),
    }
}

/// Whether the ends of an [`is_between`] range are included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Inclusivity {
    /// `()`
    #[default]
    Exclusive,
    /// `[]`
    Inclusive,
    /// `[)`
    StartInclusive,
    /// `(]`
    EndInclusive,
}

impl FromStr for Inclusivity {
    type Err = PolyglotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "()" => Ok(Self::Exclusive),
            "[]" => Ok(Self::Inclusive),
            "[)" => Ok(Self::StartInclusive),
            "(]" => Ok(Self::EndInclusive),
            _ => Err(PolyglotError::ConfigurationError(format!(
                "inclusivity must be one of (), [], [), (]; got {s:?}"
            ))),
        }
    }
}

/// `dt` lies between `from` and `to`.
pub fn is_between(
    dt: &DateTime<FixedOffset>,
    from: &DateTime<FixedOffset>,
    to: &DateTime<FixedOffset>,
    unit: Option<Unit>,
    inclusivity: Inclusivity,
) -> PolyglotResult<bool> {
    let (start_inclusive, end_inclusive) = match inclusivity {
        Inclusivity::Exclusive => (false, false),
        Inclusivity::Inclusive => (true, true),
        Inclusivity::StartInclusive => (true, false),
        Inclusivity::EndInclusive => (false, true),
    };
    let after_start = if start_inclusive {
        !is_before(dt, from, unit)?
    } else {
        is_after(dt, from, unit)?
    };
    let before_end = if end_inclusive {
        !is_after(dt, to, unit)?
    } else {
        is_before(dt, to, unit)?
    };
    Ok(after_start && before_end)
}

pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days in `month` (1-12) of `year`; `None` for an invalid month.
pub const fn days_in_month(year: i32, month: u32) -> Option<u32> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 if is_leap_year(year) => Some(29),
        2 => Some(28),
        _ => None,
    }
}

/// Day of the year, 1-based.
pub fn day_of_year(dt: &DateTime<FixedOffset>) -> u32 {
    dt.ordinal()
}

/// ISO 8601 week number (1-53).
pub fn iso_week(dt: &DateTime<FixedOffset>) -> u32 {
    dt.iso_week().week()
}

/// The year the ISO week of `dt` belongs to.
pub fn iso_week_year(dt: &DateTime<FixedOffset>) -> i32 {
    dt.iso_week().year()
}
