//! `strftime` with day, month and meridian names from the translation
//! tables.
//!
//! | Directive | Output |
//! |---|---|
//! | `%a` `%A` | abbreviated / full day name |
//! | `%b` `%B` | abbreviated / full month name |
//! | `%c` | `%a %b %e %H:%M:%S %Y` |
//! | `%d` `%-d` `%e` | day of month: zero padded, unpadded, space padded |
//! | `%H` `%-H` | hour (24h) |
//! | `%I` `%-I` `%l` | hour (12h): zero padded, unpadded, space padded |
//! | `%j` | day of year, 3 digits |
//! | `%m` `%-m` | month number |
//! | `%M` `%-M` | minute |
//! | `%p` `%P` | meridian, upper / lower case |
//! | `%S` `%-S` | second |
//! | `%w` | weekday number, Sunday is 0 |
//! | `%y` `%Y` | 2-digit / full year |
//! | `%z` | offset as `+0200` |
//! | `%Z` | zone abbreviation, or the offset as `+02:00` |
//! | `%%` | `%` |
//!
//! Unknown directives are copied through unchanged.

use std::fmt::Write as _;

use chrono::{DateTime, Datelike, FixedOffset, Timelike};

use polyglot_core::i18n::{I18n, TranslateOptions};

const EN_DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
const EN_ABBR_DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const EN_MONTH_NAMES: [&str; 13] = [
    "",
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
const EN_ABBR_MONTH_NAMES: [&str; 13] = [
    "", "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The localised names `strftime` substitutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateNames {
    /// Sunday first.
    pub day_names: Vec<String>,
    pub abbr_day_names: Vec<String>,
    /// Index 0 is unused so that January is 1.
    pub month_names: Vec<String>,
    pub abbr_month_names: Vec<String>,
    pub am: String,
    pub pm: String,
}

impl Default for DateNames {
    fn default() -> Self {
        Self::english()
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

impl DateNames {
    pub fn english() -> Self {
        Self {
            day_names: owned(&EN_DAY_NAMES),
            abbr_day_names: owned(&EN_ABBR_DAY_NAMES),
            month_names: owned(&EN_MONTH_NAMES),
            abbr_month_names: owned(&EN_ABBR_MONTH_NAMES),
            am: "AM".to_string(),
            pm: "PM".to_string(),
        }
    }

    /// Names for `locale`, falling back per list to English.
    pub fn for_locale(i18n: &I18n, locale: &str) -> Self {
        let english = Self::english();
        let list = |scope: &str, len: usize, fallback: Vec<String>| {
            i18n.translate_list(scope, locale)
                .filter(|names| names.len() == len)
                .unwrap_or(fallback)
        };
        let options = TranslateOptions::new().locale(locale);
        let text = |scope: &str, fallback: String| {
            i18n.try_translate(scope, &options).unwrap_or(fallback)
        };

        Self {
            day_names: list("date.day_names", 7, english.day_names),
            abbr_day_names: list("date.abbr_day_names", 7, english.abbr_day_names),
            month_names: list("date.month_names", 13, english.month_names),
            abbr_month_names: list("date.abbr_month_names", 13, english.abbr_month_names),
            am: text("time.am", english.am),
            pm: text("time.pm", english.pm),
        }
    }
}

/// Formats `dt` with names from the translation tables of `locale`.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use polyglot_core::bundled::bundled_translations;
/// use polyglot_core::i18n::I18n;
/// use polyglot_tz::format::strftime;
///
/// let i18n = I18n::from_translations(bundled_translations().unwrap());
/// let dt = DateTime::parse_from_rfc3339("2024-03-05T14:07:09+02:00").unwrap();
/// assert_eq!(strftime(&dt, "%A, %-d %B %Y", &i18n, "bg"), "вторник, 5 март 2024");
/// assert_eq!(strftime(&dt, "%a %b %d %I:%M %p", &i18n, "en"), "Tue Mar 05 02:07 PM");
/// ```
pub fn strftime(dt: &DateTime<FixedOffset>, pattern: &str, i18n: &I18n, locale: &str) -> String {
    strftime_with(dt, pattern, &DateNames::for_locale(i18n, locale), None)
}

/// Formats `dt` with explicit names and an optional zone abbreviation.
pub fn strftime_with(
    dt: &DateTime<FixedOffset>,
    pattern: &str,
    names: &DateNames,
    zone_abbr: Option<&str>,
) -> String {
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let unpadded = chars.next_if_eq(&'-').is_some();
        let Some(directive) = chars.next() else {
            out.push('%');
            if unpadded {
                out.push('-');
            }
            break;
        };
        if !write_directive(&mut out, dt, directive, unpadded, names, zone_abbr) {
            out.push('%');
            if unpadded {
                out.push('-');
            }
            out.push(directive);
        }
    }
    out
}

fn pad2(out: &mut String, value: u32, unpadded: bool) {
    if unpadded {
        let _ = write!(out, "{value}");
    } else {
        let _ = write!(out, "{value:02}");
    }
}

fn name(list: &[String], index: usize) -> &str {
    list.get(index).map_or("", String::as_str)
}

/// Writes one directive. Returns `false` for an unknown directive.
fn write_directive(
    out: &mut String,
    dt: &DateTime<FixedOffset>,
    directive: char,
    unpadded: bool,
    names: &DateNames,
    zone_abbr: Option<&str>,
) -> bool {
    let weekday = dt.weekday().num_days_from_sunday() as usize;
    let month = dt.month() as usize;
    let (is_pm, hour12) = dt.hour12();
    let meridian = if is_pm { &names.pm } else { &names.am };
    let offset = dt.offset().local_minus_utc();
    let (sign, offset_abs) = if offset < 0 { ('-', -offset) } else { ('+', offset) };

    match directive {
        'a' => out.push_str(name(&names.abbr_day_names, weekday)),
        'A' => out.push_str(name(&names.day_names, weekday)),
        'b' => out.push_str(name(&names.abbr_month_names, month)),
        'B' => out.push_str(name(&names.month_names, month)),
        'c' => out.push_str(&strftime_with(dt, "%a %b %e %H:%M:%S %Y", names, zone_abbr)),
        'd' => pad2(out, dt.day(), unpadded),
        'e' => {
            let _ = write!(out, "{:>2}", dt.day());
        }
        'H' => pad2(out, dt.hour(), unpadded),
        'I' => pad2(out, hour12, unpadded),
        'l' => {
            let _ = write!(out, "{hour12:>2}");
        }
        'j' => {
            let _ = write!(out, "{:03}", dt.ordinal());
        }
        'm' => pad2(out, dt.month(), unpadded),
        'M' => pad2(out, dt.minute(), unpadded),
        'p' => out.push_str(&meridian.to_uppercase()),
        'P' => out.push_str(&meridian.to_lowercase()),
        'S' => pad2(out, dt.second(), unpadded),
        'w' => {
            let _ = write!(out, "{weekday}");
        }
        'y' => {
            let _ = write!(out, "{:02}", dt.year().rem_euclid(100));
        }
        'Y' => {
            let _ = write!(out, "{}", dt.year());
        }
        'z' => {
            let _ = write!(out, "{sign}{:02}{:02}", offset_abs / 3600, offset_abs % 3600 / 60);
        }
        'Z' => match zone_abbr {
            Some(abbr) => out.push_str(abbr),
            None => {
                let _ = write!(out, "{sign}{:02}:{:02}", offset_abs / 3600, offset_abs % 3600 / 60);
            }
        },
        '%' => out.push('%'),
        _ => return false,
    }
    true
}

/// Formats `dt` with the pattern stored at `scope`, e.g.
/// `date.formats.long` or `time.formats.short`.
///
/// A missing pattern renders the usual missing-translation marker.
pub fn localize(dt: &DateTime<FixedOffset>, scope: &str, i18n: &I18n, locale: &str) -> String {
    let pattern = i18n.translate(scope, &TranslateOptions::new().locale(locale));
    strftime(dt, &pattern, i18n, locale)
}
