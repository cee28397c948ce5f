//! Relative ages ("5m", "3 days ago") from the `dates.*` translation
//! tables.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};

use polyglot_core::i18n::{I18n, TranslateOptions};
use polyglot_core::PolyglotError;

const MINUTES_PER_HOUR: f64 = 60.0;
const MINUTES_PER_DAY: f64 = 1_440.0;
const MINUTES_PER_MONTH: f64 = 43_200.0;
const MINUTES_PER_YEAR: f64 = 525_600.0;

/// How verbose the rendered age is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// `5m`, `3d`.
    #[default]
    Tiny,
    /// `5 mins`, or `5 mins ago` with `with_ago`.
    Medium { with_ago: bool },
}

impl Style {
    /// The translation scope holding this style's keys.
    pub const fn scope(self) -> &'static str {
        match self {
            Self::Tiny => "dates.tiny",
            Self::Medium { with_ago: false } => "dates.medium",
            Self::Medium { with_ago: true } => "dates.medium_with_ago",
        }
    }

    const fn hours_key(self) -> &'static str {
        match self {
            Self::Tiny => "about_x_hours",
            Self::Medium { .. } => "x_hours",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tiny => "tiny",
            Self::Medium { with_ago: false } => "medium",
            Self::Medium { with_ago: true } => "medium_with_ago",
        })
    }
}

impl FromStr for Style {
    type Err = PolyglotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tiny" => Ok(Self::Tiny),
            "medium" => Ok(Self::Medium { with_ago: false }),
            "medium_with_ago" | "ago" => Ok(Self::Medium { with_ago: true }),
            other => Err(PolyglotError::ConfigurationError(format!(
                "unknown relative age style {other:?}"
            ))),
        }
    }
}

/// The key and count a distance in whole minutes renders as.
///
/// Negative distances count as zero.
pub fn distance_key(minutes: f64, style: Style) -> (&'static str, f64) {
    let m = minutes.max(0.0);
    if m < 1.0 {
        ("less_than_x_minutes", 1.0)
    } else if m < 45.0 {
        ("x_minutes", m)
    } else if m < MINUTES_PER_DAY {
        (style.hours_key(), (m / MINUTES_PER_HOUR).round())
    } else if m < MINUTES_PER_MONTH {
        ("x_days", (m / MINUTES_PER_DAY).round())
    } else if m < MINUTES_PER_YEAR {
        ("x_months", (m / MINUTES_PER_MONTH).round())
    } else {
        let years = (m / MINUTES_PER_YEAR).floor();
        let remainder = ((m % MINUTES_PER_YEAR) / MINUTES_PER_MONTH).floor();
        if remainder < 3.0 {
            ("about_x_years", years)
        } else if remainder < 9.0 {
            ("over_x_years", years)
        } else {
            ("almost_x_years", years + 1.0)
        }
    }
}

/// Renders how long before `now` the moment `date` was.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use polyglot_core::bundled::bundled_translations;
/// use polyglot_core::i18n::I18n;
/// use polyglot_tz::relative::{relative_age, Style};
///
/// let i18n = I18n::from_translations(bundled_translations().unwrap());
/// let now = DateTime::parse_from_rfc3339("2024-05-10T12:00:00Z").unwrap();
/// let posted = DateTime::parse_from_rfc3339("2024-05-07T11:00:00Z").unwrap();
/// assert_eq!(relative_age(&posted, &now, Style::Tiny, &i18n, "en"), "3d");
/// assert_eq!(
///     relative_age(&posted, &now, Style::Medium { with_ago: true }, &i18n, "bg"),
///     "преди 3 дни",
/// );
/// ```
pub fn relative_age(
    date: &DateTime<FixedOffset>,
    now: &DateTime<FixedOffset>,
    style: Style,
    i18n: &I18n,
    locale: &str,
) -> String {
    #[allow(clippy::cast_precision_loss)]
    let seconds = now.signed_duration_since(*date).num_seconds() as f64;
    let minutes = (seconds / 60.0).round();
    let (key, count) = distance_key(minutes, style);
    let scope = format!("{}.{key}", style.scope());
    tracing::trace!(%scope, count, "relative age");
    i18n.pluralize(count, &scope, &TranslateOptions::new().locale(locale))
}

/// [`relative_age`] measured against the current time.
pub fn relative_age_now(
    date: &DateTime<FixedOffset>,
    style: Style,
    i18n: &I18n,
    locale: &str,
) -> String {
    relative_age(date, &crate::timezone::now(), style, i18n, locale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use polyglot_core::bundled::bundled_translations;

    fn bundled() -> I18n {
        I18n::from_translations(bundled_translations().unwrap())
    }

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-05-10T12:00:00+00:00").unwrap()
    }

    fn ago(i18n: &I18n, style: Style, locale: &str, minutes: i64) -> String {
        let date = now() - TimeDelta::minutes(minutes);
        relative_age(&date, &now(), style, i18n, locale)
    }

    #[test]
    fn test_distance_thresholds() {
        let tiny = Style::Tiny;
        assert_eq!(distance_key(0.0, tiny), ("less_than_x_minutes", 1.0));
        assert_eq!(distance_key(1.0, tiny), ("x_minutes", 1.0));
        assert_eq!(distance_key(44.0, tiny), ("x_minutes", 44.0));
        assert_eq!(distance_key(45.0, tiny), ("about_x_hours", 1.0));
        assert_eq!(distance_key(89.0, tiny), ("about_x_hours", 1.0));
        assert_eq!(distance_key(90.0, tiny), ("about_x_hours", 2.0));
        assert_eq!(distance_key(1_439.0, tiny), ("about_x_hours", 24.0));
        assert_eq!(distance_key(1_440.0, tiny), ("x_days", 1.0));
        assert_eq!(distance_key(43_199.0, tiny), ("x_days", 30.0));
        assert_eq!(distance_key(43_200.0, tiny), ("x_months", 1.0));
        assert_eq!(distance_key(525_599.0, tiny), ("x_months", 12.0));
    }

    #[test]
    fn test_distance_years() {
        let style = Style::Medium { with_ago: false };
        let year = MINUTES_PER_YEAR;
        let month = MINUTES_PER_MONTH;
        assert_eq!(distance_key(year, style), ("about_x_years", 1.0));
        assert_eq!(distance_key(year + 2.0 * month, style), ("about_x_years", 1.0));
        assert_eq!(distance_key(year + 3.0 * month, style), ("over_x_years", 1.0));
        assert_eq!(distance_key(2.0 * year + 8.0 * month, style), ("over_x_years", 2.0));
        assert_eq!(distance_key(2.0 * year + 9.0 * month, style), ("almost_x_years", 3.0));
    }

    #[test]
    fn test_medium_uses_plain_hours() {
        let medium = Style::Medium { with_ago: true };
        assert_eq!(distance_key(120.0, medium), ("x_hours", 2.0));
    }

    #[test]
    fn test_future_clamps_to_zero() {
        assert_eq!(distance_key(-500.0, Style::Tiny), ("less_than_x_minutes", 1.0));
        let i18n = bundled();
        let date = now() + TimeDelta::days(3);
        assert_eq!(relative_age(&date, &now(), Style::Tiny, &i18n, "en"), "< 1m");
    }

    #[test]
    fn test_tiny_english() {
        let i18n = bundled();
        assert_eq!(ago(&i18n, Style::Tiny, "en", 5), "5m");
        assert_eq!(ago(&i18n, Style::Tiny, "en", 180), "3h");
        assert_eq!(ago(&i18n, Style::Tiny, "en", 60 * 24 * 40), "1mon");
    }

    #[test]
    fn test_medium_english_plurals() {
        let i18n = bundled();
        let medium = Style::Medium { with_ago: false };
        assert_eq!(ago(&i18n, medium, "en", 1), "1 min");
        assert_eq!(ago(&i18n, medium, "en", 2), "2 mins");
        assert_eq!(ago(&i18n, medium, "en", 60), "1 hour");
        let with_ago = Style::Medium { with_ago: true };
        assert_eq!(ago(&i18n, with_ago, "en", 60 * 24 * 2), "2 days ago");
    }

    #[test]
    fn test_bulgarian() {
        let i18n = bundled();
        assert_eq!(ago(&i18n, Style::Tiny, "bg", 5), "5 мин");
        let with_ago = Style::Medium { with_ago: true };
        assert_eq!(ago(&i18n, with_ago, "bg", 1), "преди 1 минута");
        assert_eq!(ago(&i18n, with_ago, "bg", 60 * 24 * 3), "преди 3 дни");
    }

    #[test]
    fn test_sub_minute_rounding() {
        let i18n = bundled();
        let date = now() - TimeDelta::seconds(29);
        assert_eq!(relative_age(&date, &now(), Style::Tiny, &i18n, "en"), "< 1m");
        let date = now() - TimeDelta::seconds(31);
        assert_eq!(relative_age(&date, &now(), Style::Tiny, &i18n, "en"), "1m");
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("tiny".parse::<Style>().unwrap(), Style::Tiny);
        assert_eq!(
            "medium".parse::<Style>().unwrap(),
            Style::Medium { with_ago: false }
        );
        assert_eq!(
            "medium_with_ago".parse::<Style>().unwrap(),
            Style::Medium { with_ago: true }
        );
        assert!("huge".parse::<Style>().is_err());
        assert_eq!(Style::Medium { with_ago: true }.to_string(), "medium_with_ago");
    }
}
