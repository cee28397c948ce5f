//! Locale-aware number formatting.
//!
//! Formats are read from the translation tables:
//!
//! ```json
//! "number": {
//!   "format": { "separator": ",", "delimiter": " ", "precision": 3 },
//!   "percentage": { "format": { "precision": 1 } },
//!   "human": { "storage_units": { "format": "%n %u", "units": { "kb": "KB" } } }
//! }
//! ```

use super::runtime::{I18n, TranslateOptions};
use super::store::Node;

const STORAGE_UNITS: [&str; 5] = ["byte", "kb", "mb", "gb", "tb"];
const DEFAULT_STORAGE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Rounding and separators for [`to_number`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    /// Digits after the decimal separator.
    pub precision: u32,
    /// Decimal separator.
    pub separator: String,
    /// Thousands delimiter.
    pub delimiter: String,
    /// Drop trailing zeros (and a bare separator) from the fraction.
    pub strip_insignificant_zeros: bool,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            precision: 3,
            separator: ".".to_string(),
            delimiter: ",".to_string(),
            strip_insignificant_zeros: false,
        }
    }
}

impl NumberFormat {
    /// The `number.format` of a locale, defaults for whatever is missing.
    pub fn for_locale(i18n: &I18n, locale: &str) -> Self {
        let mut format = Self::default();
        format.overlay(i18n, locale, "number.format");
        format
    }

    /// `number.format` overlaid with a more specific format such as
    /// `number.percentage.format`.
    pub fn for_scope(i18n: &I18n, locale: &str, scope: &str) -> Self {
        let mut format = Self::for_locale(i18n, locale);
        format.overlay(i18n, locale, scope);
        format
    }

    #[must_use]
    pub const fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    fn overlay(&mut self, i18n: &I18n, locale: &str, scope: &str) {
        let Some((_, Node::Map(fields))) = i18n.lookup(scope, &TranslateOptions::new().locale(locale))
        else {
            return;
        };
        if let Some(Node::Text(separator)) = fields.get("separator") {
            self.separator.clone_from(separator);
        }
        if let Some(Node::Text(delimiter)) = fields.get("delimiter") {
            self.delimiter.clone_from(delimiter);
        }
        if let Some(Node::Number(precision)) = fields.get("precision") {
            if precision.is_finite() && *precision >= 0.0 {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let precision = precision.min(20.0) as u32;
                self.precision = precision;
            }
        }
        if let Some(Node::Bool(strip)) = fields.get("strip_insignificant_zeros") {
            self.strip_insignificant_zeros = *strip;
        }
    }
}

/// Rounds half away from zero to `precision` digits.
pub fn round_half_away(n: f64, precision: u32) -> f64 {
    let factor = 10_f64.powi(i32::try_from(precision).unwrap_or(i32::MAX));
    let rounded = (n.abs() * factor).round() / factor;
    rounded.copysign(n)
}

/// Formats `n` with rounding, a decimal separator and thousands delimiter.
///
/// # Examples
///
/// ```
/// use polyglot_core::i18n::number::{to_number, NumberFormat};
///
/// assert_eq!(to_number(1_234_567.891, &NumberFormat::default()), "1,234,567.891");
/// assert_eq!(to_number(2.5, &NumberFormat::default().with_precision(0)), "3");
/// ```
pub fn to_number(n: f64, format: &NumberFormat) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let precision = format.precision as usize;
    let rounded = round_half_away(n, format.precision);
    let digits = format!("{:.precision$}", rounded.abs());
    let (integer, fraction) = digits.split_once('.').unwrap_or((&digits, ""));

    let mut out = String::with_capacity(digits.len() + 8);
    if rounded < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(integer, &format.delimiter));

    let fraction = if format.strip_insignificant_zeros {
        fraction.trim_end_matches('0')
    } else {
        fraction
    };
    if !fraction.is_empty() {
        out.push_str(&format.separator);
        out.push_str(fraction);
    }
    out
}

fn group_thousands(integer: &str, delimiter: &str) -> String {
    if delimiter.is_empty() || integer.len() <= 3 {
        return integer.to_string();
    }
    let mut out = String::with_capacity(integer.len() + integer.len() / 3 * delimiter.len());
    let head = integer.len() % 3;
    if head > 0 {
        out.push_str(&integer[..head]);
    }
    for (i, chunk) in integer.as_bytes()[head..].chunks(3).enumerate() {
        if head > 0 || i > 0 {
            out.push_str(delimiter);
        }
        out.push_str(std::str::from_utf8(chunk).unwrap_or_default());
    }
    out
}

/// Formats `n` as a percentage.
pub fn to_percentage(n: f64, format: &NumberFormat) -> String {
    format!("{}%", to_number(n, format))
}

/// Formats a byte count with the largest fitting storage unit.
///
/// # Examples
///
/// ```
/// use polyglot_core::i18n::I18n;
/// use polyglot_core::i18n::number::to_human_size;
/// use polyglot_core::i18n::store::Translations;
///
/// let i18n = I18n::from_translations(Translations::new());
/// assert_eq!(to_human_size(1536.0, &i18n, "en"), "1.5 KB");
/// assert_eq!(to_human_size(123.0, &i18n, "en"), "123 Bytes");
/// ```
pub fn to_human_size(bytes: f64, i18n: &I18n, locale: &str) -> String {
    const KB: f64 = 1024.0;

    let mut size = bytes;
    let mut iterations = 0;
    while size >= KB && iterations < 4 {
        size /= KB;
        iterations += 1;
    }

    let options = TranslateOptions::new().locale(locale);
    let unit_scope = format!("number.human.storage_units.units.{}", STORAGE_UNITS[iterations]);
    let (unit, precision) = if iterations == 0 {
        let unit = i18n
            .try_translate(&unit_scope, &options.clone().count(size))
            .unwrap_or_else(|| {
                let unit = if size == 1.0 { "Byte" } else { DEFAULT_STORAGE_UNITS[0] };
                unit.to_string()
            });
        (unit, 0)
    } else {
        let unit = i18n
            .try_translate(&unit_scope, &options)
            .unwrap_or_else(|| DEFAULT_STORAGE_UNITS[iterations].to_string());
        (unit, u32::from(size.fract() != 0.0))
    };

    let format = NumberFormat::for_locale(i18n, locale)
        .with_precision(precision)
        .with_delimiter("");
    let template = i18n
        .try_translate("number.human.storage_units.format", &options)
        .unwrap_or_else(|| "%n %u".to_string());
    template
        .replace("%u", &unit)
        .replace("%n", &to_number(size, &format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::store::Translations;

    fn i18n() -> I18n {
        let mut store = Translations::new();
        store
            .load_bundle(
                r#"{
                "en": {
                    "number": {
                        "format": { "separator": ".", "delimiter": ",", "precision": 3 },
                        "percentage": { "format": { "precision": 1, "delimiter": "" } },
                        "human": { "storage_units": {
                            "format": "%n %u",
                            "units": {
                                "byte": { "one": "Byte", "other": "Bytes" },
                                "kb": "KB", "mb": "MB", "gb": "GB", "tb": "TB"
                            }
                        } }
                    }
                },
                "bg": {
                    "number": {
                        "format": { "separator": ",", "delimiter": " ", "precision": 2 },
                        "human": { "storage_units": {
                            "format": "%n %u",
                            "units": {
                                "byte": { "one": "байт", "other": "байта" },
                                "kb": "KB", "mb": "MB", "gb": "GB", "tb": "TB"
                            }
                        } }
                    }
                }
            }"#,
            )
            .unwrap();
        I18n::from_translations(store)
    }

    #[test]
    fn test_default_format() {
        let f = NumberFormat::default();
        assert_eq!(to_number(1234.5, &f), "1,234.500");
        assert_eq!(to_number(12.0, &f), "12.000");
        assert_eq!(to_number(999.0, &f), "999.000");
    }

    #[test]
    fn test_grouping() {
        let f = NumberFormat::default().with_precision(0);
        assert_eq!(to_number(1000.0, &f), "1,000");
        assert_eq!(to_number(123_456.0, &f), "123,456");
        assert_eq!(to_number(1_234_567.0, &f), "1,234,567");
        assert_eq!(to_number(-1_234_567.0, &f), "-1,234,567");
    }

    #[test]
    fn test_round_half_away_from_zero() {
        let f = NumberFormat::default().with_precision(0);
        assert_eq!(to_number(2.5, &f), "3");
        assert_eq!(to_number(-2.5, &f), "-3");
        assert_eq!(to_number(0.4, &f), "0");
        assert_eq!(to_number(-0.4, &f), "0");
    }

    #[test]
    fn test_strip_insignificant_zeros() {
        let f = NumberFormat {
            strip_insignificant_zeros: true,
            ..NumberFormat::default()
        };
        assert_eq!(to_number(1.5, &f), "1.5");
        assert_eq!(to_number(2.0, &f), "2");
    }

    #[test]
    fn test_locale_format_bulgarian() {
        let i18n = i18n();
        let f = NumberFormat::for_locale(&i18n, "bg");
        assert_eq!(f.separator, ",");
        assert_eq!(f.delimiter, " ");
        assert_eq!(f.precision, 2);
        assert_eq!(to_number(1234.5, &f), "1 234,50");
    }

    #[test]
    fn test_locale_format_falls_back() {
        let i18n = i18n();
        assert_eq!(NumberFormat::for_locale(&i18n, "de"), NumberFormat::default());
    }

    #[test]
    fn test_percentage() {
        let i18n = i18n();
        let f = NumberFormat::for_scope(&i18n, "en", "number.percentage.format");
        assert_eq!(f.precision, 1);
        assert_eq!(to_percentage(12345.67, &f), "12345.7%");
        assert_eq!(to_percentage(50.0, &NumberFormat::default().with_precision(0)), "50%");
    }

    #[test]
    fn test_human_size() {
        let i18n = i18n();
        assert_eq!(to_human_size(0.0, &i18n, "en"), "0 Bytes");
        assert_eq!(to_human_size(1.0, &i18n, "en"), "1 Byte");
        assert_eq!(to_human_size(123.0, &i18n, "en"), "123 Bytes");
        assert_eq!(to_human_size(1024.0, &i18n, "en"), "1 KB");
        assert_eq!(to_human_size(1536.0, &i18n, "en"), "1.5 KB");
        assert_eq!(to_human_size(1100.0, &i18n, "en"), "1.1 KB");
        assert_eq!(to_human_size(1_048_576.0, &i18n, "en"), "1 MB");
        assert_eq!(to_human_size(3.0 * 1024_f64.powi(3), &i18n, "en"), "3 GB");
    }

    #[test]
    fn test_human_size_caps_at_terabytes() {
        let i18n = i18n();
        assert_eq!(to_human_size(2048.0 * 1024_f64.powi(4), &i18n, "en"), "2048 TB");
    }

    #[test]
    fn test_human_size_localized() {
        let i18n = i18n();
        assert_eq!(to_human_size(5.0, &i18n, "bg"), "5 байта");
        assert_eq!(to_human_size(1536.0, &i18n, "bg"), "1,5 KB");
    }
}
