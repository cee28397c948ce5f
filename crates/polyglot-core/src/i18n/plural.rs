//! CLDR plural rules.
//!
//! Each [`PluralRule`] maps a count to a [`PluralCategory`]. The built-in
//! rules cover the common language families; anything unknown uses the
//! English `one`/`other` rule.
//!
//! Counts are `f64` so that fractional values (`1.5 hours`) categorize the
//! way CLDR expects: most integer-only rules send fractions to `other`.

use std::fmt;
use std::str::FromStr;

use crate::error::PolyglotError;

/// CLDR plural categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    /// All categories in CLDR order.
    pub const ALL: [Self; 6] = [
        Self::Zero,
        Self::One,
        Self::Two,
        Self::Few,
        Self::Many,
        Self::Other,
    ];

    /// The key used for this category inside a plural-form mapping.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }

    /// Returns `true` if `key` names a plural category.
    pub fn is_category_key(key: &str) -> bool {
        Self::ALL.iter().any(|c| c.as_str() == key)
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluralCategory {
    type Err = PolyglotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| PolyglotError::BundleParse(format!("unknown plural category {s:?}")))
    }
}

/// A plural rule for one language family.
#[derive(Clone)]
pub enum PluralRule {
    /// `one` for exactly 1, `other` otherwise (en, bg, de, es, it, ...).
    OneOther,
    /// `one` when the integer part is 0 or 1 (fr, hi, pt-BR).
    ZeroOne,
    /// ru, uk, be: `one`/`few`/`many` by the last two digits.
    EastSlavic,
    /// bs, hr, sr: `one`/`few` by the last two digits of the integer part
    /// or of the visible fraction digits, else `other`.
    SerboCroatian,
    /// Polish: like East Slavic, but only exactly 1 is `one`.
    Polish,
    /// Czech and Slovak: 1 `one`, 2-4 `few`, fractions `many`.
    CzechSlovak,
    /// Slovenian: by `n % 100` into `one`/`two`/`few`.
    Slovenian,
    /// Lithuanian: `one`/`few` by last digit, fractions `many`.
    Lithuanian,
    /// Arabic: all six categories.
    Arabic,
    /// No plural distinction (zh, ja, ko, vi, th, id, ...).
    Other,
    /// Caller-supplied rule.
    Custom(fn(f64) -> PluralCategory),
}

impl PluralRule {
    /// Determine the plural category for the given count.
    ///
    /// Negative counts categorize by their absolute value.
    pub fn categorize(&self, count: f64) -> PluralCategory {
        if let Self::Custom(f) = self {
            return f(count);
        }
        let n = count.abs();
        if !n.is_finite() {
            return PluralCategory::Other;
        }
        let fractional = n.fract() != 0.0;
        // Saturating float-to-int cast; CLDR rules only inspect the low digits.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let i = n.trunc() as u64;

        match self {
            Self::OneOther => one_other(n),
            Self::ZeroOne => zero_one(i),
            Self::EastSlavic => east_slavic(i, fractional),
            Self::SerboCroatian => serbo_croatian(i, fraction_digits(n)),
            Self::Polish => polish(i, fractional),
            Self::CzechSlovak => czech_slovak(i, fractional),
            Self::Slovenian => slovenian(i, fractional),
            Self::Lithuanian => lithuanian(i, fractional),
            Self::Arabic => arabic(i, fractional),
            Self::Other | Self::Custom(_) => PluralCategory::Other,
        }
    }

    /// Select the rule for a locale tag (`"bg"`, `"bg-BG"`, `"pt_BR"`).
    pub fn for_locale(tag: &str) -> Self {
        let lower = tag.to_ascii_lowercase().replace('_', "-");
        if lower == "pt-br" {
            return Self::ZeroOne;
        }
        let primary = lower.split('-').next().unwrap_or_default();

        match primary {
            "fr" | "hi" | "bn" | "fa" | "am" | "zu" => Self::ZeroOne,
            "ru" | "uk" | "be" => Self::EastSlavic,
            "sr" | "hr" | "bs" | "sh" => Self::SerboCroatian,
            "pl" => Self::Polish,
            "cs" | "sk" => Self::CzechSlovak,
            "sl" => Self::Slovenian,
            "lt" => Self::Lithuanian,
            "ar" => Self::Arabic,
            "zh" | "ja" | "ko" | "vi" | "th" | "id" | "ms" | "lo" | "my" => Self::Other,
            _ => Self::OneOther,
        }
    }
}

impl PluralRule {
    /// The categories this rule can produce, in CLDR order.
    ///
    /// Computed by sampling integer and fractional counts, so custom rules
    /// are covered too.
    pub fn categories(&self) -> Vec<PluralCategory> {
        let samples = (0..=200_u32).map(f64::from).chain([0.5, 1.5, 2.5]);
        let mut seen: Vec<PluralCategory> = samples.map(|n| self.categorize(n)).collect();
        seen.sort_unstable();
        seen.dedup();
        seen
    }
}

impl fmt::Debug for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OneOther => "OneOther",
            Self::ZeroOne => "ZeroOne",
            Self::EastSlavic => "EastSlavic",
            Self::SerboCroatian => "SerboCroatian",
            Self::Polish => "Polish",
            Self::CzechSlovak => "CzechSlovak",
            Self::Slovenian => "Slovenian",
            Self::Lithuanian => "Lithuanian",
            Self::Arabic => "Arabic",
            Self::Other => "Other",
            Self::Custom(_) => "Custom(..)",
        };
        write!(f, "PluralRule::{name}")
    }
}

/// Picks the category to use from a plural-form mapping.
///
/// A count of exactly zero prefers an explicit `zero` form even in languages
/// whose rule never yields [`PluralCategory::Zero`]. Otherwise the rule's
/// category is used, then `other`. `has` reports which forms exist.
pub fn resolve_category(
    count: f64,
    rule: &PluralRule,
    has: impl Fn(PluralCategory) -> bool,
) -> Option<PluralCategory> {
    if count == 0.0 && has(PluralCategory::Zero) {
        return Some(PluralCategory::Zero);
    }
    let category = rule.categorize(count);
    if has(category) {
        return Some(category);
    }
    has(PluralCategory::Other).then_some(PluralCategory::Other)
}

// ── Rule implementations ────────────────────────────────────────────

fn one_other(n: f64) -> PluralCategory {
    if n == 1.0 {
        PluralCategory::One
    } else {
        PluralCategory::Other
    }
}

const fn zero_one(i: u64) -> PluralCategory {
    if i <= 1 {
        PluralCategory::One
    } else {
        PluralCategory::Other
    }
}

fn east_slavic(i: u64, fractional: bool) -> PluralCategory {
    if fractional {
        return PluralCategory::Other;
    }
    let mod10 = i % 10;
    let mod100 = i % 100;

    if mod10 == 1 && mod100 != 11 {
        PluralCategory::One
    } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
        PluralCategory::Few
    } else {
        PluralCategory::Many
    }
}

/// The visible fraction digits of `n` as an integer (`1.25` -> 25), from its
/// shortest decimal form.
fn fraction_digits(n: f64) -> Option<u64> {
    let text = n.to_string();
    let (_, digits) = text.split_once('.')?;
    digits.get(..digits.len().min(9))?.parse().ok()
}

fn serbo_croatian(i: u64, fraction: Option<u64>) -> PluralCategory {
    let by_last_digits = |v: u64| {
        let mod10 = v % 10;
        let mod100 = v % 100;
        if mod10 == 1 && mod100 != 11 {
            Some(PluralCategory::One)
        } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
            Some(PluralCategory::Few)
        } else {
            None
        }
    };
    by_last_digits(fraction.unwrap_or(i)).unwrap_or(PluralCategory::Other)
}

fn polish(i: u64, fractional: bool) -> PluralCategory {
    if fractional {
        return PluralCategory::Other;
    }
    let mod10 = i % 10;
    let mod100 = i % 100;

    if i == 1 {
        PluralCategory::One
    } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
        PluralCategory::Few
    } else {
        PluralCategory::Many
    }
}

const fn czech_slovak(i: u64, fractional: bool) -> PluralCategory {
    if fractional {
        PluralCategory::Many
    } else if i == 1 {
        PluralCategory::One
    } else if i >= 2 && i <= 4 {
        PluralCategory::Few
    } else {
        PluralCategory::Other
    }
}

const fn slovenian(i: u64, fractional: bool) -> PluralCategory {
    if fractional {
        return PluralCategory::Few;
    }
    match i % 100 {
        1 => PluralCategory::One,
        2 => PluralCategory::Two,
        3 | 4 => PluralCategory::Few,
        _ => PluralCategory::Other,
    }
}

fn lithuanian(i: u64, fractional: bool) -> PluralCategory {
    if fractional {
        return PluralCategory::Many;
    }
    let mod10 = i % 10;
    let teen = (11..=19).contains(&(i % 100));

    if mod10 == 1 && !teen {
        PluralCategory::One
    } else if mod10 >= 2 && !teen {
        PluralCategory::Few
    } else {
        PluralCategory::Other
    }
}

fn arabic(i: u64, fractional: bool) -> PluralCategory {
    if fractional {
        return PluralCategory::Other;
    }
    let mod100 = i % 100;
    match i {
        0 => PluralCategory::Zero,
        1 => PluralCategory::One,
        2 => PluralCategory::Two,
        _ if (3..=10).contains(&mod100) => PluralCategory::Few,
        _ if (11..=99).contains(&mod100) => PluralCategory::Many,
        _ => PluralCategory::Other,
    }
}
