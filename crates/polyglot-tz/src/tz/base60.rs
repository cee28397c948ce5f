//! Base-60 numbers as used by packed zone strings.
//!
//! Digits are `0-9`, then `a-z` (10..=35), then `A-X` (36..=59). A leading
//! `-` negates the value and a `.` starts a base-60 fraction.

use polyglot_core::{PolyglotError, PolyglotResult};

const DIGITS: &[u8; 60] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWX";
const EPSILON: f64 = 0.000_001;

fn digit_value(c: char) -> PolyglotResult<f64> {
    let value = match c {
        '0'..='9' => u32::from(c) - u32::from('0'),
        'a'..='z' => u32::from(c) - u32::from('a') + 10,
        'A'..='X' => u32::from(c) - u32::from('A') + 36,
        _ => {
            return Err(PolyglotError::InvalidPackedData(format!(
                "invalid base-60 digit {c:?}"
            )))
        }
    };
    Ok(f64::from(value))
}

/// Decodes a base-60 string. The empty string is `0`.
///
/// # Examples
///
/// ```
/// use polyglot_tz::tz::base60::unpack_base60;
///
/// assert_eq!(unpack_base60("-20").unwrap(), -120.0);
/// assert_eq!(unpack_base60("1.u").unwrap(), 1.5);
/// assert_eq!(unpack_base60("").unwrap(), 0.0);
/// ```
pub fn unpack_base60(s: &str) -> PolyglotResult<f64> {
    let (sign, body) = s.strip_prefix('-').map_or((1.0, s), |rest| (-1.0, rest));
    let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));

    let mut out = 0.0;
    for c in whole.chars() {
        out = out * 60.0 + digit_value(c)?;
    }
    let mut multiplier = 1.0;
    for c in fraction.chars() {
        multiplier /= 60.0;
        out += digit_value(c)? * multiplier;
    }
    Ok(out * sign)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn pack_fraction(mut fraction: f64, precision: u32) -> String {
    let mut buffer = String::from(".");
    let mut output = String::new();
    for _ in 0..precision.min(10) {
        fraction *= 60.0;
        let current = ((fraction + EPSILON).floor() as usize).min(59);
        buffer.push(char::from(DIGITS[current]));
        fraction -= current as f64;
        if current != 0 {
            output.push_str(&buffer);
            buffer.clear();
        }
    }
    output
}

/// Encodes a number in base 60 with up to `precision` fractional digits.
///
/// # Examples
///
/// ```
/// use polyglot_tz::tz::base60::pack_base60;
///
/// assert_eq!(pack_base60(-120.0, 1), "-20");
/// assert_eq!(pack_base60(1.5, 1), "1.u");
/// assert_eq!(pack_base60(0.0, 1), "0");
/// ```
pub fn pack_base60(number: f64, precision: u32) -> String {
    let absolute = number.abs();
    let mut whole = absolute.floor();
    let fraction = pack_fraction(absolute - whole, precision);

    let mut digits = Vec::new();
    while whole > 0.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let d = (whole % 60.0) as usize;
        digits.push(DIGITS[d]);
        whole = (whole / 60.0).floor();
    }
    let mut output: String = digits.iter().rev().map(|&b| char::from(b)).collect();
    if number < 0.0 {
        output.insert(0, '-');
    }

    if !output.is_empty() && !fraction.is_empty() {
        return output + &fraction;
    }
    if fraction.is_empty() && output == "-" {
        return "0".to_string();
    }
    if !output.is_empty() {
        output
    } else if !fraction.is_empty() {
        fraction
    } else {
        "0".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_digits() {
        assert_eq!(unpack_base60("0").unwrap(), 0.0);
        assert_eq!(unpack_base60("9").unwrap(), 9.0);
        assert_eq!(unpack_base60("a").unwrap(), 10.0);
        assert_eq!(unpack_base60("z").unwrap(), 35.0);
        assert_eq!(unpack_base60("A").unwrap(), 36.0);
        assert_eq!(unpack_base60("X").unwrap(), 59.0);
        assert_eq!(unpack_base60("10").unwrap(), 60.0);
    }

    #[test]
    fn test_unpack_until_delta() {
        // 2024-03-31T01:00Z in minutes since the epoch.
        assert_eq!(unpack_base60("2c5d0").unwrap(), 28_530_780.0);
        assert_eq!(unpack_base60("1o00").unwrap(), 302_400.0);
    }

    #[test]
    fn test_unpack_negative_and_fraction() {
        assert_eq!(unpack_base60("-30").unwrap(), -180.0);
        assert_eq!(unpack_base60(".u").unwrap(), 0.5);
        assert!((unpack_base60("-1U.U").unwrap() - -(116.0 + 56.0 / 60.0)).abs() < 1e-9);
    }

    #[test]
    fn test_unpack_rejects_bad_digit() {
        let err = unpack_base60("1Y").unwrap_err();
        assert_eq!(err.code(), "tz");
        assert!(unpack_base60("1 2").is_err());
    }

    #[test]
    fn test_pack_values() {
        assert_eq!(pack_base60(28_530_780.0, 1), "2c5d0");
        assert_eq!(pack_base60(300.0, 1), "50");
        assert_eq!(pack_base60(0.5, 1), ".u");
        assert_eq!(pack_base60(-0.5, 1), "-.u");
        assert_eq!(pack_base60(2.0, 0), "2");
        assert_eq!(pack_base60(-0.0, 0), "0");
    }

    #[test]
    fn test_pack_then_unpack() {
        for n in [0.0, 1.0, 59.0, 60.0, 3599.0, -120.0, 96.5, 216_000.0] {
            assert_eq!(unpack_base60(&pack_base60(n, 1)).unwrap(), n);
        }
    }
}
