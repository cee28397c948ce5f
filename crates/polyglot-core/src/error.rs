//! Core error types for polyglot.
//!
//! [`PolyglotError`] covers everything that can fail while loading data:
//! configuration, translation bundles, packed timezone data, date arithmetic
//! and I/O. Translation *lookups* never fail; a missing key or value renders a
//! visible marker instead (see [`crate::i18n`]).

use thiserror::Error;

/// The primary error type for polyglot.
///
/// Each variant maps to a short, stable code via [`PolyglotError::code`].
#[derive(Error, Debug)]
pub enum PolyglotError {
    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Translation data ─────────────────────────────────────────────

    /// A translation bundle could not be parsed.
    #[error("Bundle parse error: {0}")]
    BundleParse(String),

    /// A locale tag was empty or malformed.
    #[error("Invalid locale: {0:?}")]
    InvalidLocale(String),

    // ── Time ─────────────────────────────────────────────────────────

    /// The requested time zone is not present in the database.
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    /// A packed zone, link or country string is malformed.
    #[error("Invalid packed zone data: {0}")]
    InvalidPackedData(String),

    /// Date arithmetic left the representable range.
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    /// A calendar unit name was not recognised.
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PolyglotError {
    /// Returns a short machine-readable code for this error.
    ///
    /// - `ConfigurationError` -> `"config"`
    /// - `BundleParse`, `SerializationError` -> `"data"`
    /// - `InvalidLocale` -> `"locale"`
    /// - `UnknownTimeZone`, `InvalidPackedData` -> `"tz"`
    /// - `DateOutOfRange`, `UnknownUnit` -> `"date"`
    /// - `IoError` -> `"io"`
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ConfigurationError(_) => "config",
            Self::BundleParse(_) | Self::SerializationError(_) => "data",
            Self::InvalidLocale(_) => "locale",
            Self::UnknownTimeZone(_) | Self::InvalidPackedData(_) => "tz",
            Self::DateOutOfRange(_) | Self::UnknownUnit(_) => "date",
            Self::IoError(_) => "io",
        }
    }
}

impl From<serde_json::Error> for PolyglotError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, PolyglotError>`.
pub type PolyglotResult<T> = Result<T, PolyglotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PolyglotError::ConfigurationError("x".into()).code(), "config");
        assert_eq!(PolyglotError::BundleParse("x".into()).code(), "data");
        assert_eq!(PolyglotError::SerializationError("x".into()).code(), "data");
        assert_eq!(PolyglotError::InvalidLocale(String::new()).code(), "locale");
        assert_eq!(PolyglotError::UnknownTimeZone("x".into()).code(), "tz");
        assert_eq!(PolyglotError::InvalidPackedData("x".into()).code(), "tz");
        assert_eq!(PolyglotError::DateOutOfRange("x".into()).code(), "date");
        assert_eq!(PolyglotError::UnknownUnit("x".into()).code(), "date");
    }

    #[test]
    fn test_error_display() {
        let err = PolyglotError::UnknownTimeZone("Mars/Olympus".into());
        assert_eq!(err.to_string(), "Unknown time zone: Mars/Olympus");

        let err = PolyglotError::InvalidLocale(String::new());
        assert_eq!(err.to_string(), "Invalid locale: \"\"");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: PolyglotError = io_err.into();
        assert_eq!(err.code(), "io");
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: PolyglotError = json_err.into();
        assert_eq!(err.code(), "data");
    }
}
