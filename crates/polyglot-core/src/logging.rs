//! Logging integration for polyglot.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-lookup spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The log level is read from `settings.log_level` (e.g. "debug", "info", "warn",
/// "error"). In debug mode a pretty, human-readable format is used; otherwise
/// a structured JSON format is used. Calling this more than once is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for a translation lookup.
///
/// [`I18n::translate`](crate::i18n::I18n::translate) enters it, so its
/// fallback and miss events carry `locale` and `scope`.
///
/// # Examples
///
/// ```
/// use polyglot_core::logging::lookup_span;
///
/// let span = lookup_span("bg", "js.topic.title");
/// let _guard = span.enter();
/// tracing::debug!("resolving");
/// ```
pub fn lookup_span(locale: &str, scope: &str) -> tracing::Span {
    tracing::debug_span!("lookup", locale = locale, scope = scope)
}
