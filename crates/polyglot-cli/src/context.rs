//! Everything a command needs: settings, a translation runtime and a zone
//! database.

use std::path::PathBuf;

use polyglot_core::bundled;
use polyglot_core::i18n::{store, I18n, I18nConfig};
use polyglot_core::{PolyglotResult, Settings};
use polyglot_tz::tz::TzDatabase;

pub struct CommandContext {
    pub settings: Settings,
    pub i18n: I18n,
    pub tz: TzDatabase,
}

impl CommandContext {
    pub const fn new(settings: Settings, i18n: I18n, tz: TzDatabase) -> Self {
        Self { settings, i18n, tz }
    }

    /// Loads the process-wide data for `settings`.
    ///
    /// The embedded bundles are loaded first, then every directory in
    /// `settings.locale_dirs` followed by `extra_locale_dirs`. A bundle
    /// file replaces the embedded table of each locale it contains.
    pub fn load(settings: Settings, extra_locale_dirs: &[PathBuf]) -> PolyglotResult<Self> {
        let mut locales = bundled::load_bundled_global()?;
        for dir in settings.locale_dirs.iter().chain(extra_locale_dirs) {
            let loaded = store::load_dir(dir)?;
            tracing::info!(dir = %dir.display(), locales = ?loaded, "loaded locale directory");
            locales.extend(loaded);
        }
        locales.sort();
        locales.dedup();
        tracing::debug!(?locales, "translations ready");

        let tz = match &settings.tz_data {
            Some(path) => TzDatabase::from_file(path)?,
            None => TzDatabase::bundled()?,
        };
        let i18n = I18n::new(I18nConfig::from(&settings), store::shared());
        Ok(Self::new(settings, i18n, tz))
    }

    /// A context over a private store holding only the embedded data.
    pub fn bundled(settings: Settings) -> PolyglotResult<Self> {
        let mut i18n = I18n::from_translations(bundled::bundled_translations()?);
        *i18n.config_mut() = I18nConfig::from(&settings);
        Ok(Self::new(settings, i18n, TzDatabase::bundled()?))
    }

    /// The locale a command uses when `--locale` is not given.
    pub fn default_locale(&self) -> &str {
        &self.settings.locale
    }
}
