//! Locale bundles compiled into the binary.

use crate::error::PolyglotResult;
use crate::i18n::store::{self, Translations};

/// `(file name, contents)` of every embedded bundle.
pub const BUNDLES: &[(&str, &str)] = &[
    ("en.json", include_str!("../locales/en.json")),
    ("bg.json", include_str!("../locales/bg.json")),
];

/// Loads the embedded bundles into `translations`.
///
/// Returns the loaded locale codes, sorted.
pub fn load_bundled(translations: &mut Translations) -> PolyglotResult<Vec<String>> {
    let mut loaded = Vec::new();
    for (name, json) in BUNDLES {
        tracing::trace!(bundle = name, "loading embedded bundle");
        loaded.extend(translations.load_bundle(json)?);
    }
    loaded.sort();
    loaded.dedup();
    Ok(loaded)
}

/// Loads the embedded bundles into the process-wide store.
pub fn load_bundled_global() -> PolyglotResult<Vec<String>> {
    let shared = store::shared();
    let mut guard = shared.write().expect("translation store lock poisoned");
    load_bundled(&mut guard)
}

/// A fresh store holding only the embedded bundles.
pub fn bundled_translations() -> PolyglotResult<Translations> {
    let mut translations = Translations::new();
    load_bundled(&mut translations)?;
    Ok(translations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_locales() {
        let translations = bundled_translations().unwrap();
        assert_eq!(translations.locales(), vec!["bg", "en"]);
    }

    #[test]
    fn test_bundled_names_are_lists() {
        let translations = bundled_translations().unwrap();
        for locale in ["en", "bg"] {
            let Some(crate::i18n::Node::List(days)) = translations.lookup(locale, "date.day_names")
            else {
                panic!("{locale} has no day names");
            };
            assert_eq!(days.len(), 7);
            let Some(crate::i18n::Node::List(months)) =
                translations.lookup(locale, "date.month_names")
            else {
                panic!("{locale} has no month names");
            };
            assert_eq!(months.len(), 13);
        }
    }

    #[test]
    fn test_bulgarian_is_subset_of_english() {
        let translations = bundled_translations().unwrap();
        let en = translations.flatten("en");
        for key in translations.flatten("bg").keys() {
            assert!(en.contains_key(key), "bg key {key} missing from en");
        }
    }
}
