use polyglot_core::i18n::{activate, deactivate, get_language};
use polyglot_core::{Settings, SETTINGS};

#[test]
fn test_inactive_thread_uses_configured_locale() {
    SETTINGS.configure(Settings {
        locale: "bg".to_string(),
        default_locale: "en".to_string(),
        ..Settings::default()
    });

    deactivate();
    assert_eq!(get_language(), "bg");

    activate("de");
    assert_eq!(get_language(), "de");
    deactivate();
    assert_eq!(get_language(), "bg");
}
