//! Built-in translations for the landing page.

use super::store::LocaleConfig;
use super::table::TranslationTable;
use super::I18nError;

/// Locale the page is rendered in before hydration.
pub const DEFAULT_LOCALE: &str = "pt";

/// Locales offered by the language selector, in display order.
pub const SITE_LOCALES: [&str; 3] = ["pt", "en", "es"];

/// Language selector label for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleLabel {
    pub code: &'static str,
    pub short: &'static str,
    pub full_name: &'static str,
}

const LABELS: [LocaleLabel; 3] = [
    LocaleLabel {
        code: "pt",
        short: "PT",
        full_name: "Portuguese",
    },
    LocaleLabel {
        code: "en",
        short: "EN",
        full_name: "English",
    },
    LocaleLabel {
        code: "es",
        short: "ES",
        full_name: "Spanish",
    },
];

/// Selector label for `code`.
pub fn locale_label(code: &str) -> Option<&'static LocaleLabel> {
    LABELS.iter().find(|label| label.code == code)
}

fn embedded(locale: &str) -> &'static str {
    match locale {
        "en" => include_str!("locales/en.json"),
        "es" => include_str!("locales/es.json"),
        _ => include_str!("locales/pt.json"),
    }
}

/// Parse the embedded translation tables.
pub fn site_translations() -> Result<TranslationTable, I18nError> {
    let mut table = TranslationTable::new();
    for locale in SITE_LOCALES {
        table.insert_json(locale, embedded(locale))?;
    }
    Ok(table)
}

/// Store configuration for the site, defaulting to Portuguese.
pub fn site_config() -> Result<LocaleConfig, I18nError> {
    LocaleConfig::new(DEFAULT_LOCALE, &SITE_LOCALES, site_translations()?)
}
