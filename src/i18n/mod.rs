//! Internationalization module for the landing page.
//!
//! Provides a [`LocaleStore`] holding the active locale and the translation
//! tables, with dot-path lookup (`hero.cta`), `{{name}}` interpolation and
//! synchronous change notification for UI components.

pub mod binding;
pub mod catalog;
pub mod interpolate;
pub mod probe;
pub mod store;
pub mod table;

// Re-export types
pub use binding::LocaleBinding;
pub use catalog::{site_config, site_translations, DEFAULT_LOCALE, SITE_LOCALES};
pub use interpolate::{interpolate, Variables};
pub use probe::{
    preferred_from_header, FixedLanguage, LanguageProbe, MemoryStorage, PreferenceStorage,
    Runtime, StorageError, LOCALE_STORAGE_KEY,
};
pub use store::{LocaleConfig, LocaleStore, Subscription};
pub use table::{TranslationTable, TranslationValue};

/// Errors building translation tables or store configuration.
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    #[error("Invalid translations for locale '{locale}': {message}")]
    ParseError { locale: String, message: String },

    #[error("Default locale '{0}' is not a configured locale")]
    DefaultNotConfigured(String),
}

/// Macro for convenient translation through a store.
///
/// ```
/// use livro_landing::i18n::{site_config, LocaleStore, Runtime};
/// use livro_landing::t;
///
/// let store = LocaleStore::new(site_config().unwrap(), Runtime::Server);
/// assert_eq!(t!(store, "hero.cta"), "Quero meu exemplar");
/// assert_eq!(t!(store, "missing.key", "name" => "x"), "missing.key");
/// ```
#[macro_export]
macro_rules! t {
    ($store:expr, $key:expr) => {
        $store.text($key)
    };
    ($store:expr, $key:expr, $($arg_name:expr => $arg_value:expr),+ $(,)?) => {
        $store.text_args(
            $key,
            &$crate::i18n::Variables::new()$(.with($arg_name, $arg_value))+,
        )
    };
}
