//! The locale store: current locale, translation lookup and change
//! notification.
//!
//! A store is created once with the default locale. On the client, the first
//! [`LocaleStore::hydrate`] call detects a persisted or preferred locale; until
//! then the client renders exactly what the server rendered. Listeners are
//! called synchronously, in registration order, after every locale change.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;

use super::interpolate::{interpolate, Variables};
use super::probe::{primary_subtag, PreferenceStorage, Runtime, LOCALE_STORAGE_KEY};
use super::table::{TranslationTable, TranslationValue};
use super::I18nError;

/// Immutable store configuration.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    default_locale: String,
    locales: Vec<String>,
    translations: Arc<TranslationTable>,
}

impl LocaleConfig {
    /// Create a configuration. The default locale must be one of `locales`.
    pub fn new(
        default_locale: &str,
        locales: &[&str],
        translations: TranslationTable,
    ) -> Result<Self, I18nError> {
        let mut ordered: Vec<String> = Vec::with_capacity(locales.len());
        for locale in locales {
            if !ordered.iter().any(|l| l == locale) {
                ordered.push(locale.to_string());
            }
        }

        if !ordered.iter().any(|l| l == default_locale) {
            return Err(I18nError::DefaultNotConfigured(default_locale.to_string()));
        }

        Ok(Self {
            default_locale: default_locale.to_string(),
            locales: ordered,
            translations: Arc::new(translations),
        })
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Configured locales in declaration order.
    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    pub fn translations(&self) -> &TranslationTable {
        &self.translations
    }

    /// Check whether `locale` is one of the configured locales.
    pub fn is_supported(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l == locale)
    }

    /// Same table and locales with a different default.
    pub fn with_default(&self, default_locale: &str) -> Result<Self, I18nError> {
        if !self.is_supported(default_locale) {
            return Err(I18nError::DefaultNotConfigured(default_locale.to_string()));
        }
        Ok(Self {
            default_locale: default_locale.to_string(),
            ..self.clone()
        })
    }
}

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

impl Listeners {
    fn add(&mut self, listener: Listener) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    fn remove(&mut self, id: u64) {
        self.entries.retain(|(entry_id, _)| *entry_id != id);
    }

    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }
}

/// Handle returned by [`LocaleStore::subscribe`].
#[must_use = "call unsubscribe() to stop notifications"]
pub struct Subscription {
    listeners: Weak<RefCell<Listeners>>,
    id: u64,
}

impl Subscription {
    /// Remove exactly this registration. A no-op once the store is gone.
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Single source of truth for the active locale.
pub struct LocaleStore {
    config: LocaleConfig,
    runtime: Runtime,
    current_locale: RefCell<String>,
    is_hydrated: Cell<bool>,
    listeners: Rc<RefCell<Listeners>>,
    notifying: Cell<bool>,
    renotify: Cell<bool>,
}

impl LocaleStore {
    /// Create a store on the default locale.
    pub fn new(config: LocaleConfig, runtime: Runtime) -> Self {
        let current_locale = RefCell::new(config.default_locale.clone());
        Self {
            config,
            runtime,
            current_locale,
            is_hydrated: Cell::new(false),
            listeners: Rc::new(RefCell::new(Listeners::default())),
            notifying: Cell::new(false),
            renotify: Cell::new(false),
        }
    }

    pub fn config(&self) -> &LocaleConfig {
        &self.config
    }

    pub fn locales(&self) -> &[String] {
        self.config.locales()
    }

    pub fn default_locale(&self) -> &str {
        self.config.default_locale()
    }

    pub fn is_client(&self) -> bool {
        self.runtime.is_client()
    }

    pub fn is_hydrated(&self) -> bool {
        self.is_hydrated.get()
    }

    /// Reconcile with the client environment. Runs at most once, and never on
    /// the server.
    pub fn hydrate(&self) {
        if self.is_hydrated.get() || !self.is_client() {
            return;
        }

        let detected = self.detect_locale();
        let changed = *self.current_locale.borrow() != detected;
        self.is_hydrated.set(true);

        if changed {
            tracing::debug!(locale = %detected, "Hydrated with detected locale");
            self.current_locale.replace(detected);
            self.notify_listeners();
        }
    }

    /// Persisted choice, then runtime language preference, then default.
    fn detect_locale(&self) -> String {
        let default = self.config.default_locale.clone();

        let Runtime::Client { storage, language } = &self.runtime else {
            return default;
        };

        if let Some(saved) = self.persisted_locale(storage.as_ref()) {
            return saved;
        }

        language
            .preferred_language()
            .and_then(|tag| primary_subtag(&tag))
            .filter(|locale| self.config.is_supported(locale))
            .unwrap_or(default)
    }

    fn persisted_locale(&self, storage: &dyn PreferenceStorage) -> Option<String> {
        match storage.get(LOCALE_STORAGE_KEY) {
            Ok(saved) => saved.filter(|locale| self.config.is_supported(locale)),
            Err(e) => {
                tracing::debug!("Ignoring unreadable locale preference: {}", e);
                None
            }
        }
    }

    /// Switch locale. Returns `false` and changes nothing if `locale` is not
    /// configured.
    pub fn set_locale(&self, locale: &str) -> bool {
        if !self.config.is_supported(locale) {
            tracing::warn!("Invalid locale: {}", locale);
            return false;
        }

        let previous = self.current_locale.replace(locale.to_string());
        tracing::info!("Changing locale from {} to {}", previous, locale);

        if let Runtime::Client { storage, .. } = &self.runtime {
            match storage.set(LOCALE_STORAGE_KEY, locale) {
                Ok(()) => tracing::debug!("Saved locale preference: {}", locale),
                Err(e) => tracing::error!("Failed to save locale preference: {}", e),
            }
        }

        self.notify_listeners();
        true
    }

    pub fn get_locale(&self) -> String {
        self.current_locale.borrow().clone()
    }

    /// Translate `key` in the current locale.
    ///
    /// A missing key yields the key itself as text. Lists and records are
    /// returned as stored.
    pub fn t(&self, key: &str) -> TranslationValue {
        self.resolve(key, None)
    }

    /// Translate `key`, substituting `{{name}}` placeholders in text leaves.
    pub fn t_args(&self, key: &str, variables: &Variables) -> TranslationValue {
        self.resolve(key, Some(variables))
    }

    fn resolve(&self, key: &str, variables: Option<&Variables>) -> TranslationValue {
        let locale = self.current_locale.borrow();

        match self.config.translations.lookup(&locale, key) {
            // An empty string counts as untranslated.
            Some(TranslationValue::Text(text)) if !text.is_empty() => {
                TranslationValue::Text(interpolate(text, variables))
            }
            Some(value @ (TranslationValue::List(_) | TranslationValue::Map(_))) => value.clone(),
            _ => {
                tracing::warn!("Translation missing for key: {} in locale: {}", key, locale);
                TranslationValue::Text(key.to_string())
            }
        }
    }

    /// Translate a key expected to be text.
    ///
    /// Falls back to the key when the value is a list or record.
    pub fn text(&self, key: &str) -> String {
        self.text_args(key, &Variables::new())
    }

    pub fn text_args(&self, key: &str, variables: &Variables) -> String {
        match self.resolve(key, Some(variables)) {
            TranslationValue::Text(text) => text,
            _ => {
                tracing::warn!("Translation for key {} is not text", key);
                key.to_string()
            }
        }
    }

    /// Items of a list value; empty when the key is missing or not a list.
    pub fn list(&self, key: &str) -> Vec<TranslationValue> {
        match self.t(key) {
            TranslationValue::List(items) => items,
            _ => Vec::new(),
        }
    }

    /// Register a change listener.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        let id = self.listeners.borrow_mut().add(Rc::new(callback));
        Subscription {
            listeners: Rc::downgrade(&self.listeners),
            id,
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    /// Call every listener in registration order.
    ///
    /// A locale change made from inside a listener does not nest: it queues
    /// one more pass that runs after the current one finishes.
    fn notify_listeners(&self) {
        if self.notifying.get() {
            self.renotify.set(true);
            return;
        }

        self.notifying.set(true);
        loop {
            self.renotify.set(false);

            let snapshot: Vec<(u64, Listener)> = self
                .listeners
                .borrow()
                .entries
                .iter()
                .map(|(id, listener)| (*id, Rc::clone(listener)))
                .collect();

            tracing::debug!("Notifying {} listeners", snapshot.len());

            for (id, listener) in snapshot {
                // Skip listeners removed earlier in this pass.
                if self.listeners.borrow().contains(id) {
                    listener();
                }
            }

            if !self.renotify.get() {
                break;
            }
        }
        self.notifying.set(false);
    }
}

impl std::fmt::Debug for LocaleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleStore")
            .field("current_locale", &self.current_locale.borrow())
            .field("runtime", &self.runtime)
            .field("is_hydrated", &self.is_hydrated.get())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
