//! Environment probes used for locale detection.
//!
//! Storage and language lookups report absence and failure explicitly so the
//! detection chain can decide what to fall through to.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use unic_langid::LanguageIdentifier;

/// Key under which the chosen locale is persisted.
pub const LOCALE_STORAGE_KEY: &str = "locale";

/// Errors raised by a preference store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A scoped key-value store for user preferences.
pub trait PreferenceStorage {
    /// Read a value. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory preference store.
///
/// Clones share the same entries, which lets a test hand one clone to a store
/// and keep another to inspect or to build a second store ("page reload").
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        storage
    }
}

impl PreferenceStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Source of the runtime's reported language preference.
pub trait LanguageProbe {
    /// Language tag such as `en-US`, if one can be determined.
    fn preferred_language(&self) -> Option<String>;
}

/// Language probe that always reports the same tag.
#[derive(Debug, Default, Clone)]
pub struct FixedLanguage(pub Option<String>);

impl FixedLanguage {
    pub fn new(tag: &str) -> Self {
        Self(Some(tag.to_string()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl LanguageProbe for FixedLanguage {
    fn preferred_language(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Most preferred language in an `Accept-Language` header value.
///
/// Entries are ranked by `q` weight, earlier entries winning ties. Wildcards
/// and entries with `q=0` are skipped.
pub fn preferred_from_header(header: &str) -> Option<String> {
    let mut best: Option<(&str, f32)> = None;

    for entry in header.split(',') {
        let mut parts = entry.split(';');
        let tag = parts.next().unwrap_or_default().trim();
        if tag.is_empty() || tag == "*" {
            continue;
        }

        let weight = parts
            .filter_map(|param| param.trim().strip_prefix("q="))
            .find_map(|q| q.trim().parse::<f32>().ok())
            .unwrap_or(1.0);
        if weight <= 0.0 {
            continue;
        }

        if best.map_or(true, |(_, current)| weight > current) {
            best = Some((tag, weight));
        }
    }

    best.map(|(tag, _)| tag.to_string())
}

/// Extract the primary language subtag, e.g. `en` from `en-US`.
pub fn primary_subtag(tag: &str) -> Option<String> {
    let tag = tag.trim();

    if let Ok(langid) = tag.parse::<LanguageIdentifier>() {
        let language = langid.language.as_str();
        if language != "und" {
            return Some(language.to_string());
        }
    }

    tag.split(|c: char| c == '-' || c == '_')
        .next()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Where the store runs.
///
/// Only a client runtime has persistent storage and a language preference; a
/// server runtime always stays on the default locale. Page requests run a
/// client runtime over the visitor's cookie and `Accept-Language` header.
pub enum Runtime {
    Server,
    Client {
        storage: Box<dyn PreferenceStorage>,
        language: Box<dyn LanguageProbe>,
    },
}

impl Runtime {
    /// Client runtime with the given probes.
    pub fn client(
        storage: impl PreferenceStorage + 'static,
        language: impl LanguageProbe + 'static,
    ) -> Self {
        Runtime::Client {
            storage: Box::new(storage),
            language: Box::new(language),
        }
    }

    pub fn is_client(&self) -> bool {
        matches!(self, Runtime::Client { .. })
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Runtime::Server => write!(f, "Server"),
            Runtime::Client { .. } => write!(f, "Client"),
        }
    }
}
