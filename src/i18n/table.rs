//! Translation values and dot-path lookup.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use super::I18nError;

/// A node in a translation tree.
///
/// Leaves are plain strings. Lists hold either strings (e.g. a benefit list)
/// or maps (structured records such as FAQ entries).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TranslationValue {
    Text(String),
    List(Vec<TranslationValue>),
    Map(BTreeMap<String, TranslationValue>),
}

impl TranslationValue {
    /// Get the string content of a text leaf.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TranslationValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Get the items of a list node.
    pub fn as_list(&self) -> Option<&[TranslationValue]> {
        match self {
            TranslationValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get the entries of a map node.
    pub fn as_map(&self) -> Option<&BTreeMap<String, TranslationValue>> {
        match self {
            TranslationValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Text of a named field on a record, e.g. `question` on a FAQ entry.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.as_map()?.get(name)?.as_text()
    }

    /// Descend one path segment.
    ///
    /// Maps are indexed by key and lists by a decimal position, so
    /// `faq.questions.0.answer` resolves into the first record.
    pub fn child(&self, segment: &str) -> Option<&TranslationValue> {
        match self {
            TranslationValue::Map(entries) => entries.get(segment),
            TranslationValue::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            TranslationValue::Text(_) => None,
        }
    }

    /// Resolve a dot-delimited path. Stops at the first missing segment.
    pub fn lookup(&self, path: &str) -> Option<&TranslationValue> {
        path.split('.')
            .try_fold(self, |current, segment| current.child(segment))
    }

    /// Dot paths of every text and list leaf under this node.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_paths(String::new(), &mut paths);
        paths
    }

    fn collect_paths(&self, prefix: String, out: &mut Vec<String>) {
        match self {
            TranslationValue::Map(entries) => {
                for (key, value) in entries {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    value.collect_paths(path, out);
                }
            }
            _ => out.push(prefix),
        }
    }
}

impl From<&str> for TranslationValue {
    fn from(text: &str) -> Self {
        TranslationValue::Text(text.to_string())
    }
}

impl From<String> for TranslationValue {
    fn from(text: String) -> Self {
        TranslationValue::Text(text)
    }
}

/// Translations per locale (locale -> root map).
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    locales: HashMap<String, TranslationValue>,
}

impl TranslationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a locale root.
    pub fn with_locale(mut self, locale: &str, root: TranslationValue) -> Self {
        self.locales.insert(locale.to_string(), root);
        self
    }

    /// Insert the root node for a locale, replacing any previous one.
    pub fn insert(&mut self, locale: &str, root: TranslationValue) {
        self.locales.insert(locale.to_string(), root);
    }

    /// Parse a JSON document as the root of `locale`.
    pub fn insert_json(&mut self, locale: &str, json: &str) -> Result<(), I18nError> {
        let root: TranslationValue =
            serde_json::from_str(json).map_err(|e| I18nError::ParseError {
                locale: locale.to_string(),
                message: e.to_string(),
            })?;

        if root.as_map().is_none() {
            return Err(I18nError::ParseError {
                locale: locale.to_string(),
                message: "root must be an object".to_string(),
            });
        }

        self.insert(locale, root);
        Ok(())
    }

    /// Root node for a locale.
    pub fn root(&self, locale: &str) -> Option<&TranslationValue> {
        self.locales.get(locale)
    }

    /// Check whether a locale has any translations.
    pub fn contains_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    /// Resolve `key` in `locale`.
    pub fn lookup(&self, locale: &str, key: &str) -> Option<&TranslationValue> {
        self.root(locale)?.lookup(key)
    }

    /// Leaf paths present in `reference` but absent from `locale`.
    pub fn missing_paths(&self, reference: &str, locale: &str) -> Vec<String> {
        let Some(reference_root) = self.root(reference) else {
            return Vec::new();
        };

        reference_root
            .leaf_paths()
            .into_iter()
            .filter(|path| self.lookup(locale, path).is_none())
            .collect()
    }
}
