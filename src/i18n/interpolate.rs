//! `{{name}}` placeholder substitution.

use std::collections::HashMap;

/// Named values substituted into translated text.
///
/// Values are stored already stringified, so strings and numbers can be mixed:
///
/// ```
/// use livro_landing::i18n::Variables;
///
/// let vars = Variables::new().with("name", "World").with("count", 3);
/// assert_eq!(vars.get("count"), Some("3"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: HashMap<String, String>,
}

impl Variables {
    /// Create an empty set of variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.values.insert(name.into(), value.to_string());
        self
    }

    /// Get a variable's value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for Variables {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs
            .into_iter()
            .fold(Variables::new(), |vars, (name, value)| vars.with(name, value))
    }
}

/// Replace every `{{name}}` in `text` with the matching variable.
///
/// Names are ASCII word characters. Placeholders without a matching variable,
/// or whose value is empty, are left as written. `None` returns the text
/// unchanged.
pub fn interpolate(text: &str, variables: Option<&Variables>) -> String {
    let Some(variables) = variables else {
        return text.to_string();
    };

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let name_len = after.bytes().take_while(|b| is_word_byte(*b)).count();

        if name_len > 0 && after[name_len..].starts_with("}}") {
            out.push_str(&rest[..start]);
            // Empty values leave the placeholder in place.
            match variables.get(&after[..name_len]) {
                Some(value) if !value.is_empty() => out.push_str(value),
                _ => out.push_str(&rest[start..start + name_len + 4]),
            }
            rest = &after[name_len + 2..];
        } else {
            // Not a placeholder here; retry from the next brace.
            out.push_str(&rest[..start + 1]);
            rest = &rest[start + 1..];
        }
    }

    out.push_str(rest);
    out
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
