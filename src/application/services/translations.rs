//! Process-wide translation store

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Dotted key to language to translated value.
///
/// Values are stored as loaded; non-string scalars are stringified on read.
pub struct TranslationManager {
    default_language: String,
    entries: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl TranslationManager {
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            default_language: default_language.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn set(&self, key: impl Into<String>, language: impl Into<String>, value: Value) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(key.into())
            .or_default()
            .insert(language.into(), value);
    }

    /// Raw value for exactly this language
    pub fn get_raw(&self, key: &str, language: &str) -> Option<Value> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key)?.get(language).cloned()
    }

    /// Translated text, falling back to the default language
    pub fn get(&self, key: &str, language: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let by_language = entries.get(key)?;
        by_language
            .get(language)
            .or_else(|| by_language.get(&self.default_language))
            .map(stringify)
    }

    /// Translate and substitute `{name}` placeholders. Missing keys render as the key itself.
    pub fn render(&self, key: &str, language: &str, params: &[(&str, &str)]) -> String {
        let mut text = self.get(key, language).unwrap_or_else(|| key.to_string());
        for (name, value) in params {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }

    pub fn contains(&self, key: &str, language: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).map(|l| l.contains_key(language)).unwrap_or(false)
    }

    /// All known languages, sorted
    pub fn languages(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut languages: Vec<String> = entries
            .values()
            .flat_map(|l| l.keys().cloned())
            .collect();
        languages.sort();
        languages.dedup();
        languages
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
