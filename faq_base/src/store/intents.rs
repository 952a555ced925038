//! Intent sets - named groups of example phrases and keywords.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::error::{json_kind, Result, StoreError};

/// A named intent with example phrasings and keywords.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,

    #[serde(default)]
    pub examples: Vec<String>,

    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Intent {
    /// Create an intent with no phrases.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add an example phrasing.
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    /// Add keywords.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }
}

#[derive(Debug, Deserialize)]
struct RawIntent {
    #[serde(default)]
    examples: Vec<String>,
    #[serde(default)]
    keywords: Vec<String>,
}

/// Intents sorted by name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntentSet {
    intents: Vec<Intent>,
}

impl IntentSet {
    /// Create an intent set, sorting intents by name.
    pub fn new(mut intents: Vec<Intent>) -> Self {
        intents.sort_by(|a, b| a.name.cmp(&b.name));
        Self { intents }
    }

    /// Parse an intent set from a JSON object keyed by intent name.
    ///
    /// Intents whose body has the wrong shape are skipped with a warning.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(map) = value else {
            return Err(StoreError::NotAnObject(json_kind(&value)));
        };

        let mut intents = Vec::with_capacity(map.len());
        for (name, body) in map {
            match serde_json::from_value::<RawIntent>(body) {
                Ok(raw) => intents.push(Intent {
                    name,
                    examples: raw.examples,
                    keywords: raw.keywords,
                }),
                Err(e) => {
                    tracing::warn!(intent = %name, error = %e, "Skipping malformed intent");
                }
            }
        }

        Ok(Self::new(intents))
    }

    /// Read and parse an intent file.
    pub fn try_load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Read an intent file, substituting an empty set on failure.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(set) => {
                tracing::info!(intents = set.len(), path = %path.display(), "Intents loaded");
                set
            }
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load intents; continuing with none"
                );
                Self::default()
            }
        }
    }

    /// Iterate over intents in name order.
    pub fn iter(&self) -> std::slice::Iter<'_, Intent> {
        self.intents.iter()
    }

    /// Get the number of intents.
    pub fn len(&self) -> usize {
        self.intents.len()
    }

    /// Check whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intents() {
        let text = r#"{
            "greeting": {"examples": ["привет", "здравствуйте"]},
            "complaint": {"examples": ["хочу пожаловаться"], "keywords": ["жалоба"]}
        }"#;
        let set = IntentSet::from_json_str(text).unwrap();
        assert_eq!(set.len(), 2);

        let names: Vec<_> = set.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["complaint", "greeting"]);
        assert_eq!(set.iter().next().unwrap().keywords, vec!["жалоба"]);
    }

    #[test]
    fn test_skips_malformed_intent() {
        let text = r#"{"ok": {"examples": ["a"]}, "bad": {"examples": "a"}}"#;
        let set = IntentSet::from_json_str(text).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_not_an_object() {
        let err = IntentSet::from_json_str("[]").unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject("array")));
    }

    #[test]
    fn test_load_missing_is_empty() {
        assert!(IntentSet::load(Path::new("/no/such/intents.json")).is_empty());
    }
}
