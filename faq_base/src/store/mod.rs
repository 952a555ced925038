//! Knowledge base store - load-once, read-only collections of entries.

mod intents;
mod record;

pub use intents::*;

use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::entries::{EntryId, EntryKind, KnowledgeEntry};
use crate::error::{json_kind, Result, StoreError};
use record::RawEntry;

/// An ordered, immutable collection of entries.
///
/// Built once from a static resource and never mutated; a reload builds a
/// new base and replaces the old one wholesale. The general FAQ set and the
/// exam-card set are two independent instances of this type.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KnowledgeBase {
    /// Display name used in logs.
    name: String,

    /// Entries in source order.
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Create a knowledge base from entries already in memory.
    pub fn new(name: impl Into<String>, entries: Vec<KnowledgeEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Create an empty knowledge base.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Parse a knowledge base from JSON text.
    ///
    /// The top level must be an array. Elements that are not objects are
    /// skipped with a warning. A field of the wrong type is dropped from its
    /// record, which still loads.
    pub fn from_json_str(name: impl Into<String>, text: &str) -> Result<Self> {
        let name = name.into();
        let value: Value = serde_json::from_str(text)?;
        let Value::Array(items) = value else {
            return Err(StoreError::NotAList(json_kind(&value)));
        };

        let total = items.len();
        let mut entries = Vec::with_capacity(total);

        for (position, item) in items.into_iter().enumerate() {
            if !item.is_object() {
                tracing::warn!(
                    base = %name,
                    position,
                    found = json_kind(&item),
                    "Skipping knowledge entry that is not an object"
                );
                continue;
            }
            match serde_json::from_value::<RawEntry>(item) {
                Ok(raw) => entries.push(raw.into_entry(position)),
                Err(e) => {
                    tracing::warn!(
                        base = %name,
                        position,
                        error = %e,
                        "Skipping malformed knowledge entry"
                    );
                }
            }
        }

        if entries.len() < total {
            tracing::warn!(
                base = %name,
                loaded = entries.len(),
                skipped = total - entries.len(),
                "Some knowledge entries were skipped"
            );
        }

        Ok(Self { name, entries })
    }

    /// Read and parse a knowledge base file.
    pub fn try_load(name: impl Into<String>, path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(name, &text)
    }

    /// Read a knowledge base file, substituting an empty base on failure.
    ///
    /// The failure is logged and never raised: with an empty base every
    /// free-text query simply yields no match.
    pub fn load(name: impl Into<String>, path: &Path) -> Self {
        let name = name.into();
        match Self::try_load(name.clone(), path) {
            Ok(base) => {
                tracing::info!(
                    base = %base.name,
                    entries = base.len(),
                    path = %path.display(),
                    "Knowledge base loaded"
                );
                base
            }
            Err(e) => {
                tracing::error!(
                    base = %name,
                    path = %path.display(),
                    error = %e,
                    "Failed to load knowledge base; continuing with an empty one"
                );
                Self::empty(name)
            }
        }
    }

    /// Get the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get all entries in source order.
    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// Iterate over entries in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, KnowledgeEntry> {
        self.entries.iter()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the base has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an entry by ID.
    pub fn get(&self, id: &EntryId) -> Option<&KnowledgeEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    /// Find the first entry in a section, optionally restricted to a kind.
    ///
    /// Used by menu handlers; independent of free-text ranking.
    pub fn find_by_section(
        &self,
        section: &str,
        kind: Option<&EntryKind>,
    ) -> Option<&KnowledgeEntry> {
        self.entries.iter().find(|entry| {
            entry.in_section(section) && kind.map_or(true, |kind| &entry.kind == kind)
        })
    }

    /// Get distinct section labels in first-seen order.
    pub fn sections(&self) -> Vec<&str> {
        let mut sections: Vec<&str> = Vec::new();
        for section in self.entries.iter().filter_map(|e| e.section.as_deref()) {
            if !sections.contains(&section) {
                sections.push(section);
            }
        }
        sections
    }

    /// Count entries free-text matching can reach.
    pub fn searchable_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_searchable()).count()
    }
}

impl<'a> IntoIterator for &'a KnowledgeBase {
    type Item = &'a KnowledgeEntry;
    type IntoIter = std::slice::Iter<'a, KnowledgeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TWO_ENTRIES: &str = r#"[
        {
            "section": "🔒 Врачебная тайна",
            "type": "intro",
            "keywords": ["врачебная тайна"],
            "answer": "Сведения о факте обращения за медицинской помощью составляют врачебную тайну.",
            "law": "Кодекс о здоровье народа, ст. 273"
        },
        {
            "section": "🏥 Жалобы пациента",
            "keywords": ["жалоба", "претензия"],
            "a": "Жалоба подаётся руководителю медицинской организации."
        }
    ]"#;

    #[test]
    fn test_parse_two_entries() {
        let base = KnowledgeBase::from_json_str("faq", TWO_ENTRIES).unwrap();
        assert_eq!(base.len(), 2);
        assert_eq!(base.name(), "faq");
        assert_eq!(base.entries()[0].kind, EntryKind::Intro);
        assert_eq!(base.entries()[1].id, EntryId::position(1));
        assert!(base.entries()[1].payload.answer.is_some());
    }

    #[test]
    fn test_find_by_section() {
        let base = KnowledgeBase::from_json_str("faq", TWO_ENTRIES).unwrap();

        let found = base.find_by_section("🔒 Врачебная тайна", Some(&EntryKind::Intro));
        assert!(found.is_some());
        assert_eq!(found.unwrap().id, EntryId::position(0));

        assert!(base.find_by_section("🔒 Врачебная тайна", Some(&EntryKind::Card)).is_none());
        assert!(base.find_by_section("🏥 Жалобы пациента", None).is_some());
        assert!(base.find_by_section("🧪 Мини-тесты", None).is_none());
    }

    #[test]
    fn test_not_a_list() {
        let err = KnowledgeBase::from_json_str("faq", r#"{"keywords": []}"#).unwrap_err();
        assert!(matches!(err, StoreError::NotAList("object")));
    }

    #[test]
    fn test_malformed_json() {
        let err = KnowledgeBase::from_json_str("faq", "[{").unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }

    #[test]
    fn test_skips_bad_elements() {
        let text = r#"[
            "just a string",
            {"keywords": ["инцидент"], "answer": "ok"}
        ]"#;
        let base = KnowledgeBase::from_json_str("faq", text).unwrap();
        assert_eq!(base.len(), 1);
        assert_eq!(base.entries()[0].id, EntryId::position(1));
    }

    #[test]
    fn test_wrongly_typed_display_fields_keep_record() {
        let text = r#"[
            {"keywords": ["жалоба"], "answer": "Ответ", "law": ["ст. 91", "ст. 92"]},
            {"keywords": ["инцидент"], "answer": "Ответ", "section": 5}
        ]"#;
        let base = KnowledgeBase::from_json_str("faq", text).unwrap();
        assert_eq!(base.len(), 2);
        assert_eq!(base.searchable_count(), 2);
        assert!(base.entries()[0].payload.law.is_none());
        assert!(base.entries()[1].section.is_none());
        assert!(base.sections().is_empty());
    }

    #[test]
    fn test_get_by_id() {
        let base = KnowledgeBase::from_json_str("faq", TWO_ENTRIES).unwrap();
        let first = &base.entries()[0];
        assert_eq!(base.get(&first.id).map(|e| &e.id), Some(&first.id));
        assert!(base.get(&EntryId::key("no-such-entry")).is_none());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let base = KnowledgeBase::load("faq", Path::new("/definitely/not/here/faq.json"));
        assert!(base.is_empty());
        assert_eq!(base.name(), "faq");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWO_ENTRIES.as_bytes()).unwrap();

        let base = KnowledgeBase::load("faq", file.path());
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn test_try_load_reports_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\"not a list\"").unwrap();

        let result = KnowledgeBase::try_load("faq", file.path());
        assert!(matches!(result, Err(StoreError::NotAList("string"))));
        assert!(KnowledgeBase::load("faq", file.path()).is_empty());
    }

    #[test]
    fn test_sections_and_searchable() {
        let text = r#"[
            {"section": "A", "keywords": ["x"]},
            {"section": "B"},
            {"section": "A", "keywords": ["y"]}
        ]"#;
        let base = KnowledgeBase::from_json_str("faq", text).unwrap();
        assert_eq!(base.sections(), vec!["A", "B"]);
        assert_eq!(base.searchable_count(), 2);
        assert_eq!((&base).into_iter().count(), 3);
    }
}
