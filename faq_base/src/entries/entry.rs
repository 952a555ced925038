//! Knowledge entry - one answerable unit.

use serde::{Deserialize, Serialize};

use super::{EntryId, EntryKind, EntryPayload};

/// One answerable FAQ or exam-card record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: EntryId,

    /// Category label used by menu lookups.
    pub section: Option<String>,

    /// Kind tag from the record's `type`.
    pub kind: EntryKind,

    /// Matchable surface. Stored as authored; normalized at match time.
    /// An entry without keywords is reachable only through section lookup.
    pub keywords: Vec<String>,

    /// Display fields handed to the formatter.
    pub payload: EntryPayload,
}

impl KnowledgeEntry {
    /// Create a plain FAQ entry.
    pub fn new(id: EntryId) -> Self {
        Self {
            id,
            section: None,
            kind: EntryKind::Faq,
            keywords: Vec::new(),
            payload: EntryPayload::default(),
        }
    }

    /// Set the section label.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Set the kind tag.
    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }

    /// Add one keyword.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    /// Add several keywords.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Set the display payload.
    pub fn with_payload(mut self, payload: EntryPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Whether free-text matching can ever reach this entry.
    pub fn is_searchable(&self) -> bool {
        !self.keywords.is_empty()
    }

    /// Whether this entry sits in the given section (surrounding whitespace
    /// ignored).
    pub fn in_section(&self, section: &str) -> bool {
        self.section
            .as_deref()
            .is_some_and(|own| own.trim() == section.trim())
    }
}
