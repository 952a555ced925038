//! Entry definitions for the knowledge base.

mod entry;
mod payload;

pub use entry::*;
pub use payload::*;

use serde::{Deserialize, Serialize};

/// Identity of an entry within its knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryId {
    /// Explicit `id` carried by the source record.
    Key(String),
    /// Index in the source array, used when the record has no `id`.
    Position(usize),
}

impl EntryId {
    /// Create an ID from an explicit key.
    pub fn key(key: impl Into<String>) -> Self {
        EntryId::Key(key.into())
    }

    /// Create an ID from a position in the source.
    pub fn position(index: usize) -> Self {
        EntryId::Position(index)
    }

    /// Parse an ID as displayed: `#N` is a position, anything else a key.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text.strip_prefix('#').map(str::parse::<usize>) {
            Some(Ok(index)) => EntryId::Position(index),
            _ => EntryId::Key(text.to_string()),
        }
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryId::Key(key) => write!(f, "{}", key),
            EntryId::Position(index) => write!(f, "#{}", index),
        }
    }
}

/// Kind tag of an entry, taken from its `type` field.
///
/// Decides which formatter path applies downstream. Matching only uses it for
/// the small primary-answer bonus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EntryKind {
    /// Section introduction shown by a menu button.
    Intro,
    /// Term definition.
    Definition,
    /// Primary answer card.
    Card,
    /// Plain FAQ entry (no `type` given).
    #[default]
    Faq,
    /// Unrecognised tag, kept verbatim.
    Other(String),
}

impl EntryKind {
    /// Parse a `type` tag. Matching is case-insensitive and ignores
    /// surrounding whitespace.
    pub fn parse(tag: Option<&str>) -> Self {
        let Some(tag) = tag else {
            return EntryKind::Faq;
        };
        match tag.trim().to_lowercase().as_str() {
            "" | "faq" => EntryKind::Faq,
            "intro" => EntryKind::Intro,
            "definition" | "def" => EntryKind::Definition,
            "card" | "answer" => EntryKind::Card,
            _ => EntryKind::Other(tag.trim().to_string()),
        }
    }

    /// Whether this kind marks a primary answer card.
    pub fn is_primary_answer(&self) -> bool {
        matches!(self, EntryKind::Card)
    }

    /// Get the tag name for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            EntryKind::Intro => "intro",
            EntryKind::Definition => "definition",
            EntryKind::Card => "card",
            EntryKind::Faq => "faq",
            EntryKind::Other(tag) => tag,
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Drop blank strings.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_parse() {
        assert_eq!(EntryKind::parse(None), EntryKind::Faq);
        assert_eq!(EntryKind::parse(Some("")), EntryKind::Faq);
        assert_eq!(EntryKind::parse(Some("Intro")), EntryKind::Intro);
        assert_eq!(EntryKind::parse(Some(" def ")), EntryKind::Definition);
        assert_eq!(EntryKind::parse(Some("answer")), EntryKind::Card);
        assert_eq!(
            EntryKind::parse(Some("quiz")),
            EntryKind::Other("quiz".to_string())
        );
    }

    #[test]
    fn test_primary_answer() {
        assert!(EntryKind::Card.is_primary_answer());
        assert!(!EntryKind::Intro.is_primary_answer());
        assert!(!EntryKind::Definition.is_primary_answer());
        assert!(!EntryKind::Faq.is_primary_answer());
    }

    #[test]
    fn test_entry_id_display() {
        assert_eq!(EntryId::key("consent-1").to_string(), "consent-1");
        assert_eq!(EntryId::position(3).to_string(), "#3");
    }

    #[test]
    fn test_entry_id_parse() {
        assert_eq!(EntryId::parse("#3"), EntryId::position(3));
        assert_eq!(EntryId::parse(" consent-1 "), EntryId::key("consent-1"));
        assert_eq!(EntryId::parse("#x"), EntryId::key("#x"));
        assert_eq!(EntryId::parse("7"), EntryId::key("7"));
    }
}
