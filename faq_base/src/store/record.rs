//! Source record shape and its conversion into a [`KnowledgeEntry`].

use serde::Deserialize;
use serde_json::Value;

use crate::entries::{non_blank, EntryId, EntryKind, EntryPayload, KnowledgeEntry};
use crate::error::json_kind;

/// One element of a knowledge resource as authored.
///
/// Unknown fields are ignored. Every field is read as a raw value so a field
/// of the wrong type only blanks that field; the rest of the record loads.
#[derive(Debug, Deserialize)]
pub(crate) struct RawEntry {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    section: Option<Value>,
    #[serde(default, rename = "type")]
    kind: Option<Value>,
    #[serde(default)]
    keywords: Option<Value>,
    #[serde(default)]
    answer: Option<Value>,
    #[serde(default)]
    a: Option<Value>,
    #[serde(default)]
    law: Option<Value>,
    #[serde(default)]
    question: Option<Value>,
    #[serde(default)]
    ideal_answer: Option<Value>,
    #[serde(default)]
    comment: Option<Value>,
    #[serde(default)]
    common_mistake: Option<Value>,
}

impl RawEntry {
    /// Convert into a domain entry. `position` is the index in the source
    /// array and becomes the ID when the record has none.
    pub(crate) fn into_entry(self, position: usize) -> KnowledgeEntry {
        let id = match self.id {
            Some(Value::String(key)) if !key.trim().is_empty() => {
                EntryId::Key(key.trim().to_string())
            }
            Some(Value::Number(n)) => EntryId::Key(n.to_string()),
            _ => EntryId::Position(position),
        };

        let keywords = read_keywords(self.keywords, &id);
        let text = |raw: Option<Value>, field: &'static str| read_text(raw, field, &id);

        let payload = EntryPayload {
            answer: text(self.answer, "answer").or_else(|| text(self.a, "a")),
            law: text(self.law, "law"),
            question: text(self.question, "question"),
            ideal_answer: text(self.ideal_answer, "ideal_answer"),
            comment: text(self.comment, "comment"),
            common_mistake: text(self.common_mistake, "common_mistake"),
        };
        let section = text(self.section, "section");
        let kind = EntryKind::parse(text(self.kind, "type").as_deref());

        KnowledgeEntry {
            id,
            section,
            kind,
            keywords,
            payload,
        }
    }
}

/// Read a display field: strings are kept (blank ones become `None`), any
/// other type is dropped with a warning.
fn read_text(raw: Option<Value>, field: &'static str, id: &EntryId) -> Option<String> {
    match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => non_blank(Some(s)),
        Some(other) => {
            tracing::warn!(
                entry = %id,
                field,
                found = json_kind(&other),
                "Ignoring display field that is not a string"
            );
            None
        }
    }
}

/// Read the keyword list leniently: a missing or non-list value yields no
/// keywords, and non-string or blank elements are dropped one by one.
fn read_keywords(raw: Option<Value>, id: &EntryId) -> Vec<String> {
    match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            let total = items.len();
            let keywords: Vec<String> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) if !s.trim().is_empty() => Some(s),
                    _ => None,
                })
                .collect();
            if keywords.len() < total {
                tracing::debug!(
                    entry = %id,
                    dropped = total - keywords.len(),
                    "Dropped non-string or blank keywords"
                );
            }
            keywords
        }
        Some(other) => {
            tracing::warn!(
                entry = %id,
                found = json_kind(&other),
                "Keywords field is not a list; entry is reachable by section only"
            );
            Vec::new()
        }
    }
}
