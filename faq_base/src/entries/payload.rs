//! Display payload carried by an entry.

use serde::{Deserialize, Serialize};

use super::non_blank;

/// Display fields of an entry. Opaque to matching.
///
/// Every field is optional; a blank string is stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntryPayload {
    /// Answer text (legacy records call it `a`).
    pub answer: Option<String>,

    /// Citation of the governing norms.
    pub law: Option<String>,

    /// Exam question.
    pub question: Option<String>,

    /// Model answer to the exam question.
    pub ideal_answer: Option<String>,

    /// Examiner's comment.
    pub comment: Option<String>,

    /// Typical mistake made when answering.
    pub common_mistake: Option<String>,
}

impl EntryPayload {
    /// Create a payload holding only an answer.
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            answer: non_blank(Some(text.into())),
            ..Self::default()
        }
    }

    /// Set the citation.
    pub fn with_law(mut self, law: impl Into<String>) -> Self {
        self.law = non_blank(Some(law.into()));
        self
    }

    /// Set the exam question and model answer.
    pub fn with_exam(
        mut self,
        question: impl Into<String>,
        ideal_answer: impl Into<String>,
    ) -> Self {
        self.question = non_blank(Some(question.into()));
        self.ideal_answer = non_blank(Some(ideal_answer.into()));
        self
    }

    /// Whether this payload is laid out as an exam card.
    pub fn is_exam_card(&self) -> bool {
        self.question.is_some() || self.ideal_answer.is_some()
    }

    /// Answer text with surrounding whitespace removed, or an empty string.
    pub fn answer_text(&self) -> &str {
        self.answer.as_deref().map(str::trim).unwrap_or("")
    }
}
