//! Per-entry score breakdown produced while ranking.

use serde::Serialize;

/// How a keyword contributed to an entry's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HitKind {
    /// The normalized keyword occurs verbatim in the normalized query.
    ExactPhrase,
    /// Best token similarity reached the confident-typo tier.
    Strong,
    /// Best token similarity reached the weaker tier.
    Weak,
}

/// One scoring keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordHit {
    /// Keyword as authored.
    pub keyword: String,
    /// Keyword after normalization.
    pub normalized: String,
    pub kind: HitKind,
    /// Best similarity seen (1.0 for exact phrases).
    pub similarity: f64,
    /// Points awarded.
    pub award: f64,
}

/// Score breakdown for one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct EntryTally {
    /// Index of the entry in its knowledge base.
    pub position: usize,

    /// Scoring keywords in keyword order.
    pub hits: Vec<KeywordHit>,

    /// Primary-answer nudge, only granted on top of a positive keyword score.
    pub bonus: f64,
}

impl EntryTally {
    /// Create an empty tally for the entry at `position`.
    pub fn new(position: usize) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Record a scoring keyword.
    pub fn add_hit(&mut self, hit: KeywordHit) {
        self.hits.push(hit);
    }

    /// Sum of keyword awards.
    pub fn keyword_score(&self) -> f64 {
        self.hits.iter().map(|h| h.award).sum()
    }

    /// Keyword score plus bonus.
    pub fn total(&self) -> f64 {
        self.keyword_score() + self.bonus
    }

    /// Whether any keyword matched exactly.
    pub fn has_exact_phrase(&self) -> bool {
        self.hits.iter().any(|h| h.kind == HitKind::ExactPhrase)
    }
}
