//! Entry Ranker - picks the best knowledge entry for a free-text query.
//!
//! For every entry the ranker walks its keywords:
//! 1. **Exact phrase**: the normalized keyword occurs in the normalized query
//! 2. **Fuzzy**: otherwise the best similarity against any query token,
//!    raised to a floor when one token truncates the other
//! 3. **Tiers**: the best similarity earns strong or weak credit
//!
//! The highest cumulative score wins, earlier entries win ties, and the
//! winner is accepted only above a minimum score.

mod tally;

pub use tally::*;

use faq_base::{KnowledgeBase, KnowledgeEntry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::normalizer::{Normalized, Normalizer};
use crate::similarity::{contains_either, Similarity, SimilarityKind};

/// Scoring constants for the ranker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    /// Award for a keyword found verbatim in the query.
    pub exact_phrase_award: f64,

    /// Award for a confident fuzzy match.
    pub strong_award: f64,

    /// Award for a weak fuzzy match.
    pub weak_award: f64,

    /// Similarity needed for the strong tier.
    pub strong_similarity: f64,

    /// Similarity needed for the weak tier.
    pub weak_similarity: f64,

    /// Similarity floor granted when one token contains the other.
    pub truncation_similarity: f64,

    /// Minimum length (in characters) of both sides for the truncation floor.
    pub truncation_min_len: usize,

    /// Nudge for primary answer cards that already scored.
    pub card_bonus: f64,

    /// A winner must score strictly above this.
    pub min_score: f64,

    /// Similarity implementation.
    pub similarity: SimilarityKind,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            exact_phrase_award: 3.0,
            strong_award: 1.6,
            weak_award: 0.9,
            strong_similarity: 0.78,
            weak_similarity: 0.70,
            truncation_similarity: 0.80,
            truncation_min_len: 4,
            card_bonus: 0.1,
            min_score: 1.0,
            similarity: SimilarityKind::Edit,
        }
    }
}

/// Outcome of ranking one query against one knowledge base.
///
/// `entry` is `None` when nothing cleared the gate; `score` is then the best
/// sub-threshold score, kept for diagnostics and cross-base comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'a> {
    pub entry: Option<&'a KnowledgeEntry>,
    pub score: f64,
}

impl<'a> MatchResult<'a> {
    /// A result with no accepted entry.
    pub fn no_match(score: f64) -> Self {
        Self { entry: None, score }
    }

    /// Whether an entry was accepted.
    pub fn is_match(&self) -> bool {
        self.entry.is_some()
    }
}

/// Which knowledge base should answer when both were queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseChoice {
    Faq,
    Exam,
    Neither,
}

/// Pick between an FAQ result and an exam-card result.
///
/// When both matched, the exam card wins only if it beats the FAQ score by
/// more than `margin`.
pub fn arbitrate(faq: &MatchResult<'_>, exam: &MatchResult<'_>, margin: f64) -> BaseChoice {
    match (faq.is_match(), exam.is_match()) {
        (true, true) if exam.score > faq.score + margin => BaseChoice::Exam,
        (true, _) => BaseChoice::Faq,
        (false, true) => BaseChoice::Exam,
        (false, false) => BaseChoice::Neither,
    }
}

/// Scores knowledge entries against queries.
///
/// Immutable after construction; `rank` is a pure function of the query and
/// the knowledge base, so one ranker can serve many threads.
#[derive(Debug, Clone)]
pub struct Ranker {
    config: RankerConfig,
    normalizer: Normalizer,
    similarity: Arc<dyn Similarity>,
}

impl Ranker {
    /// Create a ranker using the similarity named in `config`.
    pub fn new(config: RankerConfig, normalizer: Normalizer) -> Self {
        let similarity = config.similarity.build();
        Self {
            config,
            normalizer,
            similarity,
        }
    }

    /// Create a ranker with default constants and the built-in vocabulary.
    pub fn with_defaults() -> Self {
        Self::new(RankerConfig::default(), Normalizer::builtin())
    }

    /// Get the configuration.
    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// Get the normalizer.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Get the similarity implementation.
    pub fn similarity(&self) -> &Arc<dyn Similarity> {
        &self.similarity
    }

    /// Score one entry against an already normalized query.
    pub fn score_entry(
        &self,
        query: &Normalized,
        position: usize,
        entry: &KnowledgeEntry,
    ) -> EntryTally {
        let config = &self.config;
        let mut tally = EntryTally::new(position);

        for keyword in &entry.keywords {
            let normalized = self.normalizer.normalize(keyword);
            if normalized.is_empty() {
                continue;
            }

            if query.text.contains(&normalized) {
                tally.add_hit(KeywordHit {
                    keyword: keyword.clone(),
                    normalized,
                    kind: HitKind::ExactPhrase,
                    similarity: 1.0,
                    award: config.exact_phrase_award,
                });
                continue;
            }

            let best = query
                .tokens
                .iter()
                .map(|token| {
                    let similarity = self.similarity.similarity(token, &normalized);
                    if contains_either(token, &normalized, config.truncation_min_len) {
                        similarity.max(config.truncation_similarity)
                    } else {
                        similarity
                    }
                })
                .fold(0.0_f64, f64::max);

            let tier = if best >= config.strong_similarity {
                Some((HitKind::Strong, config.strong_award))
            } else if best >= config.weak_similarity {
                Some((HitKind::Weak, config.weak_award))
            } else {
                None
            };

            if let Some((kind, award)) = tier {
                tally.add_hit(KeywordHit {
                    keyword: keyword.clone(),
                    normalized,
                    kind,
                    similarity: best,
                    award,
                });
            }
        }

        if tally.keyword_score() > 0.0 && entry.kind.is_primary_answer() {
            tally.bonus = config.card_bonus;
        }

        tally
    }

    /// Rank every entry of `base` against `query` and apply the gate.
    pub fn rank<'a>(&self, base: &'a KnowledgeBase, query: &str) -> MatchResult<'a> {
        let normalized = self.normalizer.analyze(query);
        if normalized.is_empty() {
            return MatchResult::no_match(0.0);
        }

        let mut best: Option<&'a KnowledgeEntry> = None;
        let mut best_score = 0.0_f64;

        for (position, entry) in base.iter().enumerate() {
            if !entry.is_searchable() {
                continue;
            }
            let score = self.score_entry(&normalized, position, entry).total();
            if score > best_score {
                best = Some(entry);
                best_score = score;
            }
        }

        let accepted = best.filter(|_| best_score > self.config.min_score);
        tracing::debug!(
            base = base.name(),
            query = %normalized.text,
            score = best_score,
            entry = ?accepted.map(|e| &e.id),
            "Ranked query"
        );

        MatchResult {
            entry: accepted,
            score: best_score,
        }
    }

    /// Score breakdowns for every entry that scored, best first (ties keep
    /// source order).
    pub fn explain(&self, base: &KnowledgeBase, query: &str) -> Vec<EntryTally> {
        let normalized = self.normalizer.analyze(query);
        if normalized.is_empty() {
            return Vec::new();
        }

        let mut tallies: Vec<EntryTally> = base
            .iter()
            .enumerate()
            .map(|(position, entry)| self.score_entry(&normalized, position, entry))
            .filter(|tally| tally.total() > 0.0)
            .collect();

        tallies.sort_by(|a, b| {
            b.total()
                .partial_cmp(&a.total())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        tallies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faq_base::{EntryId, EntryKind, EntryPayload};

    fn entry(id: &str, keywords: &[&str]) -> KnowledgeEntry {
        KnowledgeEntry::new(EntryId::key(id))
            .with_keywords(keywords.iter().copied())
            .with_payload(EntryPayload::answer(format!("answer {}", id)))
    }

    fn setup_test_base() -> KnowledgeBase {
        KnowledgeBase::new(
            "faq",
            vec![
                entry("secrecy", &["врачебная тайна"]),
                entry("complaint", &["жалоба", "претензия"]),
                entry("liability", &["ответственность"]),
                entry("intro", &[]).with_section("🚨 Инциденты"),
            ],
        )
    }

    #[test]
    fn test_exact_phrase_via_alias() {
        let ranker = Ranker::with_defaults();
        let base = setup_test_base();

        let result = ranker.rank(&base, "Расскажите про тайну врача");
        assert_eq!(result.entry.unwrap().id, EntryId::key("secrecy"));
        assert!(result.score >= 3.0);
    }

    #[test]
    fn test_truncated_alias() {
        let ranker = Ranker::with_defaults();
        let base = setup_test_base();

        let result = ranker.rank(&base, "жлба");
        assert_eq!(result.entry.unwrap().id, EntryId::key("complaint"));
        assert!(result.score >= 3.0);
    }

    #[test]
    fn test_fuzzy_strong_tier() {
        let ranker = Ranker::with_defaults();
        let base = setup_test_base();

        // Two letters swapped: no alias, no substring, similarity 14/15.
        let result = ranker.rank(&base, "ответсвтенность");
        assert_eq!(result.entry.unwrap().id, EntryId::key("liability"));
        assert!((result.score - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_truncation_floor() {
        let ranker = Ranker::with_defaults();
        let base = setup_test_base();

        let normalized = ranker.normalizer().analyze("претенз");
        let tally = ranker.score_entry(&normalized, 1, &base.entries()[1]);
        assert_eq!(tally.hits.len(), 1);
        assert_eq!(tally.hits[0].kind, HitKind::Strong);
        assert!(tally.hits[0].similarity >= 0.8);
    }

    #[test]
    fn test_empty_query_no_match() {
        let ranker = Ranker::with_defaults();
        let base = setup_test_base();

        for query in ["", "   ", "?!", "и про что"] {
            let result = ranker.rank(&base, query);
            assert!(result.entry.is_none());
            assert_eq!(result.score, 0.0);
        }
    }

    #[test]
    fn test_empty_base_no_match() {
        let ranker = Ranker::with_defaults();
        let empty = KnowledgeBase::empty("faq");
        let result = ranker.rank(&empty, "жалоба");
        assert!(!result.is_match());
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_unrelated_keyword_scores_zero() {
        let ranker = Ranker::with_defaults();
        let base = KnowledgeBase::new("faq", vec![entry("en", &["responsibility"])]);

        let normalized = ranker.normalizer().analyze("инцидент в отделении");
        let tally = ranker.score_entry(&normalized, 0, &base.entries()[0]);
        assert_eq!(tally.total(), 0.0);
        assert!(ranker.rank(&base, "инцидент в отделении").entry.is_none());
    }

    #[test]
    fn test_ties_keep_first_entry() {
        let ranker = Ranker::with_defaults();
        let base = KnowledgeBase::new(
            "faq",
            vec![entry("first", &["инцидент"]), entry("second", &["инцидент"])],
        );

        let result = ranker.rank(&base, "инцидент");
        assert_eq!(result.entry.unwrap().id, EntryId::key("first"));
    }

    #[test]
    fn test_card_bonus_only_when_scored() {
        let ranker = Ranker::with_defaults();
        let card = entry("card", &["инцидент"]).with_kind(EntryKind::Card);

        let hit = ranker.score_entry(&ranker.normalizer().analyze("инцидент"), 0, &card);
        assert!((hit.total() - 3.1).abs() < 1e-9);

        let miss = ranker.score_entry(&ranker.normalizer().analyze("пациент"), 0, &card);
        assert_eq!(miss.total(), 0.0);
    }

    #[test]
    fn test_card_bonus_breaks_tie() {
        let ranker = Ranker::with_defaults();
        let base = KnowledgeBase::new(
            "exam",
            vec![
                entry("plain", &["инцидент"]),
                entry("card", &["инцидент"]).with_kind(EntryKind::Card),
            ],
        );
        let result = ranker.rank(&base, "инцидент");
        assert_eq!(result.entry.unwrap().id, EntryId::key("card"));
    }

    #[test]
    fn test_below_gate_reports_score() {
        let config = RankerConfig {
            min_score: 2.0,
            ..RankerConfig::default()
        };
        let ranker = Ranker::new(config, Normalizer::builtin());
        let base = setup_test_base();

        let result = ranker.rank(&base, "ответсвтенность");
        assert!(result.entry.is_none());
        assert!((result.score - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_exact_outscores_fuzzy() {
        let ranker = Ranker::with_defaults();
        let base = KnowledgeBase::new(
            "faq",
            vec![entry("fuzzy", &["инцидентов"]), entry("exact", &["инцидент"])],
        );
        let tallies = ranker.explain(&base, "инцидент");
        assert_eq!(tallies[0].position, 1);
        assert!(tallies[0].has_exact_phrase());
        assert!(tallies[0].total() > tallies[1].total());
    }

    #[test]
    fn test_arbitrate() {
        let faq_entry = entry("faq", &["x"]);
        let exam_entry = entry("exam", &["x"]);

        let faq = MatchResult {
            entry: Some(&faq_entry),
            score: 3.0,
        };
        let exam_close = MatchResult {
            entry: Some(&exam_entry),
            score: 3.4,
        };
        let exam_far = MatchResult {
            entry: Some(&exam_entry),
            score: 3.6,
        };
        let none = MatchResult::no_match(0.5);

        assert_eq!(arbitrate(&faq, &exam_close, 0.5), BaseChoice::Faq);
        assert_eq!(arbitrate(&faq, &exam_far, 0.5), BaseChoice::Exam);
        assert_eq!(arbitrate(&none, &exam_close, 0.5), BaseChoice::Exam);
        assert_eq!(arbitrate(&faq, &none, 0.5), BaseChoice::Faq);
        assert_eq!(arbitrate(&none, &none, 0.5), BaseChoice::Neither);
    }
}
