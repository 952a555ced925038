//! Intent Matcher - token-set matching of free text against named intents.

use faq_base::IntentSet;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::normalizer::Normalizer;
use crate::similarity::Similarity;

/// Best intent for a piece of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentMatch {
    pub name: String,
    /// Token-set ratio on a 0-100 scale.
    pub score: f64,
}

/// An intent with its phrases already cleaned.
#[derive(Debug, Clone)]
struct PreparedIntent {
    name: String,
    phrases: Vec<String>,
}

/// Matches text to the closest intent by token-set ratio.
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    intents: Vec<PreparedIntent>,
    normalizer: Normalizer,
    similarity: Arc<dyn Similarity>,
}

impl IntentMatcher {
    /// Prepare an intent set. Each example is one phrase, and the keywords
    /// joined by spaces form one more.
    pub fn new(set: &IntentSet, normalizer: Normalizer, similarity: Arc<dyn Similarity>) -> Self {
        let intents = set
            .iter()
            .map(|intent| {
                let keyword_phrase = intent.keywords.join(" ");
                let phrases = intent
                    .examples
                    .iter()
                    .map(String::as_str)
                    .chain(std::iter::once(keyword_phrase.as_str()))
                    .map(|p| normalizer.clean(p))
                    .filter(|p| !p.is_empty())
                    .collect();
                PreparedIntent {
                    name: intent.name.clone(),
                    phrases,
                }
            })
            .collect();

        Self {
            intents,
            normalizer,
            similarity,
        }
    }

    /// Get the number of intents.
    pub fn len(&self) -> usize {
        self.intents.len()
    }

    /// Check whether there are no intents.
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// Find the best intent. Ties keep the intent that sorts first by name.
    pub fn match_text(&self, text: &str) -> Option<IntentMatch> {
        let cleaned = self.normalizer.clean(text);
        let mut best: Option<IntentMatch> = None;

        for intent in &self.intents {
            let score = intent
                .phrases
                .iter()
                .map(|phrase| token_set_ratio(self.similarity.as_ref(), &cleaned, phrase))
                .fold(0.0_f64, f64::max);

            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(IntentMatch {
                    name: intent.name.clone(),
                    score,
                });
            }
        }

        best
    }
}

/// Token-set ratio on a 0-100 scale.
///
/// Compares the shared tokens against each side's full token set, so extra
/// words on one side do not dilute a complete match.
pub fn token_set_ratio(similarity: &dyn Similarity, a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let shared: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let only_a: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let only_b: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !shared.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 100.0;
    }

    let sect = shared.join(" ");
    let combined_a = join_parts(&sect, &only_a);
    let combined_b = join_parts(&sect, &only_b);

    let mut best = similarity.similarity(&combined_a, &combined_b);
    if !sect.is_empty() {
        best = best
            .max(similarity.similarity(&sect, &combined_a))
            .max(similarity.similarity(&sect, &combined_b));
    }
    best * 100.0
}

fn join_parts(sect: &str, rest: &[&str]) -> String {
    let rest = rest.join(" ");
    match (sect.is_empty(), rest.is_empty()) {
        (true, _) => rest,
        (false, true) => sect.to_string(),
        (false, false) => format!("{} {}", sect, rest),
    }
}
