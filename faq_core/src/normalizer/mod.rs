//! Text Normalizer - canonicalizes free text and keywords for comparison.
//!
//! The pipeline:
//! 1. **Compose**: Unicode NFC, so decomposed marks fold like precomposed ones
//! 2. **Fold**: Fixed single-character substitutions, then lowercasing
//! 3. **Clean**: Anything but permitted letters, digits, and hyphens becomes a space
//! 4. **Split**: Whitespace tokens, minus hyphen-only tokens and stop words
//! 5. **Alias**: Known variants rewritten to their canonical phrase
//!
//! Every step is total and pure, and the whole pipeline is idempotent.

mod alias;
mod lexicon;

pub use alias::*;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Configuration for building a [`Normalizer`] on top of the built-in
/// vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Where aliases may match.
    pub alias_mode: AliasMode,

    /// Extra aliases, variant -> canonical phrase.
    pub extra_aliases: BTreeMap<String, String>,

    /// Extra stop words.
    pub extra_stop_words: Vec<String>,
}

/// Result of normalizing one string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Normalized {
    /// Tokens joined by single spaces.
    pub text: String,
    pub tokens: Vec<String>,
}

impl Normalized {
    /// Check whether nothing survived normalization.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Canonicalizes raw text. Immutable after construction and safe to share
/// between threads.
#[derive(Debug, Clone)]
pub struct Normalizer {
    substitutions: HashMap<char, char>,
    stop_words: HashSet<String>,
    aliases: AliasTable,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Normalizer {
    /// Create a normalizer with the given folds and stop words and no
    /// aliases.
    pub fn new<I, S>(substitutions: &[(char, char)], stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalizer = Self {
            substitutions: substitutions.iter().copied().collect(),
            stop_words: HashSet::new(),
            aliases: AliasTable::default(),
        };
        normalizer.add_stop_words(stop_words);
        normalizer
    }

    /// Create a normalizer with the built-in vocabulary.
    pub fn builtin() -> Self {
        Self::from_config(&NormalizerConfig::default())
    }

    /// Create a normalizer with the built-in vocabulary extended by `config`.
    pub fn from_config(config: &NormalizerConfig) -> Self {
        let mut normalizer = Self::new(lexicon::SUBSTITUTIONS, lexicon::STOP_WORDS);
        normalizer.add_stop_words(&config.extra_stop_words);

        let extra = config
            .extra_aliases
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()));
        let aliases = lexicon::ALIASES.iter().copied().chain(extra);
        normalizer.with_aliases(aliases, config.alias_mode)
    }

    /// Replace the alias table.
    ///
    /// Stop words must be settled first: keys and phrases are cleaned and
    /// stop-word filtered here so they live in the same space as queries.
    pub fn with_aliases<I, K, V>(mut self, aliases: I, mode: AliasMode) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut table = AliasTable::new(mode);
        for (key, phrase) in aliases {
            table.insert(
                self.plain_tokens(key.as_ref()),
                self.plain_tokens(phrase.as_ref()),
            );
        }
        self.aliases = table;
        self
    }

    fn add_stop_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let cleaned = self.clean(word.as_ref());
            self.stop_words
                .extend(cleaned.split(' ').filter(|t| !t.is_empty()).map(String::from));
        }
    }

    /// Check whether a cleaned token is a stop word.
    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Fold, lowercase, strip disallowed characters, and collapse whitespace.
    /// Combining marks left after composition are dropped without splitting
    /// the word. No stop-word removal or aliasing.
    pub fn clean(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        let mut pending_space = false;

        let folded = raw
            .nfc()
            .map(|c| self.substitutions.get(&c).copied().unwrap_or(c))
            .flat_map(char::to_lowercase);

        for c in folded {
            if is_combining_mark(c) {
                continue;
            }
            if is_permitted(c) {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
            } else {
                pending_space = true;
            }
        }

        out
    }

    /// Clean and split, dropping hyphen-only tokens and stop words.
    fn plain_tokens(&self, raw: &str) -> Vec<String> {
        self.clean(raw)
            .split(' ')
            .filter(|t| !t.is_empty() && !t.chars().all(|c| c == '-'))
            .filter(|t| !self.is_stop_word(t))
            .map(String::from)
            .collect()
    }

    /// Produce the canonical token sequence.
    pub fn tokenize(&self, raw: &str) -> Vec<String> {
        self.aliases.rewrite(self.plain_tokens(raw))
    }

    /// Produce the canonical string (tokens joined by single spaces).
    pub fn normalize(&self, raw: &str) -> String {
        self.tokenize(raw).join(" ")
    }

    /// Produce both the canonical string and its tokens.
    pub fn analyze(&self, raw: &str) -> Normalized {
        let tokens = self.tokenize(raw);
        Normalized {
            text: tokens.join(" "),
            tokens,
        }
    }
}

/// Permitted alphabet: Latin and Cyrillic lowercase letters, ASCII digits,
/// and the hyphen.
fn is_permitted(c: char) -> bool {
    matches!(c, 'a'..='z' | 'а'..='я' | '0'..='9' | '-')
}
