//! Alias table - rewrites known variants to a canonical phrase.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Upper bound on rewrite passes before giving up on a fixed point.
const MAX_PASSES: usize = 8;

/// Where aliases may match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasMode {
    /// Any run of whole tokens inside the query.
    #[default]
    Phrase,
    /// Only the complete query.
    Whole,
}

/// Token-level alias rewriting.
///
/// Keys and canonical phrases are stored as token sequences already in
/// normalized form. A run of tokens that spells a canonical phrase is never
/// rewritten, so the table cannot expand its own output.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    mode: AliasMode,
    rewrites: HashMap<Vec<String>, Vec<String>>,
    canonical: HashSet<Vec<String>>,
    longest_key: usize,
    longest_canonical: usize,
}

impl AliasTable {
    /// Create an empty table.
    pub fn new(mode: AliasMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Add a rewrite from `key` tokens to `canonical` tokens.
    ///
    /// Empty keys or phrases are ignored. A repeated key keeps the latest
    /// phrase.
    pub fn insert(&mut self, key: Vec<String>, canonical: Vec<String>) {
        if key.is_empty() || canonical.is_empty() {
            return;
        }
        self.longest_key = self.longest_key.max(key.len());
        self.longest_canonical = self.longest_canonical.max(canonical.len());
        self.canonical.insert(canonical.clone());
        self.rewrites.insert(key, canonical);
    }

    /// Rewrite tokens until nothing changes.
    pub fn rewrite(&self, mut tokens: Vec<String>) -> Vec<String> {
        if self.rewrites.is_empty() || tokens.is_empty() {
            return tokens;
        }
        for _ in 0..MAX_PASSES {
            let next = match self.mode {
                AliasMode::Phrase => self.rewrite_phrases(&tokens),
                AliasMode::Whole => self.rewrite_whole(&tokens),
            };
            if next == tokens {
                return tokens;
            }
            tokens = next;
        }
        tracing::debug!(tokens = ?tokens, "Alias rewriting did not settle");
        tokens
    }

    fn rewrite_whole(&self, tokens: &[String]) -> Vec<String> {
        if self.canonical.contains(tokens) {
            return tokens.to_vec();
        }
        self.rewrites
            .get(tokens)
            .cloned()
            .unwrap_or_else(|| tokens.to_vec())
    }

    fn rewrite_phrases(&self, tokens: &[String]) -> Vec<String> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut i = 0;

        while i < tokens.len() {
            let rest = &tokens[i..];
            let kept = self.canonical_prefix(rest);

            match self.key_prefix(rest) {
                Some((len, phrase)) if len > kept => {
                    out.extend(phrase.iter().cloned());
                    i += len;
                }
                _ if kept > 0 => {
                    out.extend_from_slice(&rest[..kept]);
                    i += kept;
                }
                _ => {
                    out.push(rest[0].clone());
                    i += 1;
                }
            }
        }

        out
    }

    /// Length of the longest canonical phrase at the start of `tokens`, or 0.
    fn canonical_prefix(&self, tokens: &[String]) -> usize {
        (1..=self.longest_canonical.min(tokens.len()))
            .rev()
            .find(|&len| self.canonical.contains(&tokens[..len]))
            .unwrap_or(0)
    }

    /// Longest key at the start of `tokens`, with its phrase.
    fn key_prefix(&self, tokens: &[String]) -> Option<(usize, &[String])> {
        (1..=self.longest_key.min(tokens.len()))
            .rev()
            .find_map(|len| {
                self.rewrites
                    .get(&tokens[..len])
                    .map(|phrase| (len, phrase.as_slice()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn table(mode: AliasMode) -> AliasTable {
        let mut table = AliasTable::new(mode);
        table.insert(toks("тайна"), toks("врачебная тайна"));
        table.insert(toks("тайну"), toks("врачебная тайна"));
        table.insert(toks("жлба"), toks("жалоба"));
        table.insert(toks("врачебную тайну"), toks("врачебная тайна"));
        table
    }

    #[test]
    fn test_phrase_rewrite_inside_query() {
        let table = table(AliasMode::Phrase);
        let out = table.rewrite(toks("расскажите тайну врача"));
        assert_eq!(out, toks("расскажите врачебная тайна врача"));
    }

    #[test]
    fn test_canonical_not_reexpanded() {
        let table = table(AliasMode::Phrase);
        let once = table.rewrite(toks("тайна"));
        assert_eq!(once, toks("врачебная тайна"));
        assert_eq!(table.rewrite(once.clone()), once);
    }

    #[test]
    fn test_longest_key_wins() {
        let table = table(AliasMode::Phrase);
        let out = table.rewrite(toks("врачебную тайну"));
        assert_eq!(out, toks("врачебная тайна"));
    }

    #[test]
    fn test_whole_mode_requires_full_match() {
        let table = table(AliasMode::Whole);
        assert_eq!(table.rewrite(toks("жлба")), toks("жалоба"));
        assert_eq!(table.rewrite(toks("моя жлба")), toks("моя жлба"));
    }

    #[test]
    fn test_empty_inputs_ignored() {
        let mut table = AliasTable::new(AliasMode::Phrase);
        table.insert(Vec::new(), toks("x"));
        table.insert(toks("x"), Vec::new());
        assert_eq!(table.rewrite(toks("x")), toks("x"));
        assert!(table.rewrite(Vec::new()).is_empty());
    }
}
