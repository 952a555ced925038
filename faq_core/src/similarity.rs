//! Similarity Scorer - near-duplicate ratios between normalized strings.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A string similarity in `[0, 1]`.
///
/// Implementations must be symmetric, return `1.0` exactly when the strings
/// are equal, and `0.0` when exactly one side is empty.
pub trait Similarity: Send + Sync + std::fmt::Debug {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Normalized Damerau-Levenshtein ratio. One typo in a five-letter word
/// scores 0.8.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditRatio;

impl Similarity for EditRatio {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        strsim::normalized_damerau_levenshtein(a, b)
    }
}

/// Jaro-Winkler similarity, more forgiving of shared prefixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinkler;

impl Similarity for JaroWinkler {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        strsim::jaro_winkler(a, b).min(1.0)
    }
}

/// Selects a [`Similarity`] implementation from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimilarityKind {
    #[default]
    Edit,
    JaroWinkler,
}

impl SimilarityKind {
    /// Build the selected implementation.
    pub fn build(self) -> Arc<dyn Similarity> {
        match self {
            SimilarityKind::Edit => Arc::new(EditRatio),
            SimilarityKind::JaroWinkler => Arc::new(JaroWinkler),
        }
    }
}

/// True when both strings have at least `min_len` characters and one is a
/// substring of the other.
pub fn contains_either(a: &str, b: &str, min_len: usize) -> bool {
    a.chars().count() >= min_len
        && b.chars().count() >= min_len
        && (a.contains(b) || b.contains(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_ratio_identity_and_empty() {
        let s = EditRatio;
        assert_eq!(s.similarity("жалоба", "жалоба"), 1.0);
        assert_eq!(s.similarity("", "жалоба"), 0.0);
        assert_eq!(s.similarity("жалоба", ""), 0.0);
    }

    #[test]
    fn test_edit_ratio_one_typo() {
        let s = EditRatio;
        let score = s.similarity("тайну", "тайна");
        assert!((score - 0.8).abs() < 1e-9, "score = {}", score);
    }

    #[test]
    fn test_edit_ratio_transposition() {
        let s = EditRatio;
        // One swap of adjacent letters counts as a single edit.
        let score = s.similarity("инцидетн", "инцидент");
        assert!((score - 0.875).abs() < 1e-9, "score = {}", score);
    }

    #[test]
    fn test_symmetry() {
        for kind in [SimilarityKind::Edit, SimilarityKind::JaroWinkler] {
            let s = kind.build();
            assert_eq!(
                s.similarity("согласие", "согласия"),
                s.similarity("согласия", "согласие")
            );
        }
    }

    #[test]
    fn test_jaro_winkler_bounds() {
        let s = JaroWinkler;
        assert_eq!(s.similarity("врач", "врач"), 1.0);
        assert_eq!(s.similarity("", "врач"), 0.0);
        let score = s.similarity("врач", "врачи");
        assert!(score > 0.9 && score < 1.0);
    }

    #[test]
    fn test_contains_either() {
        assert!(contains_either("ответств", "ответственность", 4));
        assert!(contains_either("ответственность", "ответств", 4));
        assert!(!contains_either("отв", "ответственность", 4));
        assert!(!contains_either("жалоба", "тайна", 4));
    }

    #[test]
    fn test_kind_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            kind: SimilarityKind,
        }
        let w: Wrapper = toml::from_str(r#"kind = "jaro-winkler""#).unwrap();
        assert_eq!(w.kind, SimilarityKind::JaroWinkler);
    }
}
