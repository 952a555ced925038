//! Bot configuration, read once at startup from a TOML file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::formatter::DEFAULT_DISCLAIMER;
use crate::normalizer::{Normalizer, NormalizerConfig};
use crate::ranker::{Ranker, RankerConfig};

/// Failure to read the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Complete bot configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub knowledge: KnowledgeConfig,
    pub matching: RankerConfig,
    pub normalizer: NormalizerConfig,
    pub dialogue: DialogueConfig,
}

/// Where the knowledge resources live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// General FAQ entries.
    pub faq_path: PathBuf,

    /// Exam-card entries.
    pub exam_path: PathBuf,

    /// Optional intent set.
    pub intents_path: Option<PathBuf>,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            faq_path: PathBuf::from("faq.json"),
            exam_path: PathBuf::from("exam.json"),
            intents_path: None,
        }
    }
}

/// Dialogue shell settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Appended to every answer. Empty disables it.
    pub disclaimer: String,

    /// How far an exam card must outscore the FAQ answer to be preferred.
    pub exam_margin: f64,

    /// Time limit for the fallback responder.
    pub fallback_timeout_ms: u64,

    /// Most fallback calls allowed to run at once, counting timed-out ones
    /// that have not returned yet.
    pub fallback_max_in_flight: usize,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            disclaimer: DEFAULT_DISCLAIMER.to_string(),
            exam_margin: 0.5,
            fallback_timeout_ms: 8_000,
            fallback_max_in_flight: 4,
        }
    }
}

impl DialogueConfig {
    /// Fallback time limit as a duration.
    pub fn fallback_timeout(&self) -> Duration {
        Duration::from_millis(self.fallback_timeout_ms)
    }
}

impl BotConfig {
    /// Parse configuration from TOML text. Paths are kept as written.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration.
    ///
    /// With no path the built-in defaults are used. Relative knowledge paths
    /// in a file are resolved against that file's directory.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            tracing::debug!("No config file given; using defaults");
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;

        if let Some(dir) = path.parent() {
            config.knowledge.resolve_against(dir);
        }

        tracing::info!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    /// Build the normalizer described by this configuration.
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::from_config(&self.normalizer)
    }

    /// Build the ranker described by this configuration.
    pub fn ranker(&self) -> Ranker {
        Ranker::new(self.matching.clone(), self.normalizer())
    }
}

impl KnowledgeConfig {
    fn resolve_against(&mut self, dir: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = dir.join(&*p);
            }
        };
        resolve(&mut self.faq_path);
        resolve(&mut self.exam_path);
        if let Some(p) = self.intents_path.as_mut() {
            resolve(p);
        }
    }
}
