//! # FAQ Core
//!
//! The matching side of the FAQ responder. This crate reads knowledge bases
//! from `faq_base`, canonicalizes user text, scores entries with fuzzy keyword
//! matching, and wraps the result in a platform-agnostic dialogue shell.
//!
//! ## Core Components
//!
//! - **normalizer**: Folding, cleaning, stop words, and alias rewriting
//! - **similarity**: Pluggable string similarity on a 0-1 scale
//! - **ranker**: Tiered keyword scoring and best-entry selection
//! - **intent**: Token-set matching against named intents
//! - **formatter**: Display text for matched entries
//! - **dialogue**: Commands, menu sections, exam mode, and fallback escalation
//! - **config**: TOML configuration for all of the above
//!
//! ## Design Philosophy
//!
//! - **Pure matching**: Ranking is a function of the query and the knowledge base
//! - **Soft failure**: A missing or broken resource degrades to "no answer", never a crash
//! - **Tunable**: Every scoring constant lives in configuration

pub mod config;
pub mod dialogue;
pub mod formatter;
pub mod intent;
pub mod normalizer;
pub mod ranker;
pub mod similarity;

pub use config::*;
pub use dialogue::*;
pub use formatter::*;
pub use intent::*;
pub use normalizer::*;
pub use ranker::*;
pub use similarity::*;
