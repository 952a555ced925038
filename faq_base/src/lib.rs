//! # FAQ Base
//!
//! The knowledge base crate - holds the curated FAQ and exam-card entries the
//! responder answers from. This crate is the single source of truth for entry
//! data and does not contain any matching logic.
//!
//! ## Core Components
//!
//! - **entries**: Entry identity, kind tags, and display payload
//! - **store**: Load-once knowledge bases and intent sets with section lookup
//! - **error**: Errors raised while reading a knowledge resource

pub mod entries;
pub mod error;
pub mod store;

pub use entries::*;
pub use error::*;
pub use store::*;
