//! Errors raised while reading a knowledge resource.

use std::io;
use thiserror::Error;

/// Failure to read or parse a knowledge resource.
///
/// Callers that must keep running should use the soft loaders
/// ([`crate::KnowledgeBase::load`], [`crate::IntentSet::load`]), which log
/// these and substitute an empty collection.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array at the top level, got {0}")]
    NotAList(&'static str),

    #[error("expected a JSON object at the top level, got {0}")]
    NotAnObject(&'static str),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Short name of a JSON value's shape, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
