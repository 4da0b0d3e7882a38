//! Core Error Types
//!
//! Defines the foundational error types used across the Prompt Studio workspace.
//! These error types are dependency-light (only thiserror + serde_json) to
//! keep the core crate lightweight.
//!
//! The main application crate extends these with additional error variants
//! (e.g., Database, Sqlite, Io, Locked) for storage and I/O failures.

use thiserror::Error;

/// Core error type for the Prompt Studio workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Input text is not syntactically valid JSON (or not a complete document)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Syntactically valid JSON that fails structural or safety validation
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaViolation),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}

/// The reason a candidate template file was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("payload is {size} bytes, limit is {limit}")]
    Oversized { size: usize, limit: usize },

    #[error("missing or unrecognized template signature")]
    BadSignature,

    #[error("missing or non-string template version")]
    MissingVersion,

    #[error("template data is missing or not an object")]
    MissingData,

    #[error("section `{0}` is missing or not an object")]
    MissingSection(String),

    #[error("field `{0}` is missing or has the wrong type")]
    InvalidField(String),

    #[error("field `{field}` exceeds {limit} characters")]
    FieldTooLong { field: String, limit: usize },

    #[error("payload contains blocked content ({0})")]
    BlockedContent(&'static str),
}
