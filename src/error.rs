//! Error types for dump-ast.

use thiserror::Error;

/// The main error type for parsing and projecting SELECT trees.
#[derive(Debug, Error)]
pub enum AstError {
    /// The SQL text was rejected before any SELECT tree was built.
    #[error("Parse error: {message}")]
    Parse { position: usize, message: String },

    /// The input parsed but held no top-level SELECT.
    #[error("No SELECT statement found in input")]
    NoSelect,

    /// The document would exceed the writer's capacity.
    #[error("Output exceeds the {limit} byte limit")]
    OutputOverflow { limit: usize },

    /// The tree handed to the projector breaks a structural contract.
    #[error("Malformed tree: {0}")]
    MalformedTree(String),

    /// A regenerated fixture no longer matches the stored one.
    #[error("Fixture mismatch for {name}")]
    FixtureMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AstError {
    /// Create a parse error at the given byte offset.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create a malformed-tree error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedTree(message.into())
    }

    /// Byte offset of a parse error, if this is one.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Parse { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Result type alias for dump-ast operations.
pub type AstResult<T> = Result<T, AstError>;
