use thiserror::Error;

/// Errors produced by the TOON codec.
///
/// Encode-side failures (`UnsupportedType`, `NonStringKey`,
/// `MaxDepthExceeded`) are always fatal. Decode-side failures split into
/// `Syntax` (fatal regardless of strictness) and `Validation`
/// (fatal in strict mode, demoted to [`ValidationWarning`]s in lenient
/// mode).
///
/// [`ValidationWarning`]: crate::decode::validator::ValidationWarning
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToonError {
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("object key must be a string, found {0}")]
    NonStringKey(String),

    #[error("maximum nesting depth of {0} exceeded")]
    MaxDepthExceeded(usize),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("{message} at line {line}, column {column}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("{message} at line {line}, column {column}")]
    Validation {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("serialize failed: {0}")]
    Serialize(String),

    #[error("deserialize failed: {0}")]
    Deserialize(String),
}

impl ToonError {
    pub fn syntax(message: impl Into<String>, line: usize, column: usize) -> Self {
        ToonError::Syntax {
            message: message.into(),
            line,
            column,
        }
    }

    pub fn validation(message: impl Into<String>, line: usize, column: usize) -> Self {
        ToonError::Validation {
            message: message.into(),
            line,
            column,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ToonError::Validation { .. })
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, ToonError::Syntax { .. })
    }

    /// Source position of a decode error, when one was recorded.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            ToonError::Syntax { line, column, .. }
            | ToonError::Validation { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}

pub type ToonResult<T> = std::result::Result<T, ToonError>;
