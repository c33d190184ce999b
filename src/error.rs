use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// The operation needs a configured model.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("{0}")]
    Value(String),
    #[error("{0}")]
    Index(String),
    /// Malformed source text, positions are 1-based.
    #[error("{message} on line {line}, col {col}")]
    Parsing {
        line: usize,
        col: usize,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;

impl ModelError {
    pub fn value(msg: impl Into<String>) -> Self {
        Self::Value(msg.into())
    }

    pub fn index(msg: impl Into<String>) -> Self {
        Self::Index(msg.into())
    }

    pub fn parsing(line: usize, col: usize, msg: impl Into<String>) -> Self {
        Self::Parsing {
            line,
            col,
            message: msg.into(),
        }
    }
}
