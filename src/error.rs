// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TodoError>;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl TodoError {
    pub fn task_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Task",
            id: id.into(),
        }
    }

    pub fn category_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Category",
            id: id.into(),
        }
    }
}

impl From<lancedb::Error> for TodoError {
    fn from(err: lancedb::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<arrow_schema::ArrowError> for TodoError {
    fn from(err: arrow_schema::ArrowError) -> Self {
        Self::Database(format!("Arrow error: {}", err))
    }
}

impl From<reqwest::Error> for TodoError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}
