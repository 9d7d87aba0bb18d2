//! Infrastructure-level errors (persistence and other I/O concerns)

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the backing document store.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed topic document {}: {message}", path.display())]
    Xml { path: PathBuf, message: String },
}

impl InfraError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn xml(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Xml {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
