//! Application-level errors (wrap domain and persistence errors)

use std::fmt;

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// Controller operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Children,
    Add,
    Rename,
    Remove,
    Move,
    Attach,
    Contents,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Load => "load topics",
            Self::Children => "list children",
            Self::Add => "add topic",
            Self::Rename => "rename topic",
            Self::Remove => "remove topic",
            Self::Move => "move topic",
            Self::Attach => "attach content",
            Self::Contents => "list contents",
        };
        f.write_str(name)
    }
}

/// Coarse classification for callers that only need to branch on the
/// failure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NodeNotFound,
    TitleCollision,
    InvalidTitle,
    InvalidMove,
    PersistenceFailure,
    Config,
}

/// Application errors wrap domain errors and add the failing operation.
#[derive(Error, Debug)]
pub enum ApplicationError {
    /// The request violated a tree invariant; nothing was changed.
    #[error("{operation}: {source}")]
    Rejected {
        operation: Operation,
        #[source]
        source: DomainError,
    },

    /// The document could not be read or written; the in-memory tree is
    /// unchanged.
    #[error("{operation}{}: {source}", quoted_title(.title))]
    Persistence {
        operation: Operation,
        /// Topic the failed mutation was about; `None` when loading
        title: Option<String>,
        #[source]
        source: InfraError,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    pub fn rejected(operation: Operation, source: DomainError) -> Self {
        Self::Rejected { operation, source }
    }

    pub fn persistence(operation: Operation, title: Option<String>, source: InfraError) -> Self {
        Self::Persistence {
            operation,
            title,
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Rejected { source, .. } => match source {
                DomainError::NodeNotFound { .. } => ErrorKind::NodeNotFound,
                DomainError::TitleCollision { .. } => ErrorKind::TitleCollision,
                DomainError::InvalidTitle { .. } => ErrorKind::InvalidTitle,
                DomainError::InvalidMove { .. } => ErrorKind::InvalidMove,
            },
            Self::Persistence { .. } => ErrorKind::PersistenceFailure,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Rejected { operation, .. } | Self::Persistence { operation, .. } => {
                Some(*operation)
            }
            Self::Config { .. } => None,
        }
    }

    /// Offending title, if the error is about one.
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Rejected { source, .. } => Some(source.title()),
            Self::Persistence { title, .. } => title.as_deref(),
            Self::Config { .. } => None,
        }
    }
}

fn quoted_title(title: &Option<String>) -> String {
    title
        .as_deref()
        .map(|title| format!(" {title:?}"))
        .unwrap_or_default()
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
