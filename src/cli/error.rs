//! CLI-level errors (wrap application and infrastructure errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::application::{ApplicationError, ErrorKind};
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("topic document already exists: {} (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Unauthorized(_) => crate::exitcode::NOPERM,
            CliError::AlreadyExists(_) => crate::exitcode::CANTCREAT,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Xml { .. } => crate::exitcode::DATAERR,
            },
            CliError::Application(e) => match e.kind() {
                ErrorKind::NodeNotFound => crate::exitcode::NOINPUT,
                ErrorKind::TitleCollision | ErrorKind::InvalidTitle | ErrorKind::InvalidMove => {
                    crate::exitcode::DATAERR
                }
                ErrorKind::PersistenceFailure => match e {
                    ApplicationError::Persistence {
                        source: InfraError::Xml { .. },
                        ..
                    } => crate::exitcode::DATAERR,
                    _ => crate::exitcode::IOERR,
                },
                ErrorKind::Config => crate::exitcode::CONFIG,
            },
        }
    }
}
