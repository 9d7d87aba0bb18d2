//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the topic tree invariants.
/// These are independent of persistence concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("topic not found: {title:?}")]
    NodeNotFound { title: String },

    #[error("topic {title:?} already exists under {}", parent_label(.parent))]
    TitleCollision {
        title: String,
        /// Parent of the existing topic, `None` for the root
        parent: Option<String>,
    },

    #[error("invalid topic title: {title:?}")]
    InvalidTitle { title: String },

    #[error("cannot move {title:?} beneath itself (target {target:?})")]
    InvalidMove { title: String, target: String },
}

impl DomainError {
    pub(crate) fn not_found(title: &str) -> Self {
        Self::NodeNotFound {
            title: title.to_string(),
        }
    }

    /// The title the caller passed in that caused the failure.
    pub fn title(&self) -> &str {
        match self {
            Self::NodeNotFound { title }
            | Self::TitleCollision { title, .. }
            | Self::InvalidTitle { title }
            | Self::InvalidMove { title, .. } => title,
        }
    }
}

fn parent_label(parent: &Option<String>) -> String {
    match parent {
        Some(title) => format!("{title:?}"),
        None => "the root".to_string(),
    }
}
