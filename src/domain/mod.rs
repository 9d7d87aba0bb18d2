//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod projection;

pub use arena::{validate_title, TopicArena, TopicData, TopicNode};
pub use entities::*;
pub use error::DomainError;
pub use projection::{TopicView, TreeNodeConvert};
