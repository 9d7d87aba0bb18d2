//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod secret;
pub mod services;

pub use error::{ApplicationError, ApplicationResult, ErrorKind, Operation};
pub use secret::{secret_digest, verify_secret};
