//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements the persistence boundary and wires up services.

pub mod di;
pub mod error;
pub mod traits;
pub mod xml;

pub use error::{InfraError, InfraResult};
