//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (TopicStore) but are themselves
//! concrete structs, not traits.

mod topic_tree;

pub use topic_tree::TopicTreeController;
