//! Topic hierarchy with write-through XML persistence.
//!
//! - [`domain`]: the arena-backed topic tree, its invariants and the display
//!   projections built from it
//! - [`application`]: the [`TopicTreeController`](application::services::TopicTreeController)
//!   that validates, stages and persists every mutation
//! - [`infrastructure`]: the document store (XML file or in-memory)
//! - [`cli`]: the `topictree` command line front end

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
