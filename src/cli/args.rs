//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::ContentKind;

/// Topic hierarchy manager: browse, search and edit the topic tree
#[derive(Parser, Debug)]
#[command(name = "topictree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Topic document (overrides `data_file` from the settings)
    #[arg(short, long, global = true, env = "TOPICTREE_FILE", value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty topic document
    Init {
        /// Title of the root
        #[arg(long)]
        title: Option<String>,
        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },

    /// Show the whole topic tree
    Tree {
        /// Show collapsed branches as well
        #[arg(short, long)]
        all: bool,
    },

    /// Show only branches whose titles contain KEY (case-insensitive)
    Search {
        /// Search key; empty matches everything
        key: String,
    },

    /// List direct children of a topic
    Children {
        /// Parent topic (root if omitted)
        parent: Option<String>,
    },

    /// Add a topic
    Add {
        /// Title of the new topic
        title: String,
        /// Parent topic (root if omitted)
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Rename a topic
    Rename {
        /// Current title
        old: String,
        /// New title
        new: String,
    },

    /// Remove a topic with all of its subtopics
    Remove {
        /// Topic to remove
        title: String,
        /// Removal secret (prompted for when required and omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Move a topic (with its subtopics) under another parent
    Move {
        /// Topic to move
        title: String,
        /// New parent (root if omitted)
        #[arg(long)]
        to: Option<String>,
    },

    /// Attach a content reference to a topic
    Attach {
        /// Topic to attach to
        title: String,
        /// Content kind: geogebra, image or text
        kind: ContentKind,
        /// Path or identifier of the content
        source: String,
        /// Short description
        #[arg(long)]
        description: Option<String>,
    },

    /// List the contents attached to a topic
    Contents {
        /// Topic
        title: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
    /// Print the digest to use as `removal_secret`
    HashSecret {
        /// Secret to hash
        secret: String,
    },
}
