//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::config::ViewConfig;

/// Filter command arguments.
#[derive(Debug, Args)]
pub struct FilterCommand {
    /// JSON input file; reads stdin when omitted
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Path to keep (repeatable), e.g. `items[].id`
    #[arg(short, long = "include", value_name = "PATH")]
    pub includes: Vec<String>,

    /// Path to drop (repeatable); checked before includes
    #[arg(short, long = "exclude", value_name = "PATH")]
    pub excludes: Vec<String>,

    /// JSON pointer to drop (repeatable)
    #[arg(short = 'p', long = "exclude-pointer", value_name = "POINTER")]
    pub pointers: Vec<String>,
}

impl FilterCommand {
    /// Views given on the command line, if any.
    ///
    /// All flags form a single rules view, so every exclusion holds at once.
    #[must_use]
    pub fn views(&self) -> Vec<ViewConfig> {
        if self.includes.is_empty() && self.excludes.is_empty() && self.pointers.is_empty() {
            return Vec::new();
        }
        vec![ViewConfig::Rules {
            includes: self.includes.clone(),
            excludes: self.excludes.clone(),
            exclude_pointers: self.pointers.clone(),
        }]
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration file
    Validate {
        /// Path to configuration file (uses default if not specified)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
