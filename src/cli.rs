//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for sluglinker using clap's derive macros.

use clap::{Parser, Subcommand};

/// Sluglinker - resolve short slugs to destination URLs
#[derive(Parser, Debug)]
#[command(name = "sluglinker")]
#[command(version)]
#[command(
    about = "Resolve short slugs against a local link store merged with a shipped baseline",
    long_about = None
)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the redirect sequence for an address, e.g. "https://go.example/#docs"
    ///
    /// An address without a fragment shows the dashboard (merged link list).
    Resolve {
        address: String,
    },

    /// Add a short link
    ///
    /// Usage: add [SLUG] <URL>
    /// - If only URL provided, generates a random slug
    Add {
        /// Positional args: [slug] <url>
        #[arg(required = true, num_args = 1..=2)]
        args: Vec<String>,

        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Tag (repeatable)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Fill missing description/tags from the suggestion service
        #[arg(long)]
        suggest: bool,
    },

    /// Edit a link by id
    Edit {
        id: String,

        #[arg(long)]
        slug: Option<String>,

        #[arg(long)]
        url: Option<String>,

        /// New description ("" clears it)
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Replace tags (repeatable)
        #[arg(long = "tag", short = 't')]
        tags: Option<Vec<String>>,

        /// Remove all tags
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,
    },

    /// Remove a link from the local store by id
    Remove {
        id: String,
    },

    /// List the merged view (baseline + local)
    List,

    /// Export the merged view as a baseline JSON file
    Export {
        /// Output file path (default: stdout)
        file_path: Option<String>,
    },

    /// Show or change settings
    Settings {
        /// Custom base URL for share links ("" clears it)
        #[arg(long)]
        base_url: Option<String>,

        #[arg(long)]
        analytics_id: Option<String>,

        #[arg(long)]
        suggestion_key: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite without asking
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    /// Split `add` positional args into (slug, url)
    pub fn parse_add_args(args: &[String]) -> (Option<String>, String) {
        match args {
            [url] => (None, url.clone()),
            [slug, url, ..] => (Some(slug.clone()), url.clone()),
            [] => (None, String::new()),
        }
    }
}
