//! CLI interface module
//!
//! This module provides command-line interface functionality for sluglinker.

pub mod commands;

use std::fmt;
use std::sync::Arc;

use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::errors::SluglinkerError;
use crate::services::{LinkService, source_from_config};
use crate::storage::StorageFactory;
use commands::{
    UpdateArgs, add_link, config_generate, export_links, list_links, remove_link, resolve_address,
    show_or_update_settings, update_link,
};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<SluglinkerError> for CliError {
    fn from(err: SluglinkerError) -> Self {
        match err {
            SluglinkerError::Storage(_) | SluglinkerError::Serialization(_) => {
                CliError::StorageError(err.to_string())
            }
            e if e.is_validation() => CliError::ParseError(e.to_string()),
            e => CliError::CommandError(e.to_string()),
        }
    }
}

/// Build the link service the commands operate on
fn build_service(config: &StaticConfig) -> LinkService {
    let store = StorageFactory::create(config);
    let baseline = source_from_config(&config.baseline);
    LinkService::new(store, baseline, config.baseline.timeout())
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands, config: Arc<StaticConfig>) -> Result<(), CliError> {
    match cmd {
        // Generate doesn't need storage
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force).await,

        Commands::Resolve { address } => {
            resolve_address(&build_service(&config), &config, address).await
        }

        Commands::Add {
            args,
            description,
            tags,
            suggest,
        } => {
            let (slug, url) = Commands::parse_add_args(&args);
            add_link(&build_service(&config), slug, url, description, tags, suggest).await
        }

        Commands::Edit {
            id,
            slug,
            url,
            description,
            tags,
            clear_tags,
        } => {
            let args = UpdateArgs {
                slug,
                url,
                description,
                tags: if clear_tags { Some(Vec::new()) } else { tags },
            };
            update_link(&build_service(&config), id, args).await
        }

        Commands::Remove { id } => remove_link(&build_service(&config), id).await,

        Commands::List => list_links(&build_service(&config)).await,

        Commands::Export { file_path } => export_links(&build_service(&config), file_path).await,

        Commands::Settings {
            base_url,
            analytics_id,
            suggestion_key,
        } => show_or_update_settings(
            &build_service(&config),
            base_url,
            analytics_id,
            suggestion_key,
        ),
    }
}
