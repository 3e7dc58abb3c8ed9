//! Resolve command
//!
//! Runs one redirect sequence for an address and reports the terminal state.
//! Navigation is printed instead of performed.

use std::sync::Arc;

use colored::Colorize;

use super::link_management::format_link_line;
use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;
use crate::services::{
    AddressContext, LinkService, Navigator, RedirectSequencer, SequenceState, SequencerOptions,
    TracingAnalytics, source_from_config,
};

/// Prints the destination of a redirect on stdout.
pub struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn replace(&self, url: &str) {
        println!("{}", url);
    }
}

pub async fn resolve_address(
    service: &LinkService,
    config: &StaticConfig,
    address: String,
) -> Result<(), CliError> {
    let store = service.store().clone();
    let settings = store.load_settings();
    let options = SequencerOptions::from_config(config);
    let delimiter = options.fragment_delimiter;

    let sequencer = RedirectSequencer::new(
        store,
        source_from_config(&config.baseline),
        Arc::new(StdoutNavigator),
    )
    .with_analytics(Arc::new(TracingAnalytics::new(settings.analytics_id)))
    .with_options(options);

    match sequencer.run(&address).await {
        SequenceState::Redirecting { record, .. } => {
            eprintln!(
                "{} {} -> {}",
                "→".bold().green(),
                record.slug.cyan(),
                record.original_url.blue().underline()
            );
            Ok(())
        }
        SequenceState::NotFound { fragment } => Err(CliError::CommandError(format!(
            "No link matches '{}'",
            fragment
        ))),
        SequenceState::Dashboard(view) => {
            let context = AddressContext::parse(&address, delimiter);
            println!("{}", "Dashboard".bold().green());
            let base = view
                .settings
                .custom_base_url
                .as_deref()
                .or(view.base_url.as_deref());
            if let Some(base) = base {
                println!("  {} {}", "Base URL:".dimmed(), base.blue());
            }
            println!();
            for link in view.links.iter() {
                println!("  {}", format_link_line(link));
                if let Some(short) = context.short_url(&view.settings, &link.slug) {
                    println!("    {}", short.dimmed());
                }
            }
            println!();
            println!(
                "{} Total {} links",
                "ℹ".bold().blue(),
                view.links.len().to_string().green()
            );
            Ok(())
        }
        SequenceState::Bootstrap => Err(CliError::CommandError(
            "Sequence ended without a terminal state".to_string(),
        )),
    }
}
