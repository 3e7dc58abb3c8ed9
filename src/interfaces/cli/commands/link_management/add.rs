//! Add link command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{CreateLinkRequest, LinkService};

pub async fn add_link(
    service: &LinkService,
    slug: Option<String>,
    original_url: String,
    description: Option<String>,
    tags: Vec<String>,
    suggest: bool,
) -> Result<(), CliError> {
    let generated = slug.as_deref().is_none_or(|s| s.trim().is_empty());

    let (description, tags) = if suggest && (description.is_none() || tags.is_empty()) {
        let metadata = service.suggest(&original_url).await;
        println!(
            "{} Suggested: {} [{}]",
            "ℹ".bold().blue(),
            metadata.description.dimmed(),
            metadata.tags.join(", ").dimmed()
        );
        (
            description.or(Some(metadata.description)),
            if tags.is_empty() { metadata.tags } else { tags },
        )
    } else {
        (description, tags)
    };

    let record = service.create(CreateLinkRequest {
        slug,
        original_url,
        description,
        tags,
    })?;

    if generated {
        println!(
            "{} Generated random slug: {}",
            "ℹ".bold().blue(),
            record.slug.magenta()
        );
    }

    println!(
        "{} Added link: {} -> {} {}",
        "✓".bold().green(),
        record.slug.cyan(),
        record.original_url.blue().underline(),
        format!("(id: {})", record.id).dimmed()
    );

    Ok(())
}
