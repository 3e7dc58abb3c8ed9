//! Edit link command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{LinkService, UpdateLinkRequest};

/// Fields given on the command line; `None` keeps the current value.
#[derive(Debug, Default)]
pub struct UpdateArgs {
    pub slug: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

pub async fn update_link(
    service: &LinkService,
    id: String,
    args: UpdateArgs,
) -> Result<(), CliError> {
    if args.slug.is_none()
        && args.url.is_none()
        && args.description.is_none()
        && args.tags.is_none()
    {
        return Err(CliError::ParseError(
            "Nothing to update, pass at least one of --slug, --url, --description, --tag"
                .to_string(),
        ));
    }

    let record = service
        .update(
            &id,
            UpdateLinkRequest {
                slug: args.slug,
                original_url: args.url,
                description: args.description,
                tags: args.tags,
            },
        )
        .await?;

    println!(
        "{} Updated link: {} -> {}",
        "✓".bold().green(),
        record.slug.cyan(),
        record.original_url.blue().underline()
    );
    Ok(())
}
