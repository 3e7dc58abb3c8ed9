//! List links command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::LinkService;
use crate::storage::LinkRecord;

/// One display line for a record
pub fn format_link_line(link: &LinkRecord) -> String {
    let mut info_parts = vec![format!(
        "{} -> {}",
        link.slug.cyan(),
        link.original_url.blue().underline()
    )];

    if let Some(description) = &link.description {
        info_parts.push(format!("\"{}\"", description).italic().to_string());
    }

    if let Some(tags) = link.tags.as_ref().filter(|t| !t.is_empty()) {
        info_parts.push(format!("[{}]", tags.join(", ")).dimmed().to_string());
    }

    if link.clicks > 0 {
        info_parts.push(
            format!("(clicks: {})", link.clicks)
                .dimmed()
                .cyan()
                .to_string(),
        );
    }

    info_parts.push(
        format!("{} {}", link.created_at_display(), link.id)
            .dimmed()
            .to_string(),
    );

    info_parts.join(" ")
}

pub async fn list_links(service: &LinkService) -> Result<(), CliError> {
    let links = service.load_all().await;

    if links.is_empty() {
        println!("{} No links found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Link list:".bold().green());
    println!();
    for link in &links {
        println!("  {}", format_link_line(link));
    }
    println!();
    println!(
        "{} Total {} links",
        "ℹ".bold().blue(),
        links.len().to_string().green()
    );
    Ok(())
}
