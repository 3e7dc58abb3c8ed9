//! Export links command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::LinkService;

/// Write the merged view as a baseline file, or to stdout without a path.
pub async fn export_links(
    service: &LinkService,
    file_path: Option<String>,
) -> Result<(), CliError> {
    let json = service.export().await?;

    let Some(path) = file_path else {
        println!("{}", json);
        return Ok(());
    };

    tokio::fs::write(&path, json.as_bytes())
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to write '{}': {}", path, e)))?;

    println!(
        "{} Exported links to: {}",
        "✓".bold().green(),
        path.cyan()
    );
    Ok(())
}
