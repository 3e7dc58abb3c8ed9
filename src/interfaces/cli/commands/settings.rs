//! Settings command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{LinkService, SettingsUpdate};

pub fn show_or_update_settings(
    service: &LinkService,
    base_url: Option<String>,
    analytics_id: Option<String>,
    suggestion_key: Option<String>,
) -> Result<(), CliError> {
    let changed = base_url.is_some() || analytics_id.is_some() || suggestion_key.is_some();

    let settings = if changed {
        let settings = service.update_settings(SettingsUpdate {
            custom_base_url: base_url,
            analytics_id,
            suggestion_api_key: suggestion_key,
        })?;
        println!("{} Settings saved", "✓".bold().green());
        settings
    } else {
        service.settings()
    };

    let unset = || "(not set)".dimmed().to_string();
    println!(
        "  {:<16} {}",
        "custom_base_url",
        settings
            .custom_base_url
            .as_deref()
            .map(|s| s.cyan().to_string())
            .unwrap_or_else(unset)
    );
    println!(
        "  {:<16} {}",
        "analytics_id",
        settings
            .analytics_id
            .as_deref()
            .map(|s| s.cyan().to_string())
            .unwrap_or_else(unset)
    );
    // 密钥不直接输出
    println!(
        "  {:<16} {}",
        "suggestion_key",
        if settings.suggestion_api_key.is_some() {
            "********".cyan().to_string()
        } else {
            unset()
        }
    );
    Ok(())
}
