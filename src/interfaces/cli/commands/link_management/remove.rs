//! Remove link command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::LinkService;

pub async fn remove_link(service: &LinkService, id: String) -> Result<(), CliError> {
    service.delete(&id)?;
    println!("{} Deleted link: {}", "✓".bold().green(), id.cyan());

    // 删除不会屏蔽基线中同 id 的记录
    if let Some(record) = service.load_all().await.into_iter().find(|r| r.id == id) {
        println!(
            "{} Baseline entry {} -> {} is visible again",
            "ℹ".bold().blue(),
            record.slug.cyan(),
            record.original_url.blue().underline()
        );
    }
    Ok(())
}
