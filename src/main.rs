use clap::Parser;

use sluglinker::cli::Cli;
use sluglinker::config::{get_config, init_config_from};
use sluglinker::interfaces::cli::run_cli_command;
use sluglinker::system::logging::init_logging;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_config_from(cli.config.as_deref());
    let config = get_config();

    // guard 需存活至进程结束，否则缓冲日志会丢失
    let log_guard = match init_logging(&config.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("{}", e.format_colored());
            None
        }
    };

    let result = run_cli_command(cli.command, config).await;
    drop(log_guard);

    if let Err(e) = result {
        eprintln!("{}", e.format_colored());
        std::process::exit(1);
    }
}
