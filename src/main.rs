use anyhow::Result;
use clap::Parser;
use colored::*;
use tracing_subscriber::EnvFilter;

use occ_swap::application::{Cli, CommandExecutor, Context};
use occ_swap::shared::errors::SwapError;

async fn run(cli: Cli) -> Result<()> {
    let context = Context::from_cli(&cli)?;
    CommandExecutor::execute(cli.command, &context).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red(), e);
        if let Some(swap_error) = e.downcast_ref::<SwapError>() {
            for hint in swap_error.hints() {
                eprintln!("{}", hint.yellow());
            }
        }
        std::process::exit(1);
    }
}
