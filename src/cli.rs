//! Command line interface

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::server;

#[derive(Debug, Parser)]
#[command(name = "photobooth", version, about = "Photobooth capture server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the booth server (default)
    Serve,
    /// Print the effective configuration as TOML
    CheckConfig,
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => server::run().await,
        Command::CheckConfig => check_config(),
    }
}

fn check_config() -> Result<()> {
    let mut config = server::load_config().context("Failed to load configuration")?;
    server::validate_config(&mut config)?;
    let rendered = toml::to_string_pretty(&config).context("Failed to serialize config")?;
    println!("{rendered}");
    Ok(())
}
