//! Moonlit - build orchestrator and live reload for MoonBit JS projects.

mod build;
mod cli;
mod config;
mod core;
mod logger;
mod module;
mod reload;
mod utils;
mod watch;

#[cfg(test)]
mod testutil;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ProjectConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = ProjectConfig::load(&cli)?;
    let mode = cli.command.build_mode();

    match &cli.command {
        Commands::Build => cli::build::build_project(&config, mode),
        Commands::Dev { .. } => cli::dev::run_dev(&config, mode),
        Commands::Packages => cli::packages::list_packages(&config),
    }
}
