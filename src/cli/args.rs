//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::core::BuildMode;

/// MoonBit JS build orchestrator with browser live reload
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: moonlit.toml)
    #[arg(short = 'C', long, global = true, default_value = "moonlit.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Preferred main package when several declare `is-main` (path suffix)
    #[arg(short, long, global = true)]
    pub main: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Release build of the main package, staged as `main.js`
    #[command(visible_alias = "b")]
    Build,

    /// Debug build, then rebuild on change and notify browsers
    #[command(visible_alias = "d")]
    Dev {
        /// Network interface for the notification server (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<IpAddr>,

        /// Port number for the notification server
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List discovered packages
    #[command(visible_alias = "p")]
    Packages,
}

impl Commands {
    /// Build mode used by the command.
    pub const fn build_mode(&self) -> BuildMode {
        match self {
            Self::Build => BuildMode::Release,
            Self::Dev { .. } | Self::Packages => BuildMode::Debug,
        }
    }
}
