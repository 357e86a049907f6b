//! Project configuration for `moonlit.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   └── dev        # [dev]
//! ├── error          # ConfigError
//! ├── util           # config / project root lookup
//! └── mod.rs         # ProjectConfig (this file)
//! ```
//!
//! The file is optional. Without it the project root is the nearest
//! directory holding `moon.mod.json` and every section takes its defaults.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{BuildConfig, DevConfig};

use util::find_upward;

use crate::cli::{Cli, Commands};
use crate::log;
use crate::module::MODULE_FILE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing moonlit.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Absolute path to the config file, set even when it does not exist
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root: directory of the config file or of `moon.mod.json`
    #[serde(skip)]
    pub root: PathBuf,

    /// Compiler invocation settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Development loop settings
    #[serde(default)]
    pub dev: DevConfig,
}

impl ProjectConfig {
    /// Load configuration for the given CLI invocation.
    ///
    /// Searches upward from cwd for the config file, then for `moon.mod.json`.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_upward(&cwd, &cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = path;
                config
            }
            None => {
                let root = find_upward(&cwd, Path::new(MODULE_FILE))
                    .and_then(|p| p.parent().map(Path::to_path_buf))
                    .unwrap_or_else(|| cwd.clone());
                crate::debug!("config"; "{} not found, using defaults", cli.config.display());
                Self {
                    config_path: root.join(&cli.config),
                    root,
                    ..Self::default()
                }
            }
        };

        config.root = crate::utils::path::normalize_path(&config.root);
        config.apply_cli(cli);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply CLI overrides on top of file values.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(main) = &cli.main {
            self.build.main = Some(main.clone());
        }

        if let Commands::Dev { interface, port } = &cli.command {
            Self::update_option(&mut self.dev.interface, interface.as_ref());
            Self::update_option(&mut self.dev.port, port.as_ref());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate all sections. Errors abort, warnings are only logged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build.validate()?;
        self.dev.validate()
    }
}

/// Parse config, panicking on unknown fields (catches typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ProjectConfig {
    let (parsed, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_str_invalid_toml() {
        let result = ProjectConfig::parse_with_ignored("[build\ncompiler = [\"moon\"]");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_project_config_default() {
        let config = ProjectConfig::default();

        assert_eq!(config.root, PathBuf::new());
        assert_eq!(config.build.compiler, vec!["moon".to_string()]);
        assert!(config.build.main.is_none());
        assert_eq!(config.dev.port, 5278);
        assert_eq!(config.dev.overlay_skip_lines, 1);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.compiler, vec!["moon".to_string()]);
        assert_eq!(config.dev.port, 5278);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[build]\nmain = \"app\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.build.main.as_deref(), Some("app"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let (_, ignored) = ProjectConfig::parse_with_ignored("[dev]\nport = 9000").unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = ProjectConfig::from_path(Path::new("/nonexistent/moonlit.toml"));
        assert!(matches!(result, Err(ConfigError::Io(..))));
    }

    #[test]
    fn test_cli_main_overrides_file() {
        let mut config = test_parse_config("[build]\nmain = \"app\"");
        let cli = Cli::parse_from(["moonlit", "--main", "cmd/web", "build"]);

        config.apply_cli(&cli);
        assert_eq!(config.build.main.as_deref(), Some("cmd/web"));
    }

    #[test]
    fn test_cli_dev_options_override_file() {
        let mut config = test_parse_config("[dev]\nport = 9000\ninterface = \"0.0.0.0\"");
        let cli = Cli::parse_from(["moonlit", "dev", "--port", "7000"]);

        config.apply_cli(&cli);
        assert_eq!(config.dev.port, 7000);
        assert_eq!(config.dev.interface.to_string(), "0.0.0.0");
    }

    #[test]
    fn test_dev_options_ignored_for_build() {
        let mut config = test_parse_config("[dev]\nport = 9000");
        let cli = Cli::parse_from(["moonlit", "build"]);

        config.apply_cli(&cli);
        assert_eq!(config.dev.port, 9000);
        assert!(config.build.main.is_none());
    }
}
