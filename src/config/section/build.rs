//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! compiler = ["moon"]     # Command prefix; build arguments are appended
//! main = "app"            # Preferred main package (suffix of its relative path)
//! ```
//!
//! `compiler` may carry a wrapper, e.g. `["nix", "develop", "-c", "moon"]`.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Compiler invocation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Program followed by leading arguments.
    pub compiler: Vec<String>,

    /// Main-package hint used when several packages declare `is-main`.
    pub main: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            compiler: vec!["moon".to_string()],
            main: None,
        }
    }
}

impl BuildConfig {
    /// An empty command is an error; a program missing from PATH only warns,
    /// since the build reports it again with the spawn error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(program) = self.compiler.first() else {
            return Err(ConfigError::Validation(
                "`build.compiler` must name a program".into(),
            ));
        };

        if program.trim().is_empty() {
            return Err(ConfigError::Validation(
                "`build.compiler` program is empty".into(),
            ));
        }

        if which::which(program).is_err() {
            crate::log!("warning"; "compiler `{}` not found in PATH", program);
        }

        Ok(())
    }
}
