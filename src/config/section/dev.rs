//! `[dev]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [dev]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 5278                 # WebSocket notification port
//! overlay_skip_lines = 1      # Leading compiler output lines hidden from the overlay
//! ```
//!
//! If `port` is taken, the next free port among the following nine is used.

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Development loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// WebSocket port number.
    pub port: u16,

    /// Number of leading lines dropped from compiler output before it is
    /// shown in the error overlay.
    pub overlay_skip_lines: usize,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5278,
            overlay_skip_lines: 1,
        }
    }
}

impl DevConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Validation("`dev.port` must not be 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_dev_config() {
        let config = test_parse_config(
            "[dev]\ninterface = \"0.0.0.0\"\nport = 8080\noverlay_skip_lines = 0",
        );

        assert_eq!(config.dev.interface, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.dev.port, 8080);
        assert_eq!(config.dev.overlay_skip_lines, 0);
    }

    #[test]
    fn test_dev_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.dev.interface, IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)));
        assert_eq!(config.dev.port, 5278);
        assert_eq!(config.dev.overlay_skip_lines, 1);
    }

    #[test]
    fn test_dev_config_ipv6() {
        let config = test_parse_config("[dev]\ninterface = \"::1\"");
        assert_eq!(config.dev.interface, IpAddr::V6(Ipv6Addr::LOCALHOST));
    }

    #[test]
    fn test_dev_config_partial_override() {
        let config = test_parse_config("[dev]\nport = 3000");

        assert_eq!(config.dev.port, 3000);
        assert_eq!(config.dev.interface, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.dev.overlay_skip_lines, 1);
    }

    #[test]
    fn test_port_zero_rejected() {
        let config = test_parse_config("[dev]\nport = 0");
        assert!(config.dev.validate().is_err());
    }
}
