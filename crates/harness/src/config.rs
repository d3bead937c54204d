//! Harness configuration.
//!
//! Supports programmatic construction, environment variables and command line
//! flags through the same [`HarnessConfig`] type.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CRUD_HARNESS_PORT` | 0 | Mock server port (0 = OS-assigned) |
//! | `CRUD_HARNESS_HOST` | 127.0.0.1 | Host to bind |
//! | `CRUD_HARNESS_LOG_LEVEL` | info | Log level |
//! | `CRUD_HARNESS_FIXTURES_DIR` | bundled `testdata/` | Fixture directory |
//! | `CRUD_HARNESS_REQUEST_TIMEOUT` | 30 | Client timeout (seconds) |
//! | `CRUD_HARNESS_JSON_REPORT` | false | Print the summary as JSON |
//!
//! # Example
//!
//! ```rust
//! use crud_harness::HarnessConfig;
//!
//! // Bind the mock server to the historical fixed port
//! let config = HarnessConfig::legacy();
//! assert_eq!(config.socket_addr(), "127.0.0.1:8080");
//!
//! // Or let the OS pick a port
//! let config = HarnessConfig {
//!     request_timeout: 10,
//!     ..Default::default()
//! };
//! assert_eq!(config.port, 0);
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{HarnessError, HarnessResult};
use crate::scenario::Scenario;

/// Port the mock server historically listened on.
pub const LEGACY_PORT: u16 = 8080;

/// Configuration for a harness run.
#[derive(Debug, Clone, Parser)]
#[command(name = "crud-harness")]
#[command(about = "Runs the users CRUD scenarios against a local mock server")]
pub struct HarnessConfig {
    /// Port for the mock server (0 lets the OS choose).
    #[arg(short, long, env = "CRUD_HARNESS_PORT", default_value = "0")]
    pub port: u16,

    /// Host address to bind the mock server to.
    #[arg(long, env = "CRUD_HARNESS_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "CRUD_HARNESS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Directory holding the JSON fixtures. Defaults to the bundled set.
    #[arg(long, env = "CRUD_HARNESS_FIXTURES_DIR")]
    pub fixtures_dir: Option<PathBuf>,

    /// HTTP client timeout in seconds.
    #[arg(long, env = "CRUD_HARNESS_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Scenario to run (get, create, update, delete). Repeat to select
    /// several; all run when omitted.
    #[arg(long = "scenario")]
    pub scenarios: Vec<String>,

    /// Print the run summary as JSON instead of text.
    #[arg(long, env = "CRUD_HARNESS_JSON_REPORT", default_value = "false")]
    pub json_report: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            port: 0,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            fixtures_dir: None,
            request_timeout: 30,
            scenarios: Vec::new(),
            json_report: false,
        }
    }
}

impl HarnessConfig {
    /// Creates a configuration from environment variables, falling back to
    /// defaults when they do not parse.
    pub fn from_env() -> Self {
        Self::try_parse_from(["crud-harness"]).unwrap_or_default()
    }

    /// Configuration bound to the fixed legacy port.
    pub fn legacy() -> Self {
        Self {
            port: LEGACY_PORT,
            ..Default::default()
        }
    }

    /// Creates a configuration suitable for tests: OS-assigned port and a
    /// short client timeout.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            fixtures_dir: None,
            request_timeout: 5,
            scenarios: Vec::new(),
            json_report: false,
        }
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Client timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.host.trim().is_empty() {
            errors.push("Host cannot be empty".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        for name in &self.scenarios {
            if Scenario::by_name(name).is_none() {
                errors.push(format!(
                    "Unknown scenario '{}' (expected one of: {})",
                    name,
                    Scenario::NAMES.join(", ")
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Like [`validate`](Self::validate), folding every problem into a single
    /// [`HarnessError::Config`].
    pub fn validated(&self) -> HarnessResult<()> {
        self.validate()
            .map_err(|errors| HarnessError::Config(errors.join("; ")))
    }

    /// Scenarios selected by this configuration, in declaration order.
    pub fn selected_scenarios(&self) -> Vec<Scenario> {
        Scenario::crud()
            .into_iter()
            .filter(|s| self.scenarios.is_empty() || self.scenarios.iter().any(|n| n == s.name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HarnessConfig::default();
        assert_eq!(config.port, 0);
        assert_eq!(config.host, "127.0.0.1");
        assert!(config.fixtures_dir.is_none());
    }

    #[test]
    fn test_legacy_port() {
        let config = HarnessConfig::legacy();
        assert_eq!(config.port, 8080);
        assert_eq!(config.socket_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_validate_valid() {
        assert!(HarnessConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = HarnessConfig {
            request_timeout: 0,
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("timeout")));
    }

    #[test]
    fn test_validate_unknown_scenario() {
        let config = HarnessConfig {
            scenarios: vec!["patch".to_string()],
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors[0].contains("patch"));
    }

    #[test]
    fn test_validated_reports_config_error() {
        assert!(HarnessConfig::default().validated().is_ok());

        let config = HarnessConfig {
            host: " ".to_string(),
            request_timeout: 0,
            ..Default::default()
        };
        let err = config.validated().unwrap_err();
        assert!(err.is_fatal());
        match err {
            HarnessError::Config(message) => {
                assert!(message.contains("Host cannot be empty"));
                assert!(message.contains("Request timeout cannot be 0"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_flags() {
        let config = HarnessConfig::try_parse_from([
            "crud-harness",
            "--port",
            "9090",
            "--scenario",
            "get",
            "--scenario",
            "delete",
        ])
        .unwrap();
        assert_eq!(config.port, 9090);
        let names: Vec<_> = config.selected_scenarios().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["get", "delete"]);
    }

    #[test]
    fn test_all_scenarios_selected_by_default() {
        assert_eq!(HarnessConfig::for_testing().selected_scenarios().len(), 4);
    }
}
