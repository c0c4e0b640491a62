//! CLI command implementations
//!
//! `serve` boots in a fixed order: load config, initialise logging, build
//! the store and router, then run the tokio runtime until shutdown.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{self, LoggingConfig};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_json;

/// Configuration file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "./config-change-tracker.json";

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP bind and CORS settings
    #[serde(default)]
    pub server: HttpServerConfig,

    /// Log level, format and destination
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load the explicitly given file, or the default file if it exists,
    /// or fall back to built-in defaults.
    pub fn resolve(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if self.server.host.trim().is_empty() {
            return Err(CliError::config_error("server.host must not be empty"));
        }

        if self.server.port == 0 {
            return Err(CliError::config_error("server.port must be > 0"));
        }

        self.logging
            .validate()
            .map_err(|e| CliError::config_error(format!("logging: {}", e)))?;

        Ok(())
    }
}

/// Parse CLI args and run
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::CheckConfig { config } => check_config(config.as_deref()),
    }
}

/// Start the HTTP server.
///
/// 1. Load and validate configuration
/// 2. Initialise logging
/// 3. Build the server with a fresh in-memory store
/// 4. Run on a tokio runtime until Ctrl-C
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::resolve(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
        config.validate()?;
    }

    observability::init(&config.logging)?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    let server = HttpServer::with_config(config.server);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Validate configuration and print it as JSON
pub fn check_config(config_path: Option<&Path>) -> CliResult<()> {
    let config = Config::resolve(config_path)?;
    write_json(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::LogFormat;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let file = write_config("{}");
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.port, 5080);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"{
                "server": { "host": "127.0.0.1", "port": 8081, "cors_origins": ["http://localhost:3000"] },
                "logging": { "level": "debug", "format": "json", "file": "/tmp/tracker.log" }
            }"#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.socket_addr(), "127.0.0.1:8081");
        assert_eq!(config.server.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/tracker.log")));
    }

    #[test]
    fn test_zero_port_rejected() {
        let file = write_config(r#"{"server": {"port": 0}}"#);
        let err = Config::load(file.path()).unwrap_err();
        assert_eq!(err.code_str(), "CCT_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_invalid_level_rejected() {
        let file = write_config(r#"{"logging": {"level": "chatty"}}"#);
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_malformed_json_rejected() {
        let file = write_config("{ server: ");
        let err = Config::load(file.path()).unwrap_err();
        assert!(err.message().contains("Invalid config JSON"));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.json");
        assert!(Config::resolve(Some(missing.as_path())).is_err());
    }

    #[test]
    fn test_check_config_succeeds_for_valid_file() {
        let file = write_config(r#"{"server": {"port": 7000}}"#);
        assert!(check_config(Some(file.path())).is_ok());
    }
}
