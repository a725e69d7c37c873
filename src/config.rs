//! Configuration management for the file gateway
//!
//! Values come from built-in defaults, an optional `config.toml`, and
//! `FS_GATEWAY_*` environment variables, in increasing priority. The
//! `ALLOWED_DIRECTORIES` variable overrides `allowed_directories`.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::sandbox::{AllowedRoots, PathGuard};
use crate::storage::FileOps;

/// Complete gateway configuration
#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    /// IP address to bind the request listener
    pub bind_address: String,

    /// Port for the request listener; 0 picks a free port
    pub port: u16,

    /// Maximum concurrent connections
    pub max_clients: usize,

    /// Maximum length of one request line
    pub max_request_bytes: usize,

    /// Comma-separated allowed root directories.
    /// Defaults to the home and working directories when unset.
    #[serde(default)]
    pub allowed_directories: Option<String>,
}

impl GatewayConfig {
    /// Load configuration with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("bind_address", "127.0.0.1")?
            .set_default("port", 2121)?
            .set_default("max_clients", 10)?
            .set_default("max_request_bytes", 1024 * 1024)?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("FS_GATEWAY"))
            .set_override_option(
                "allowed_directories",
                std::env::var("ALLOWED_DIRECTORIES").ok(),
            )?
            .build()?;

        let config: GatewayConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_address cannot be empty".into()));
        }

        if self.max_clients == 0 {
            return Err(ConfigError::Invalid(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.max_request_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_request_bytes must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as socket address
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Build the allowlist, resolving relative entries against `cwd`
    pub fn allowed_roots(&self, home: Option<&std::path::Path>, cwd: &std::path::Path) -> AllowedRoots {
        AllowedRoots::from_list(self.allowed_directories.as_deref(), home, cwd)
    }

    /// Build the sandboxed file operations for this process.
    ///
    /// Home and working directories are read once here and fixed for the
    /// lifetime of the returned value.
    pub fn file_ops(&self) -> Result<FileOps, ConfigError> {
        let cwd: PathBuf = std::env::current_dir().map_err(ConfigError::WorkingDirectory)?;
        let home = dirs::home_dir();
        let roots = self.allowed_roots(home.as_deref(), &cwd);
        Ok(FileOps::new(PathGuard::new(roots, home, cwd)))
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 2121,
            max_clients: 10,
            max_request_bytes: 1024 * 1024,
            allowed_directories: None,
        }
    }
}
