//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::{Network, WalletConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a configuration document without validating it.
///
/// Callers apply command-line overrides before running [`validate_config`].
pub fn parse_config(content: &str) -> Result<WalletConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Read and parse a TOML file without validating it.
pub fn load_config(path: &Path) -> Result<WalletConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub network: Option<Network>,
    pub keys_file: Option<PathBuf>,
    pub daemon_address: Option<String>,
    pub disable_http: bool,
    pub from_addresses: Vec<String>,
    pub use_existing_change_address: bool,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut WalletConfig) {
        if let Some(network) = self.network {
            config.send.network = network;
        }
        if let Some(keys_file) = &self.keys_file {
            config.send.keys_file = Some(keys_file.clone());
        }
        if let Some(daemon_address) = &self.daemon_address {
            config.send.daemon_address = daemon_address.clone();
        }
        if self.disable_http {
            config.http.enabled = false;
        }
        if !self.from_addresses.is_empty() {
            config.send.from_addresses = self.from_addresses.clone();
        }
        if self.use_existing_change_address {
            config.send.use_existing_change_address = true;
        }
    }
}

/// Load the file (or defaults), apply `overrides`, then validate the merged result once.
pub fn load_layered(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<WalletConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => parse_config("")?,
    };
    overrides.apply(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    if let Some(path) = path {
        tracing::debug!(path = %path.display(), network = %config.send.network, "Configuration file loaded");
    }
    Ok(config)
}
