//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the wallet
//! client. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration for the wallet client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WalletConfig {
    /// Settings consumed by the send pipeline.
    pub send: SendConfig,

    /// Local HTTP endpoint.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Network the wallet operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Devnet,
    Simnet,
}

impl Network {
    /// Human-readable address prefix for this network.
    pub fn address_prefix(&self) -> &'static str {
        match self {
            Network::Mainnet => "kaspa",
            Network::Testnet => "kaspatest",
            Network::Devnet => "kaspadev",
            Network::Simnet => "kaspasim",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Simnet => "simnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Send pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SendConfig {
    /// Network parameters used to read keys and sign.
    pub network: Network,

    /// Path to the keys file. Defaults to `~/.kaspawallet/<network>/keys.json`.
    pub keys_file: Option<PathBuf>,

    /// Wallet daemon address (e.g., "localhost:8082").
    pub daemon_address: String,

    /// Addresses to spend from. Empty means any wallet address.
    pub from_addresses: Vec<String>,

    /// Reuse an existing change address instead of deriving a new one.
    pub use_existing_change_address: bool,

    /// Deadline for each bounded daemon call, in milliseconds.
    pub daemon_timeout_ms: u64,

    /// Deadline for establishing the daemon connection, in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for SendConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            keys_file: None,
            daemon_address: "localhost:8082".to_string(),
            from_addresses: Vec::new(),
            use_existing_change_address: false,
            daemon_timeout_ms: 120_000,
            connect_timeout_ms: 5_000,
        }
    }
}

impl SendConfig {
    /// Resolved keys file location.
    pub fn keys_file_path(&self) -> PathBuf {
        match &self.keys_file {
            Some(path) => path.clone(),
            None => {
                let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
                home.join(".kaspawallet").join(self.network.name()).join("keys.json")
            }
        }
    }

    pub fn daemon_timeout(&self) -> Duration {
        Duration::from_millis(self.daemon_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Local HTTP endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Start the endpoint alongside every command.
    pub enabled: bool,

    /// Bind address (e.g., "127.0.0.1:16117").
    pub bind_address: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "127.0.0.1:16117".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
