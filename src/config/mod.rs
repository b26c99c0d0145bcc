//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → ConfigOverrides::apply (command-line flags)
//!     → validation.rs (semantic checks)
//!     → WalletConfig (validated, immutable)
//!     → shared via Arc with the dispatcher and every pipeline run
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no subsystem writes to it
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Passed explicitly to the dispatcher; there is no process-wide instance

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_layered, ConfigError, ConfigOverrides};
pub use schema::{HttpConfig, Network, ObservabilityConfig, SendConfig, WalletConfig};
