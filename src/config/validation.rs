//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check source addresses belong to the configured network
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WalletConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::WalletConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &WalletConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let send = &config.send;

    if send.daemon_address.trim().is_empty() {
        errors.push(ValidationError::new("send.daemon_address", "must not be empty"));
    }

    if send.daemon_timeout_ms == 0 {
        errors.push(ValidationError::new("send.daemon_timeout_ms", "must be greater than 0"));
    }

    if send.connect_timeout_ms == 0 {
        errors.push(ValidationError::new("send.connect_timeout_ms", "must be greater than 0"));
    }

    let prefix = send.network.address_prefix();
    for address in &send.from_addresses {
        match address.split_once(':') {
            Some((p, rest)) if p == prefix && !rest.is_empty() => {}
            _ => errors.push(ValidationError::new(
                "send.from_addresses",
                format!("'{}' is not a {} address", address, send.network),
            )),
        }
    }

    if config.http.enabled && config.http.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "http.bind_address",
            format!("'{}' is not a socket address", config.http.bind_address),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
