//! Procedure dispatch.
//!
//! # Responsibilities
//! - Resolve the requested procedure
//! - Build a `PipelineRequest` from parameters plus the injected configuration
//! - Translate the pipeline outcome into a `ResultEnvelope`

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::config::WalletConfig;
use crate::http::response::ResultEnvelope;
use crate::observability::metrics;
use crate::pipeline::{PasswordSource, PipelineOutcome, PipelineRequest, SendPipeline};
use crate::routing::matcher::Procedure;

/// Query parameter carrying the destination address.
pub const PARAM_ADDRESS: &str = "wallet";
/// Query parameter carrying the amount in sompi.
pub const PARAM_AMOUNT: &str = "amount";
/// Query parameter carrying the keys file password.
pub const PARAM_PASSWORD: &str = "password";

/// Routes procedures to the send pipeline.
#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<WalletConfig>,
    pipeline: SendPipeline,
}

impl Dispatcher {
    pub fn new(config: Arc<WalletConfig>, pipeline: SendPipeline) -> Self {
        Self { config, pipeline }
    }

    /// Handle a path-addressed request and report through the envelope.
    pub async fn dispatch(&self, path: &str, params: &HashMap<String, String>) -> ResultEnvelope {
        let procedure = Procedure::from_path(path);

        let envelope = match &procedure {
            Procedure::SendMoney => match send_params(params) {
                Ok((to_address, amount, password)) => {
                    ResultEnvelope::from(self.send(to_address, amount, password).await)
                }
                Err(message) => ResultEnvelope::failure(message),
            },
            Procedure::Unknown(path) => {
                tracing::debug!(path = %path, "No procedure for path");
                ResultEnvelope::failure(format!("no procedure found for path {}", path))
            }
        };

        metrics::record_http_request(procedure.label(), envelope.result.code());
        envelope
    }

    /// Run a sub-command by name.
    pub async fn command(
        &self,
        name: &str,
        to_address: String,
        amount: String,
        password: PasswordSource,
    ) -> Result<PipelineOutcome, UnknownCommand> {
        match Procedure::from_command(name) {
            Procedure::SendMoney => Ok(self.send(to_address, amount, password).await),
            Procedure::Unknown(name) => Err(UnknownCommand(name)),
        }
    }

    /// Run one send with this dispatcher's configuration.
    pub async fn send(&self, to_address: String, amount: String, password: PasswordSource) -> PipelineOutcome {
        let request = PipelineRequest {
            to_address,
            amount,
            password,
            config: Arc::clone(&self.config),
        };
        self.pipeline.execute(request).await
    }
}

/// Sub-command with no matching procedure.
#[derive(Debug, Error)]
#[error("no procedure found for command {0}")]
pub struct UnknownCommand(pub String);

/// Text printed by the command surface after a successful send.
pub fn command_report(tx_ids: &[String]) -> String {
    let mut report = String::from("Transactions were sent successfully\nTransaction ID(s): \n");
    for tx_id in tx_ids {
        report.push('\t');
        report.push_str(tx_id);
        report.push('\n');
    }
    report
}

fn send_params(params: &HashMap<String, String>) -> Result<(String, String, PasswordSource), String> {
    let required = |name: &str| {
        params
            .get(name)
            .cloned()
            .ok_or_else(|| format!("missing parameter '{}'", name))
    };
    let to_address = required(PARAM_ADDRESS)?;
    let amount = required(PARAM_AMOUNT)?;
    let password = required(PARAM_PASSWORD)?;
    Ok((to_address, amount, PasswordSource::provided(password)))
}
