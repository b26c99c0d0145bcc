//! Pipeline inputs and outcomes.

use std::fmt;
use std::sync::Arc;
use zeroize::Zeroizing;

use crate::config::WalletConfig;
use crate::pipeline::error::SendError;
use crate::wallet::types::DecryptionError;

/// Where the decryption password comes from.
#[derive(Clone)]
pub enum PasswordSource {
    /// Supplied with the request.
    Provided(Zeroizing<String>),
    /// Asked for on the terminal when decryption starts.
    Prompt,
}

impl PasswordSource {
    pub fn provided(password: impl Into<String>) -> Self {
        PasswordSource::Provided(Zeroizing::new(password.into()))
    }

    /// Obtain the password. `Prompt` may block on user input indefinitely.
    pub async fn resolve(&self) -> Result<Zeroizing<String>, DecryptionError> {
        match self {
            PasswordSource::Provided(password) => Ok(password.clone()),
            PasswordSource::Prompt => {
                tokio::task::spawn_blocking(|| rpassword::prompt_password("Password: "))
                    .await
                    .map_err(|e| DecryptionError::Password(e.to_string()))?
                    .map(Zeroizing::new)
                    .map_err(|e| DecryptionError::Password(e.to_string()))
            }
        }
    }
}

impl fmt::Debug for PasswordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordSource::Provided(_) => f.write_str("Provided(<redacted>)"),
            PasswordSource::Prompt => f.write_str("Prompt"),
        }
    }
}

/// One send intent. Built once per invocation and never mutated.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub to_address: String,
    /// Amount in sompi, as received from the caller.
    pub amount: String,
    pub password: PasswordSource,
    pub config: Arc<WalletConfig>,
}

/// Terminal result of one pipeline run.
#[derive(Debug)]
pub enum PipelineOutcome {
    Success { tx_ids: Vec<String> },
    Failure { error: SendError },
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Success { .. })
    }

    pub fn tx_ids(&self) -> &[String] {
        match self {
            PipelineOutcome::Success { tx_ids } => tx_ids,
            PipelineOutcome::Failure { .. } => &[],
        }
    }

    pub fn error(&self) -> Option<&SendError> {
        match self {
            PipelineOutcome::Success { .. } => None,
            PipelineOutcome::Failure { error } => Some(error),
        }
    }
}

impl From<Result<Vec<String>, SendError>> for PipelineOutcome {
    fn from(result: Result<Vec<String>, SendError>) -> Self {
        match result {
            Ok(tx_ids) => PipelineOutcome::Success { tx_ids },
            Err(error) => PipelineOutcome::Failure { error },
        }
    }
}
