//! Send pipeline error taxonomy.

use std::fmt;
use thiserror::Error;

use crate::wallet::types::{CustodyError, DecryptionError, KeyFileError, SignError};

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    LoadKeys,
    Connect,
    ParseAmount,
    Build,
    Decrypt,
    Sign,
    Broadcast,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::LoadKeys => "load_keys",
            Stage::Connect => "connect",
            Stage::ParseAmount => "parse_amount",
            Stage::Build => "build",
            Stage::Decrypt => "decrypt",
            Stage::Sign => "sign",
            Stage::Broadcast => "broadcast",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure of one send request.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("{0}")]
    KeyFile(#[from] KeyFileError),

    #[error("Cannot use 'send' command for multisig wallet without all of the keys")]
    IncompleteMultisig { public_keys: usize, mnemonics: usize },

    #[error("{0}")]
    Connection(#[source] CustodyError),

    #[error("invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("{0}")]
    Build(#[source] CustodyError),

    #[error("{0}")]
    Decryption(#[from] DecryptionError),

    #[error("failed to sign transaction {index}: {source}")]
    Signing {
        index: usize,
        #[source]
        source: SignError,
    },

    #[error("{0}")]
    Broadcast(#[source] CustodyError),
}

impl SendError {
    /// Stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            SendError::KeyFile(_) | SendError::IncompleteMultisig { .. } => Stage::LoadKeys,
            SendError::Connection(_) => Stage::Connect,
            SendError::InvalidAmount { .. } => Stage::ParseAmount,
            SendError::Build(_) => Stage::Build,
            SendError::Decryption(_) => Stage::Decrypt,
            SendError::Signing { .. } => Stage::Sign,
            SendError::Broadcast(_) => Stage::Broadcast,
        }
    }

    /// User-facing guidance, when the failure is a known common mistake.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            SendError::Decryption(e) => e.remediation(),
            _ => None,
        }
    }

    pub fn is_deadline_exceeded(&self) -> bool {
        match self {
            SendError::Build(e) | SendError::Broadcast(e) => e.is_deadline_exceeded(),
            _ => false,
        }
    }
}
