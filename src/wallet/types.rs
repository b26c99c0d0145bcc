//! Wallet-side types and error definitions.

use std::time::Duration;
use thiserror::Error;
use zeroize::Zeroizing;

/// Opaque serialized transaction payload.
pub type TxBlob = Vec<u8>;

/// Decrypted mnemonics, wiped from memory on drop.
pub type Mnemonics = Zeroizing<Vec<String>>;

/// Parameters for asking the daemon to construct unsigned transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUnsignedTransactions {
    pub from: Vec<String>,
    pub address: String,
    pub amount: u64,
    pub is_send_all: bool,
    pub use_existing_change_address: bool,
}

/// Errors reading or parsing the keys file.
#[derive(Debug, Error)]
pub enum KeyFileError {
    /// File could not be read.
    #[error("failed to read keys file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File contents are not a valid keys document.
    #[error("failed to parse keys file {path}: {reason}")]
    Parse { path: String, reason: String },

    /// Keys file belongs to a different network.
    #[error("keys file is for {actual}, expected {expected}")]
    NetworkMismatch { expected: String, actual: String },

    /// Keys file schema is newer or older than supported.
    #[error("unsupported keys file version {0}")]
    UnsupportedVersion(u8),

    /// Sealing a mnemonic failed while creating a keys file.
    #[error("failed to encrypt mnemonic: {0}")]
    Encryption(String),
}

/// Errors decrypting mnemonics.
#[derive(Debug, Error)]
pub enum DecryptionError {
    /// AEAD tag check failed: wrong password or a different keys file.
    #[error("password decryption failed: message authentication failed")]
    AuthenticationFailed,

    /// Ciphertext, nonce or salt are malformed.
    #[error("encrypted mnemonic is corrupted: {0}")]
    Corrupted(String),

    /// Password could not be obtained.
    #[error("failed to read password: {0}")]
    Password(String),
}

impl DecryptionError {
    /// Guidance shown to the user for common mistakes.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            DecryptionError::AuthenticationFailed => Some(
                "Sometimes this is a result of not specifying the same keys file used by the wallet daemon process.",
            ),
            _ => None,
        }
    }
}

/// Errors talking to the wallet daemon.
#[derive(Debug, Error)]
pub enum CustodyError {
    /// Daemon could not be reached.
    #[error("failed to connect to wallet daemon at {address}: {reason}")]
    Unreachable { address: String, reason: String },

    /// Bounded call did not finish in time.
    #[error("{operation} deadline exceeded after {after:?}")]
    DeadlineExceeded {
        operation: &'static str,
        after: Duration,
    },

    /// Daemon answered with an error.
    #[error("wallet daemon rejected {operation}: {message}")]
    Rejected {
        operation: &'static str,
        message: String,
    },

    /// Transport or decoding failure mid-call.
    #[error("{operation} failed: {reason}")]
    Transport {
        operation: &'static str,
        reason: String,
    },
}

impl CustodyError {
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, CustodyError::DeadlineExceeded { .. })
    }
}

/// Errors signing a single transaction.
#[derive(Debug, Error)]
pub enum SignError {
    #[error("no mnemonics available for signing")]
    NoMnemonics,

    #[error("empty unsigned transaction")]
    EmptyTransaction,

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
}
