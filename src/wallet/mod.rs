//! Wallet collaborators used by the send pipeline.
//!
//! # Data Flow
//! ```text
//! keys file on disk
//!     → keys.rs (load, check network, decrypt mnemonics)
//!     → transaction.rs (derive keys, sign each unsigned transaction)
//! wallet daemon
//!     → client.rs (connect, create unsigned transactions, broadcast)
//! ```
//!
//! # Security Constraints
//! - Passwords and mnemonics are never logged or serialized in clear text
//! - Decrypted material is zeroized on drop
//! - Daemon deadlines are applied by the caller, per call

pub mod client;
pub mod keys;
pub mod transaction;
pub mod types;

pub use client::{CustodyClient, CustodyConnector, DaemonConnector};
pub use keys::{FileKeyStore, KeyMaterialProvider, KeysFile};
pub use transaction::{LocalSigner, TransactionSigner};
pub use types::{CustodyError, DecryptionError, KeyFileError, SignError};
