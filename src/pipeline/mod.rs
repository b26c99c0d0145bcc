//! Send pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! PipelineRequest (address, amount, password source, Arc<WalletConfig>)
//!     → load keys file            (KeyMaterialProvider)
//!     → connect to wallet daemon  (CustodyConnector, released on every exit)
//!     → parse amount              (amount.rs)
//!     → create unsigned txs       (deadline window #1)
//!     → decrypt mnemonics         (unbounded: may prompt for a password)
//!     → sign every tx             (TransactionSigner, all-or-nothing)
//!     → broadcast                 (deadline window #2, started fresh)
//!     → PipelineOutcome
//! ```
//!
//! # Design Decisions
//! - Stages run strictly in order; the first failure is the outcome
//! - Collaborators are trait objects so both front ends share one pipeline
//! - Password entry never counts against a network deadline

pub mod amount;
pub mod error;
pub mod request;
pub mod send;

pub use error::{SendError, Stage};
pub use request::{PasswordSource, PipelineOutcome, PipelineRequest};
pub use send::SendPipeline;
