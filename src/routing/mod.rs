//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP path ("/SendMoney") or sub-command ("send")
//!     → matcher.rs (resolve to a Procedure)
//!     → router.rs (Dispatcher: build PipelineRequest, run pipeline)
//!     → ResultEnvelope / PipelineOutcome
//! ```
//!
//! # Design Decisions
//! - Procedures are a closed enum; unknown names are a normal failure envelope
//! - The dispatcher owns its configuration; nothing is read from globals

pub mod matcher;
pub mod router;

pub use matcher::Procedure;
pub use router::{command_report, Dispatcher, UnknownCommand};
