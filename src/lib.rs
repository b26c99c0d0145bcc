//! Kaspa wallet send client library.
//!
//! One send intent ("send N sompi to address X") becomes: load keys →
//! connect to the wallet daemon → build unsigned transactions → decrypt
//! mnemonics → sign → broadcast. The command line and the local HTTP
//! endpoint both go through [`routing::Dispatcher`] into the same
//! [`pipeline::SendPipeline`].

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod routing;
pub mod wallet;

pub use config::WalletConfig;
pub use http::{HttpServer, ResultEnvelope};
pub use pipeline::{PipelineOutcome, PipelineRequest, SendPipeline};
pub use routing::Dispatcher;
