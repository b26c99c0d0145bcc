//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (local port)
//!     → server.rs (Axum setup, request ID, trace span without query string)
//!     → routing::Dispatcher (procedure lookup, send pipeline)
//!     → response.rs (ResultEnvelope as JSON, always HTTP 200)
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use response::{ResultCode, ResultEnvelope};
pub use server::HttpServer;
