//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline, dispatcher and HTTP server produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr (fmt subscriber)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields, never free-form secrets: passwords and mnemonics are not recorded
//! - Each send run carries a `send_id` span; HTTP requests carry `x-request-id`

pub mod logging;
pub mod metrics;
