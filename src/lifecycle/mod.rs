//! Process lifecycle.
//!
//! ```text
//! SIGINT/SIGTERM (signals.rs) ─┐
//!                              ├─→ Shutdown::trigger → HTTP task drains and exits
//! send command finished ───────┘
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
