//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load ledger → Start dashboard → Readiness gate → Scheduler
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → scheduler and dashboard exit → join
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{run, RunOptions};
