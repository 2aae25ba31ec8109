//! Health evaluation subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (readiness.rs):
//!     cold boot wait → poll runtime until enough services are up
//!     → grace period (or give up at max wait)
//!
//! Every interval (monitor.rs):
//!     for each ServiceSpec → probe → evaluator.rs → Verdict
//!     → snapshot.rs (atomic publish)
//!     → failing verdicts → notify::Notifier
//! ```
//!
//! # Design Decisions
//! - Verdicts are binary and recomputed from scratch every cycle
//! - One cycle at a time, so the same service is never notified twice
//!   concurrently
//! - A probe failure is an unhealthy verdict, never a scheduler error

pub mod evaluator;
pub mod monitor;
pub mod readiness;
pub mod snapshot;

pub use evaluator::{evaluate, observe, Observation, Verdict};
pub use monitor::HealthMonitor;
pub use readiness::{GateOutcome, ReadinessGate};
pub use snapshot::{StatusBoard, StatusSnapshot, StatusSummary, VerdictMap};
