//! Observability subsystem.
//!
//! Every subsystem logs through `tracing` with structured fields
//! (`service`, `status`, `error`, ...). The subscriber is installed once
//! by the binary; library code never configures logging.

pub mod logging;

pub use logging::init_logging;
