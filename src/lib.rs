//! HealthWatch library: health evaluation and alert suppression for a
//! fixed set of container-backed services.

pub mod alerts;
pub mod config;
pub mod dashboard;
pub mod health;
pub mod lifecycle;
pub mod notify;
pub mod observability;
pub mod probe;

pub use alerts::AlertLedger;
pub use config::HealthwatchConfig;
pub use health::{HealthMonitor, ReadinessGate, StatusBoard};
pub use lifecycle::Shutdown;
pub use notify::Notifier;
