//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! healthwatch.toml
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (secrets, recipients, intervals)
//!     → validation.rs (semantic checks)
//!     → HealthwatchConfig (validated, immutable)
//!     → handed by value/reference to each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Read once at startup; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Missing mail credentials are not a config error (the notifier degrades)

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, load_config, ConfigError};
pub use schema::{
    DashboardConfig, HealthwatchConfig, MonitorConfig, NotifierConfig, ObservabilityConfig,
    ReadinessConfig, RuntimeConfig, ServiceSpec, StorageConfig, MAX_MINUTES,
};
pub use validation::{validate_config, ValidationError};
