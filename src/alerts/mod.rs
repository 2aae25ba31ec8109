//! Alert state subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:   state file → ledger.rs (load, prune unknown services)
//! Per alert: Notifier → should_alert → send → record_alert → state file
//! Reads:     dashboard → recent() / total_alerts()
//! ```

pub mod ledger;

pub use ledger::{AlertLedger, AlertRecord, LedgerError, LedgerState, HISTORY_LIMIT, RECENT_LIMIT};
