//! Notification subsystem.
//!
//! # Data Flow
//! ```text
//! failing Verdict
//!     → notifier.rs (enabled? cooldown elapsed?)
//!     → message.rs (subject + HTML body)
//!     → transport.rs (Mailgun API)
//!     → on success only: AlertLedger::record_alert
//! ```
//!
//! # Design Decisions
//! - Configuration is checked once; an unconfigured notifier is a no-op
//! - A failed send records nothing, so the next cycle retries

pub mod message;
pub mod notifier;
pub mod transport;

pub use message::{compose, AlertMessage};
pub use notifier::{Notifier, NotifyOutcome};
pub use transport::{MailgunTransport, NotificationTransport, TransportError};
