//! Alert ledger: cooldown timestamps and bounded alert history.
//!
//! # Responsibilities
//! - Decide whether a service may alert again (cooldown)
//! - Record sent alerts and keep the newest `HISTORY_LIMIT`
//! - Persist the whole state after every record
//! - Serve lock-free reads to the dashboard
//!
//! # Design Decisions
//! - Only successful sends are recorded; a crash between send and save can
//!   repeat one alert after restart
//! - The in-memory state stays authoritative when a save fails
//! - Load failures start empty instead of aborting

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

/// Maximum number of alert records kept.
pub const HISTORY_LIMIT: usize = 100;

/// Maximum number of records returned by a history query.
pub const RECENT_LIMIT: usize = 50;

/// Errors reading or writing the state file.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("state file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file is malformed: {0}")]
    Format(#[from] serde_json::Error),

    #[error("state writer task failed: {0}")]
    Writer(#[from] tokio::task::JoinError),
}

/// One sent alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub service: String,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub error: String,
}

/// Everything that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Last successful alert per service. Absent means never alerted.
    #[serde(rename = "last_alert_time", default)]
    pub last_alert: BTreeMap<String, DateTime<Utc>>,

    /// Chronological, at most `HISTORY_LIMIT` entries.
    #[serde(rename = "alert_history", default)]
    pub history: Vec<AlertRecord>,

    /// Alerts ever recorded, including those truncated from history.
    #[serde(default)]
    pub total_alerts: u64,
}

impl LedgerState {
    fn push(&mut self, record: AlertRecord) {
        self.last_alert.insert(record.service.clone(), record.timestamp);
        self.history.push(record);
        self.total_alerts += 1;
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }

    /// Drop entries for services that are no longer configured.
    fn retain_services(&mut self, known: &[String]) -> usize {
        let before = self.last_alert.len() + self.history.len();
        self.last_alert.retain(|id, _| known.contains(id));
        self.history.retain(|r| known.contains(&r.service));
        before - (self.last_alert.len() + self.history.len())
    }
}

/// Durable alert state with a cooldown policy.
pub struct AlertLedger {
    state: ArcSwap<LedgerState>,
    /// Serializes writers so saves land in mutation order. Held across
    /// the blocking file write.
    write_lock: Mutex<()>,
    path: Option<PathBuf>,
    cooldown: Duration,
}

impl AlertLedger {
    /// In-memory ledger that never touches disk.
    pub fn in_memory(cooldown: Duration) -> Self {
        Self::with_state(LedgerState::default(), None, cooldown)
    }

    fn with_state(state: LedgerState, path: Option<PathBuf>, cooldown: Duration) -> Self {
        Self {
            state: ArcSwap::from_pointee(state),
            write_lock: Mutex::new(()),
            path,
            cooldown,
        }
    }

    /// Load state from `path`, starting empty if the file is missing or
    /// unreadable. Entries for services outside `known_services` are dropped.
    pub fn load(path: impl Into<PathBuf>, cooldown: Duration, known_services: &[String]) -> Self {
        let path = path.into();
        let mut state = match read_state(&path) {
            Ok(Some(state)) => {
                tracing::info!(
                    path = %path.display(),
                    services = state.last_alert.len(),
                    alerts = state.history.len(),
                    "Loaded previous alert state"
                );
                state
            }
            Ok(None) => {
                tracing::info!(path = %path.display(), "No alert state on disk, starting empty");
                LedgerState::default()
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Error loading alert state, starting empty");
                LedgerState::default()
            }
        };

        let dropped = state.retain_services(known_services);
        if dropped > 0 {
            tracing::info!(dropped, "Discarded alert state for unconfigured services");
        }

        Self::with_state(state, Some(path), cooldown)
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// True when the service never alerted or its last alert is strictly
    /// older than the cooldown.
    pub fn should_alert(&self, service: &str, now: DateTime<Utc>) -> bool {
        match self.state.load().last_alert.get(service) {
            None => true,
            Some(last) => now.signed_duration_since(*last) > self.cooldown,
        }
    }

    /// Record a successful send and persist the whole state.
    ///
    /// A failed save is logged; the in-memory update stands.
    pub async fn record_alert(&self, service: &str, now: DateTime<Utc>, status: &str, detail: &str) {
        let _guard = self.write_lock.lock().await;

        let mut next = LedgerState::clone(&self.state.load());
        next.push(AlertRecord {
            service: service.to_string(),
            timestamp: now,
            status: status.to_string(),
            error: detail.to_string(),
        });
        let next = Arc::new(next);
        self.state.store(next.clone());

        if let Err(e) = self.persist(next).await {
            tracing::error!(service = %service, error = %e, "Error saving alert state");
        }
    }

    /// Write the current state to disk.
    pub async fn save(&self) -> Result<(), LedgerError> {
        let _guard = self.write_lock.lock().await;
        self.persist(self.state.load_full()).await
    }

    /// Write `state` on the blocking pool. Callers hold `write_lock`.
    async fn persist(&self, state: Arc<LedgerState>) -> Result<(), LedgerError> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        tokio::task::spawn_blocking(move || write_state(&path, &state)).await?
    }

    pub fn last_alert(&self, service: &str) -> Option<DateTime<Utc>> {
        self.state.load().last_alert.get(service).copied()
    }

    /// The newest `min(n, RECENT_LIMIT)` records, oldest first.
    pub fn recent(&self, n: usize) -> Vec<AlertRecord> {
        let state = self.state.load();
        let n = n.min(RECENT_LIMIT).min(state.history.len());
        state.history[state.history.len() - n..].to_vec()
    }

    pub fn total_alerts(&self) -> u64 {
        self.state.load().total_alerts
    }

    /// Point-in-time copy of the whole state.
    pub fn snapshot(&self) -> Arc<LedgerState> {
        self.state.load_full()
    }
}

fn write_state(path: &Path, state: &LedgerState) -> Result<(), LedgerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp: OsString = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer_pretty(&mut writer, state)?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;

    tracing::debug!(path = %path.display(), alerts = state.history.len(), "Saved alert state");
    Ok(())
}

fn read_state(path: &Path) -> Result<Option<LedgerState>, LedgerError> {
    if !path.exists() {
        return Ok(None);
    }
    let reader = BufReader::new(File::open(path)?);
    let mut state: LedgerState = serde_json::from_reader(reader)?;

    if state.history.len() > HISTORY_LIMIT {
        let excess = state.history.len() - HISTORY_LIMIT;
        state.history.drain(..excess);
    }
    // Files written before the counter existed.
    state.total_alerts = state.total_alerts.max(state.history.len() as u64);

    Ok(Some(state))
}
