//! Latest verdict map, swapped atomically once per cycle.

use std::ops::Index;
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::health::evaluator::Verdict;

/// Verdicts in configuration order, serialized as an `id → verdict` map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerdictMap(Vec<Verdict>);

impl VerdictMap {
    pub fn get(&self, id: &str) -> Option<&Verdict> {
        self.0.iter().find(|v| v.name == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Verdict> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Verdict> for VerdictMap {
    fn from_iter<I: IntoIterator<Item = Verdict>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Index<&str> for VerdictMap {
    type Output = Verdict;

    /// Panics when no verdict has that id, like map indexing.
    fn index(&self, id: &str) -> &Verdict {
        match self.get(id) {
            Some(verdict) => verdict,
            None => panic!("no verdict for service '{id}'"),
        }
    }
}

impl Serialize for VerdictMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|v| (&v.name, v)))
    }
}

/// Every verdict from one cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusSnapshot {
    /// When the cycle that produced this snapshot ran. `None` before the
    /// first cycle completes.
    pub taken_at: Option<DateTime<Utc>>,
    pub services: VerdictMap,
}

/// Healthy/unhealthy counts for a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub healthy: usize,
    pub unhealthy: usize,
    pub total: usize,
}

impl StatusSnapshot {
    pub fn new(taken_at: DateTime<Utc>, verdicts: impl IntoIterator<Item = Verdict>) -> Self {
        Self {
            taken_at: Some(taken_at),
            services: verdicts.into_iter().collect(),
        }
    }

    pub fn summary(&self) -> StatusSummary {
        let total = self.services.len();
        let healthy = self.services.iter().filter(|v| v.healthy).count();
        StatusSummary {
            healthy,
            unhealthy: total - healthy,
            total,
        }
    }

    pub fn unhealthy(&self) -> impl Iterator<Item = &Verdict> {
        self.services.iter().filter(|v| !v.healthy)
    }
}

/// Single-writer, many-reader holder of the current snapshot.
///
/// Readers get an `Arc` to a complete snapshot and never block the
/// scheduler; a publish replaces the whole map at once.
#[derive(Clone, Default)]
pub struct StatusBoard {
    current: Arc<ArcSwap<StatusSnapshot>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: StatusSnapshot) {
        self.current.store(Arc::new(snapshot));
    }

    pub fn load(&self) -> Arc<StatusSnapshot> {
        self.current.load_full()
    }
}
