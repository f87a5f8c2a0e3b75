//! Version tracking and snapshot retention diagnostics.
//!
//! Every observed snapshot is recorded weakly. A sweep reports which of them
//! are still alive, which exposes snapshots leaked by other components.
//! Liveness is sampled, not guaranteed: the result depends on when the host
//! reclaims memory and must never drive correctness decisions.

use std::sync::{Arc, Weak};

use crate::host::TextSnapshot;

/// A weakly held historical snapshot and its version.
#[derive(Debug, Clone)]
pub struct SnapshotObservation {
    snapshot: Weak<TextSnapshot>,
    version: u64,
}

impl SnapshotObservation {
    /// Observe a snapshot without keeping it alive.
    pub fn new(snapshot: &Arc<TextSnapshot>) -> Self {
        Self {
            snapshot: Arc::downgrade(snapshot),
            version: snapshot.version,
        }
    }

    /// Version of the observed snapshot.
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Whether the snapshot is still alive at this instant.
    pub fn is_alive(&self) -> bool {
        self.snapshot.strong_count() > 0
    }
}

/// Version and reiteration number of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionStamp {
    /// Content generation.
    pub version: u64,
    /// Reiterated generation.
    pub reiterated: u64,
}

impl VersionStamp {
    /// Stamp of a snapshot.
    pub const fn of(snapshot: &TextSnapshot) -> Self {
        Self {
            version: snapshot.version,
            reiterated: snapshot.reiterated_version,
        }
    }

    /// Whether either number is behind `other`.
    pub const fn is_behind(&self, other: &Self) -> bool {
        self.version < other.version || self.reiterated < other.reiterated
    }
}

/// Per-node version state and weak snapshot history.
#[derive(Debug, Default)]
pub struct VersionTracker {
    observations: Vec<SnapshotObservation>,
    current: Option<VersionStamp>,
}

impl VersionTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a weak observation of `snapshot`.
    pub fn observe(&mut self, snapshot: &Arc<TextSnapshot>) {
        self.observations.push(SnapshotObservation::new(snapshot));
    }

    /// Adopt the snapshot's version numbers.
    ///
    /// Numbers never go backwards: a snapshot older than the current stamp
    /// (a stale notification) leaves it unchanged. Returns whether the stamp
    /// was adopted.
    pub fn advance(&mut self, snapshot: &TextSnapshot) -> bool {
        let stamp = VersionStamp::of(snapshot);
        match self.current {
            Some(current) if stamp.is_behind(&current) => {
                tracing::warn!(
                    version = stamp.version,
                    reiterated = stamp.reiterated,
                    current_version = current.version,
                    current_reiterated = current.reiterated,
                    "ignoring stale snapshot"
                );
                false
            }
            _ => {
                self.current = Some(stamp);
                true
            }
        }
    }

    /// Current version numbers, if any snapshot was adopted.
    pub const fn current(&self) -> Option<VersionStamp> {
        self.current
    }

    /// Number of observations, live or not.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Check if nothing was observed since the last compaction.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Versions of the observations that are still alive.
    ///
    /// Dead observations are dropped from the list. Callers wanting an
    /// accurate picture ask the host to reclaim memory first; see
    /// [`BufferGraph::collect_garbage`](crate::host::BufferGraph::collect_garbage).
    pub fn sweep(&mut self) -> Vec<u64> {
        let live: Vec<u64> = self
            .observations
            .iter()
            .filter(|o| o.is_alive())
            .map(SnapshotObservation::version)
            .collect();
        self.observations.retain(SnapshotObservation::is_alive);
        live
    }
}
