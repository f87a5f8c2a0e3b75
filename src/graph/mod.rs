//! Buffer graph synchronization.
//!
//! The [`GraphSynchronizer`] keeps one [`BufferObserver`] per node of the
//! host graph and re-derives the [`DisplayOrder`] whenever the topology
//! changes.
//!
//! # Architecture
//!
//! ```text
//!   GraphBuffersChanged          per-node channels
//!          │                            │
//!          ▼                            ▼
//! ┌───────────────────┐      ┌──────────────────┐      ┌────────────────┐
//! │ GraphSynchronizer │─────▶│  BufferObserver  │─────▶│ VersionTracker │
//! └───────────────────┘ 1..n └──────────────────┘      └────────────────┘
//!     │           │
//!     ▼           ▼
//! GraphSorter  ReadOnlyRegions
//! ```
//!
//! Observers never keep snapshots alive; see [`VersionTracker`].

mod observer;
mod read_only;
mod sorter;
mod synchronizer;
mod versions;

pub use observer::{BufferDiagnostics, BufferObserver, CaretOffset, SelectionDisplay};
pub use read_only::{ReadOnlyRegionTracker, ReadOnlyRegions};
pub use sorter::{DisplayOrder, GraphSorter};
pub use synchronizer::{GraphSynchronizer, SyncState};
pub use versions::{SnapshotObservation, VersionStamp, VersionTracker};
