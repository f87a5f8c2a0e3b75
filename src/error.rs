//! Error type shared by the synchronizer and the panel host.

use crate::host::NodeId;

/// Result alias used throughout the crate.
pub type Result<T, E = DiagnosticError> = std::result::Result<T, E>;

/// Failures surfaced by the diagnostic margin.
///
/// Unmappable caret positions and missing node capabilities are not errors:
/// they degrade to placeholder values in the diagnostic snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagnosticError {
    /// An operation was invoked on an instance that has been closed or torn down.
    #[error("{0} is already closed")]
    AlreadyClosed(&'static str),

    /// The host reported the removal of a node that has no observer.
    #[error("topology change removes untracked node {0}")]
    UntrackedNode(NodeId),

    /// The host reported the addition of a node that is already observed.
    #[error("topology change adds node {0} which is already observed")]
    DuplicateNode(NodeId),

    /// `initialize` was called on a synchronizer that is already running.
    #[error("graph synchronizer is already initialized")]
    AlreadyInitialized,

    /// A row index outside the margin.
    #[error("row {row} is out of range (margin has {count} rows)")]
    RowOutOfRange {
        /// Requested row.
        row: usize,
        /// Number of rows in the margin.
        count: usize,
    },

    /// A visual element was inserted into a row that already holds one.
    #[error("row {0} already holds a visual element")]
    RowOccupied(usize),

    /// Internal state that should be unreachable.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl DiagnosticError {
    /// Whether this error marks a defect rather than misuse of a closed instance.
    pub const fn is_defect(&self) -> bool {
        !matches!(self, Self::AlreadyClosed(_))
    }
}
