//! # Diagnostic Margin
//!
//! A diagnostics overlay for a text editing host.
//!
//! The margin shows the live internal state of a document's buffer graph:
//! layered text buffers connected by projection and elision, the version
//! history of each buffer, and tag data over the view.
//!
//! ## Core Concepts
//!
//! - **Graph synchronization**: one observer per buffer node, kept in step
//!   with topology changes, plus a dependency-respecting display order
//! - **Weak snapshot tracking**: historical snapshots are never kept alive;
//!   a sweep reports the ones something else still retains
//! - **Panel lifecycle**: each optional panel toggles between active and
//!   suspended without being rebuilt
//! - **Explicit subscriptions**: every observer attaches and detaches
//!   explicitly, so no subscription outlives its user
//!
//! ## Example
//!
//! ```rust,ignore
//! use diagnostic_margin::{panels, MarginConfig, PanelHost};
//!
//! let mut margin = PanelHost::new(MarginConfig::default(), panels::builtin());
//! editor.connect(margin.sender()?);
//!
//! // Show the buffer panel, then process host notifications on the UI thread.
//! margin.toggle(0, &mut editor)?;
//! margin.pump(&mut editor)?;
//! for (row, lines) in margin.render(&editor)? {
//!     draw(row, &lines);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod format;
pub mod graph;
pub mod host;
pub mod margin;
pub mod panels;

// Re-exports for convenience
pub use error::{DiagnosticError, Result};
pub use graph::{
    BufferDiagnostics, BufferObserver, CaretOffset, DisplayOrder, GraphSorter, GraphSynchronizer,
    SelectionDisplay, VersionTracker,
};
pub use host::{
    BufferGraph, BufferRoles, Channel, EditorHost, Encoding, NodeCapabilities, NodeId,
    Notification, NotificationQueue, NotificationSender, Span, SubscriptionId, TextSnapshot,
    TextView, Topology,
};
pub use margin::{
    DiagnosticPanel, MarginConfig, PanelDescriptor, PanelFactory, PanelHost, PanelSlot, SlotState,
};
