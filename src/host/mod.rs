//! Host interfaces: the editor state this crate observes but never owns.
//!
//! The host exposes a buffer graph (layered text buffers connected by
//! projection and elision), a text view over it, and a subscription
//! mechanism for change notifications. Notifications travel from the host
//! to the UI thread through a [`NotificationQueue`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   Notification   ┌───────────────────┐
//! │  Host graph  │ ───────────────▶ │ NotificationQueue │
//! └──────────────┘                  └───────────────────┘
//!        ▲                                    │ pump()
//!        │ subscribe / unsubscribe            ▼
//!        │                          ┌───────────────────┐
//!        └───────────────────────── │     PanelHost     │
//!                                   └───────────────────┘
//! ```

mod messages;
mod queue;

#[cfg(test)]
pub(crate) mod mock;

pub use messages::{Channel, Notification};
pub use queue::{NotificationQueue, NotificationSender};

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::format::{PropertyEntry, TagSpan};

/// Identity of a buffer node in the host graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle returned by [`BufferGraph::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// An immutable snapshot of a buffer, owned by the host.
///
/// The crate only ever holds snapshots weakly; see
/// [`VersionTracker`](crate::graph::VersionTracker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSnapshot {
    /// Content generation.
    pub version: u64,
    /// Generation that also advances on non-content edits (markup only).
    pub reiterated_version: u64,
    /// Length in characters.
    pub length: usize,
    /// Number of source spans, for projection and elision snapshots.
    pub projection_span_count: Option<usize>,
}

impl TextSnapshot {
    /// Create a snapshot of a plain buffer.
    pub const fn new(version: u64, reiterated_version: u64, length: usize) -> Self {
        Self {
            version,
            reiterated_version,
            length,
            projection_span_count: None,
        }
    }

    /// Attach a projection span count.
    #[must_use]
    pub const fn with_span_count(mut self, count: usize) -> Self {
        self.projection_span_count = Some(count);
        self
    }
}

/// A half-open character range `[start..end)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// First character offset.
    pub start: usize,
    /// Number of characters.
    pub length: usize,
}

impl Span {
    /// Create a span from a start and length.
    pub const fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Create a span from start and end offsets.
    pub const fn from_bounds(start: usize, end: usize) -> Self {
        Self::new(start, end.saturating_sub(start))
    }

    /// Exclusive end offset.
    pub const fn end(&self) -> usize {
        self.start + self.length
    }

    /// Check whether two spans share at least one character.
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end())
    }
}

/// Text encoding of a document-backed node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    /// Numeric code page.
    pub code_page: u32,
    /// Human readable encoding name.
    pub name: String,
}

impl Encoding {
    /// Create an encoding descriptor.
    pub fn new(code_page: u32, name: impl Into<String>) -> Self {
        Self {
            code_page,
            name: name.into(),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code_page, self.name)
    }
}

bitflags! {
    /// Optional capabilities of a buffer node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeCapabilities: u8 {
        /// Content is projected from an ordered list of source nodes.
        const PROJECTION = 0b0000_0001;
        /// Content is a single source with elided ranges.
        const ELISION    = 0b0000_0010;
        /// Backed by a document that carries an encoding.
        const DOCUMENT   = 0b0000_0100;
    }
}

impl NodeCapabilities {
    /// Projection or elision.
    pub const COMPOSITE: Self = Self::PROJECTION.union(Self::ELISION);

    /// Whether the node derives its content from other nodes.
    pub const fn is_composite(self) -> bool {
        self.intersects(Self::COMPOSITE)
    }
}

bitflags! {
    /// Roles a node plays for the text view.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BufferRoles: u8 {
        /// The document buffer of the data model.
        const DOCUMENT = 0b0001;
        /// The data buffer of the data model.
        const DATA     = 0b0010;
        /// The edit buffer of the view model.
        const EDIT     = 0b0100;
        /// The visual buffer of the view model.
        const VISUAL   = 0b1000;
    }
}

impl BufferRoles {
    /// Comma separated description, e.g. `Document Buffer,Data Buffer`.
    pub fn tip(self) -> String {
        let names: Vec<&str> = [
            (Self::DOCUMENT, "Document Buffer"),
            (Self::DATA, "Data Buffer"),
            (Self::EDIT, "Edit Buffer"),
            (Self::VISUAL, "Visual Buffer"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();

        if names.is_empty() {
            "Uncategorized Buffer".to_string()
        } else {
            names.join(",")
        }
    }
}

/// Read-only view of graph structure, enough to order it for display.
pub trait Topology {
    /// Whether the node is a projection or elision node.
    fn is_composite(&self, node: NodeId) -> bool;

    /// Ordered source nodes of a composite node; empty for leaves.
    fn sources(&self, node: NodeId) -> Vec<NodeId>;
}

/// The host's buffer graph.
///
/// Every query is answered from the host's current state. Subscriptions are
/// explicit: the host emits notifications only for channels that currently
/// hold at least one subscription.
pub trait BufferGraph: Topology {
    /// All nodes currently in the graph.
    fn nodes(&self) -> Vec<NodeId>;

    /// The node at the top of the view's layering.
    fn visual_node(&self) -> NodeId;

    /// The node the data model considers the document.
    fn document_node(&self) -> NodeId;

    /// Declared capabilities of a node.
    fn capabilities(&self, node: NodeId) -> NodeCapabilities;

    /// Roles the node plays for the view.
    fn roles(&self, node: NodeId) -> BufferRoles;

    /// Current snapshot of a node, `None` once the node left the graph.
    fn current_snapshot(&self, node: NodeId) -> Option<Arc<TextSnapshot>>;

    /// Display name of the node's content type.
    fn content_type(&self, node: NodeId) -> String;

    /// Encoding of a document-backed node.
    fn encoding(&self, node: NodeId) -> Option<Encoding>;

    /// Caret offset mapped onto the node, `None` when it cannot be mapped.
    fn caret_position(&self, node: NodeId) -> Option<usize>;

    /// Selected spans mapped onto the node.
    fn selection_spans(&self, node: NodeId) -> Vec<Span>;

    /// Read-only extents of the node's current snapshot.
    fn read_only_extents(&self, node: NodeId) -> Vec<Span>;

    /// The node's property bag.
    fn properties(&self, node: NodeId) -> Vec<PropertyEntry> {
        let _ = node;
        Vec::new()
    }

    /// Start receiving notifications on a channel.
    fn subscribe(&mut self, channel: Channel) -> SubscriptionId;

    /// Stop receiving notifications; returns `false` for unknown ids.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    /// Reclaim unreachable snapshots before a liveness sweep.
    ///
    /// Blocking and advisory. Hosts without a collector keep the default.
    fn collect_garbage(&mut self) {}
}

/// The host's text view.
pub trait TextView {
    /// Display name of the view's content type.
    fn view_content_type(&self) -> String;

    /// Roles the view was created with.
    fn view_roles(&self) -> Vec<String>;

    /// Left and top edges of the viewport.
    fn viewport(&self) -> (f64, f64);

    /// Tags intersecting the current selection, in view coordinates.
    fn tags_over_selection(&self) -> Vec<TagSpan>;
}

/// Everything a panel can reach: the buffer graph and the view.
pub trait EditorHost: BufferGraph + TextView {}

impl<T: BufferGraph + TextView + ?Sized> EditorHost for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_display_and_overlap() {
        let a = Span::new(2, 3);
        assert_eq!(a.to_string(), "[2..5)");
        assert_eq!(a.end(), 5);
        assert!(a.overlaps(&Span::from_bounds(4, 8)));
        assert!(!a.overlaps(&Span::from_bounds(5, 8)));
    }

    #[test]
    fn test_capabilities_composite() {
        assert!(NodeCapabilities::PROJECTION.is_composite());
        assert!(NodeCapabilities::ELISION.is_composite());
        assert!(!NodeCapabilities::DOCUMENT.is_composite());
        assert!(!NodeCapabilities::empty().is_composite());
    }

    #[test]
    fn test_role_tip() {
        assert_eq!(BufferRoles::empty().tip(), "Uncategorized Buffer");
        assert_eq!(
            (BufferRoles::DOCUMENT | BufferRoles::DATA).tip(),
            "Document Buffer,Data Buffer"
        );
        assert_eq!(
            (BufferRoles::VISUAL | BufferRoles::EDIT).tip(),
            "Edit Buffer,Visual Buffer"
        );
    }

    #[test]
    fn test_encoding_display() {
        assert_eq!(Encoding::new(65001, "Unicode (UTF-8)").to_string(), "65001: Unicode (UTF-8)");
    }
}
