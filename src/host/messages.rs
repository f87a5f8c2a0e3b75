//! Notification types delivered by the host.
//!
//! These enums define the protocol between the host's change sources and
//! the margin's observers.

use std::sync::Arc;

use super::{NodeId, TextSnapshot};

/// A subscribable notification source.
///
/// Node-level channels are per node; the others belong to the view or the
/// graph as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Text content of a node changed.
    ContentChanged(NodeId),
    /// Content type of a node changed.
    ContentTypeChanged(NodeId),
    /// Source spans of a projection or elision node changed.
    ProjectionSpansChanged(NodeId),
    /// Encoding of a document-backed node changed.
    EncodingChanged(NodeId),
    /// Read-only regions of a node changed.
    ReadOnlyRegionsChanged(NodeId),
    /// The view's caret moved.
    CaretMoved,
    /// The view's selection changed.
    SelectionChanged,
    /// Nodes were added to or removed from the graph.
    GraphBuffersChanged,
    /// The view re-laid out its lines.
    LayoutChanged,
    /// Content type of the view's data model changed.
    ViewContentTypeChanged,
}

impl Channel {
    /// The node a node-level channel belongs to.
    pub const fn node(&self) -> Option<NodeId> {
        match self {
            Self::ContentChanged(node)
            | Self::ContentTypeChanged(node)
            | Self::ProjectionSpansChanged(node)
            | Self::EncodingChanged(node)
            | Self::ReadOnlyRegionsChanged(node) => Some(*node),
            Self::CaretMoved
            | Self::SelectionChanged
            | Self::GraphBuffersChanged
            | Self::LayoutChanged
            | Self::ViewContentTypeChanged => None,
        }
    }
}

/// A change notification raised by the host.
#[derive(Debug, Clone)]
pub enum Notification {
    /// Text content of a node changed.
    ContentChanged {
        /// The changed node.
        node: NodeId,
        /// Snapshot after the change.
        after: Arc<TextSnapshot>,
    },

    /// Content type of a node changed.
    ContentTypeChanged {
        /// The changed node.
        node: NodeId,
        /// Snapshot after the change.
        after: Arc<TextSnapshot>,
    },

    /// Source spans of a composite node changed.
    ProjectionSpansChanged {
        /// The changed node.
        node: NodeId,
        /// Snapshot after the change.
        after: Arc<TextSnapshot>,
    },

    /// Encoding of a document-backed node changed.
    EncodingChanged {
        /// The changed node.
        node: NodeId,
    },

    /// Read-only regions of a node changed.
    ReadOnlyRegionsChanged {
        /// The changed node.
        node: NodeId,
    },

    /// The caret moved.
    CaretMoved,

    /// The selection changed.
    SelectionChanged,

    /// Nodes left or joined the graph.
    GraphBuffersChanged {
        /// Nodes no longer in the graph.
        removed: Vec<NodeId>,
        /// Nodes new to the graph.
        added: Vec<NodeId>,
    },

    /// The view re-laid out its lines.
    LayoutChanged {
        /// Lines that were created or reformatted.
        new_or_reformatted: usize,
        /// Lines that were only translated.
        translated: usize,
        /// Whether the view's snapshot changed with this layout.
        snapshot_changed: bool,
    },

    /// Content type of the view's data model changed.
    ViewContentTypeChanged,
}

impl Notification {
    /// The channel this notification is delivered on.
    pub const fn channel(&self) -> Channel {
        match self {
            Self::ContentChanged { node, .. } => Channel::ContentChanged(*node),
            Self::ContentTypeChanged { node, .. } => Channel::ContentTypeChanged(*node),
            Self::ProjectionSpansChanged { node, .. } => Channel::ProjectionSpansChanged(*node),
            Self::EncodingChanged { node } => Channel::EncodingChanged(*node),
            Self::ReadOnlyRegionsChanged { node } => Channel::ReadOnlyRegionsChanged(*node),
            Self::CaretMoved => Channel::CaretMoved,
            Self::SelectionChanged => Channel::SelectionChanged,
            Self::GraphBuffersChanged { .. } => Channel::GraphBuffersChanged,
            Self::LayoutChanged { .. } => Channel::LayoutChanged,
            Self::ViewContentTypeChanged => Channel::ViewContentTypeChanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_of_notification() {
        let after = Arc::new(TextSnapshot::new(1, 1, 0));
        let n = Notification::ContentChanged { node: NodeId(3), after };
        assert_eq!(n.channel(), Channel::ContentChanged(NodeId(3)));
        assert_eq!(n.channel().node(), Some(NodeId(3)));

        let topo = Notification::GraphBuffersChanged {
            removed: vec![],
            added: vec![NodeId(1)],
        };
        assert_eq!(topo.channel(), Channel::GraphBuffersChanged);
        assert_eq!(topo.channel().node(), None);
    }
}
