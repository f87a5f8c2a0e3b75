//! Per-node observer: turns a node's change notifications into a stable
//! diagnostic snapshot.
//!
//! An observer subscribes only to the channels its node supports: content
//! and content type always, projection spans for composite nodes, encoding
//! for document-backed nodes, plus the view's caret and selection.

use std::sync::Arc;

use crate::format::dump_properties;
use crate::host::{
    BufferGraph, Channel, NodeCapabilities, NodeId, Notification, Span, SubscriptionId,
    TextSnapshot,
};

use super::read_only::ReadOnlyRegions;
use super::versions::VersionTracker;

/// Caret position as seen from one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaretOffset {
    /// Offset in the node's current snapshot.
    Mapped(usize),
    /// The caret lies outside what this node projects.
    #[default]
    Unmapped,
}

impl CaretOffset {
    /// Offset text, or `placeholder` when unmapped.
    pub fn label(&self, placeholder: &str) -> String {
        match self {
            Self::Mapped(offset) => offset.to_string(),
            Self::Unmapped => placeholder.to_string(),
        }
    }
}

/// Selection mapped onto one node.
///
/// Mapping can split one selected span into several disjoint ones, so
/// callers handle both the single and the multiple shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionDisplay {
    /// Nothing maps onto this node.
    #[default]
    Empty,
    /// One span.
    Single(Span),
    /// Two or more disjoint spans.
    Multiple(Vec<Span>),
}

impl SelectionDisplay {
    /// Build from mapped spans.
    pub fn from_spans(mut spans: Vec<Span>) -> Self {
        match spans.len() {
            0 => Self::Empty,
            1 => Self::Single(spans.remove(0)),
            _ => Self::Multiple(spans),
        }
    }

    /// All spans, in host order.
    pub fn spans(&self) -> &[Span] {
        match self {
            Self::Empty => &[],
            Self::Single(span) => std::slice::from_ref(span),
            Self::Multiple(spans) => spans,
        }
    }

    /// First span text, or `placeholder` when empty.
    pub fn label(&self, placeholder: &str) -> String {
        self.spans()
            .first()
            .map_or_else(|| placeholder.to_string(), ToString::to_string)
    }
}

/// Diagnostic fields of one node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BufferDiagnostics {
    /// Content type display name.
    pub content_type: String,
    /// Version number of the latest adopted snapshot.
    pub version: u64,
    /// Reiterated version number of the latest adopted snapshot.
    pub reiterated_version: u64,
    /// Length of the current snapshot.
    pub length: usize,
    /// Caret offset in this node.
    pub caret: CaretOffset,
    /// Selection in this node.
    pub selection: SelectionDisplay,
    /// Source span count, composite nodes only.
    pub projection_spans: Option<usize>,
    /// Encoding label, document-backed nodes only.
    pub encoding: Option<String>,
    /// Roles the node plays for the view.
    pub role_tip: String,
}

/// Observer of one buffer node.
#[derive(Debug)]
pub struct BufferObserver {
    node: NodeId,
    capabilities: NodeCapabilities,
    versions: VersionTracker,
    diagnostics: BufferDiagnostics,
    subscriptions: Vec<(Channel, SubscriptionId)>,
}

impl BufferObserver {
    /// Create a detached observer and record the node's current snapshot.
    pub fn new<G: BufferGraph + ?Sized>(graph: &G, node: NodeId) -> Self {
        let mut versions = VersionTracker::new();
        if let Some(snapshot) = graph.current_snapshot(node) {
            versions.observe(&snapshot);
        }
        Self {
            node,
            capabilities: graph.capabilities(node),
            versions,
            diagnostics: BufferDiagnostics {
                role_tip: graph.roles(node).tip(),
                ..BufferDiagnostics::default()
            },
            subscriptions: Vec::new(),
        }
    }

    /// The observed node.
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// The node's declared capabilities.
    pub const fn capabilities(&self) -> NodeCapabilities {
        self.capabilities
    }

    /// Current diagnostic fields.
    pub const fn diagnostics(&self) -> &BufferDiagnostics {
        &self.diagnostics
    }

    /// Version history of the node.
    pub const fn versions(&self) -> &VersionTracker {
        &self.versions
    }

    /// Whether the observer holds subscriptions.
    pub fn is_attached(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Whether the observer is subscribed to `channel`.
    pub fn holds(&self, channel: Channel) -> bool {
        self.subscriptions.iter().any(|(c, _)| *c == channel)
    }

    /// Channels the observer is subscribed to.
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.subscriptions.iter().map(|(c, _)| *c)
    }

    /// Subscribe to the node's channels and refresh every field.
    ///
    /// Attaching an attached observer does nothing.
    pub fn attach<G: BufferGraph + ?Sized>(&mut self, graph: &mut G) {
        if self.is_attached() {
            tracing::warn!(node = %self.node, "observer already attached");
            return;
        }

        let mut channels = vec![
            Channel::ContentChanged(self.node),
            Channel::ContentTypeChanged(self.node),
            Channel::CaretMoved,
            Channel::SelectionChanged,
        ];
        if self.capabilities.is_composite() {
            channels.push(Channel::ProjectionSpansChanged(self.node));
        }
        if self.capabilities.contains(NodeCapabilities::DOCUMENT) {
            channels.push(Channel::EncodingChanged(self.node));
        }

        self.subscriptions = channels
            .into_iter()
            .map(|channel| (channel, graph.subscribe(channel)))
            .collect();
        tracing::debug!(node = %self.node, channels = self.subscriptions.len(), "observer attached");

        self.refresh_all(&*graph);
    }

    /// Drop every subscription and switch off the node's read-only highlighting.
    pub fn detach<G: BufferGraph + ?Sized>(&mut self, graph: &mut G, regions: &mut ReadOnlyRegions) {
        for (channel, id) in self.subscriptions.drain(..) {
            if !graph.unsubscribe(id) {
                tracing::warn!(node = %self.node, ?channel, "host did not know subscription");
            }
        }
        if let Some(tracker) = regions.get_mut(self.node) {
            tracker.set_active(graph, false);
        }
        tracing::debug!(node = %self.node, "observer detached");
    }

    /// Route a notification; returns whether this observer consumed it.
    pub fn handle<G: BufferGraph + ?Sized>(&mut self, graph: &G, notification: &Notification) -> bool {
        if !self.holds(notification.channel()) {
            return false;
        }
        match notification {
            Notification::ContentChanged { after, .. } => self.on_content_changed(graph, after),
            Notification::ContentTypeChanged { after, .. } => {
                self.on_content_type_changed(graph, after);
            }
            Notification::ProjectionSpansChanged { after, .. } => {
                self.on_projection_spans_changed(after);
            }
            Notification::EncodingChanged { .. } => self.on_encoding_changed(graph),
            Notification::CaretMoved | Notification::SelectionChanged => {
                self.on_caret_or_selection_changed(graph);
            }
            Notification::ReadOnlyRegionsChanged { .. }
            | Notification::GraphBuffersChanged { .. }
            | Notification::LayoutChanged { .. }
            | Notification::ViewContentTypeChanged => return false,
        }
        true
    }

    /// Record the new snapshot, then refresh versions, caret, length and selection.
    pub fn on_content_changed<G: BufferGraph + ?Sized>(&mut self, graph: &G, after: &Arc<TextSnapshot>) {
        self.record(after);
        self.refresh_caret_and_length(graph, Some(after));
        self.refresh_selection(graph);
    }

    /// Record the new snapshot, then refresh versions and the content type.
    pub fn on_content_type_changed<G: BufferGraph + ?Sized>(
        &mut self,
        graph: &G,
        after: &Arc<TextSnapshot>,
    ) {
        self.record(after);
        self.diagnostics.content_type = graph.content_type(self.node);
    }

    /// Refresh the source span count of a composite node.
    pub fn on_projection_spans_changed(&mut self, after: &TextSnapshot) {
        if self.capabilities.is_composite() {
            self.diagnostics.projection_spans = after.projection_span_count;
        }
    }

    /// Refresh the encoding label.
    pub fn on_encoding_changed<G: BufferGraph + ?Sized>(&mut self, graph: &G) {
        self.refresh_encoding(graph);
    }

    /// Refresh caret, length and selection without touching versions.
    pub fn on_caret_or_selection_changed<G: BufferGraph + ?Sized>(&mut self, graph: &G) {
        self.refresh_caret_and_length(graph, None);
        self.refresh_selection(graph);
    }

    /// Re-read every field from the host.
    pub fn refresh_all<G: BufferGraph + ?Sized>(&mut self, graph: &G) {
        let current = graph.current_snapshot(self.node);
        self.diagnostics.content_type = graph.content_type(self.node);
        if let Some(snapshot) = &current {
            self.adopt(snapshot);
            if self.capabilities.is_composite() {
                self.diagnostics.projection_spans = snapshot.projection_span_count;
            }
        }
        self.refresh_caret_and_length(graph, current.as_ref());
        self.refresh_selection(graph);
        self.refresh_encoding(graph);
    }

    /// Ask the host to reclaim memory, then list the live snapshot versions.
    ///
    /// Blocks for as long as the host's collection takes. Results vary
    /// between hosts; use them to spot leaks only.
    pub fn sweep_snapshots<G: BufferGraph + ?Sized>(&mut self, graph: &mut G) -> Vec<u64> {
        graph.collect_garbage();
        let live = self.versions.sweep();
        tracing::debug!(node = %self.node, live = live.len(), "snapshot sweep");
        live
    }

    /// The node's property bag, one line per entry.
    pub fn property_dump<G: BufferGraph + ?Sized>(&self, graph: &G) -> Vec<String> {
        dump_properties(&graph.properties(self.node))
    }

    fn record(&mut self, after: &Arc<TextSnapshot>) {
        self.versions.observe(after);
        self.adopt(after);
    }

    fn adopt(&mut self, snapshot: &TextSnapshot) {
        if self.versions.advance(snapshot) {
            self.diagnostics.version = snapshot.version;
            self.diagnostics.reiterated_version = snapshot.reiterated_version;
        }
    }

    fn refresh_caret_and_length<G: BufferGraph + ?Sized>(
        &mut self,
        graph: &G,
        fallback: Option<&Arc<TextSnapshot>>,
    ) {
        self.diagnostics.caret = graph
            .caret_position(self.node)
            .map_or(CaretOffset::Unmapped, CaretOffset::Mapped);
        if let Some(length) = graph
            .current_snapshot(self.node)
            .map(|s| s.length)
            .or_else(|| fallback.map(|s| s.length))
        {
            self.diagnostics.length = length;
        }
    }

    fn refresh_selection<G: BufferGraph + ?Sized>(&mut self, graph: &G) {
        self.diagnostics.selection = SelectionDisplay::from_spans(graph.selection_spans(self.node));
    }

    fn refresh_encoding<G: BufferGraph + ?Sized>(&mut self, graph: &G) {
        self.diagnostics.encoding = if self.capabilities.contains(NodeCapabilities::DOCUMENT) {
            graph.encoding(self.node).map(|e| e.to_string())
        } else {
            None
        };
    }
}
