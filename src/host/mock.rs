//! In-memory editor host for tests.
//!
//! Nodes are added directly; mutations bump snapshots the way a real host
//! would and emit a notification only when its channel holds a
//! subscription.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::format::{PropertyEntry, TagSpan};

use super::{
    BufferGraph, BufferRoles, Channel, Encoding, NodeCapabilities, NodeId, Notification,
    NotificationQueue, NotificationSender, Span, SubscriptionId, TextSnapshot, TextView, Topology,
};

#[derive(Debug)]
struct MockNode {
    capabilities: NodeCapabilities,
    roles: BufferRoles,
    sources: Vec<NodeId>,
    snapshot: Arc<TextSnapshot>,
    content_type: String,
    encoding: Option<Encoding>,
    read_only: Vec<Span>,
    caret: Option<usize>,
    selection: Vec<Span>,
    properties: Vec<PropertyEntry>,
}

impl MockNode {
    fn new(capabilities: NodeCapabilities, content_type: &str, sources: &[NodeId]) -> Self {
        let mut snapshot = TextSnapshot::new(1, 1, 0);
        if capabilities.is_composite() {
            snapshot = snapshot.with_span_count(sources.len());
        }
        Self {
            capabilities,
            roles: BufferRoles::empty(),
            sources: sources.to_vec(),
            snapshot: Arc::new(snapshot),
            content_type: content_type.to_string(),
            encoding: None,
            read_only: Vec::new(),
            caret: Some(0),
            selection: Vec::new(),
            properties: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct MockHost {
    nodes: BTreeMap<NodeId, MockNode>,
    visual: Option<NodeId>,
    document: Option<NodeId>,
    subscriptions: HashMap<SubscriptionId, Channel>,
    next_subscription: u64,
    queue: NotificationQueue,
    sender: NotificationSender,
    collections: usize,
    view_content_type: String,
    view_roles: Vec<String>,
    viewport: (f64, f64),
    tags: Vec<TagSpan>,
}

impl MockHost {
    pub(crate) fn new() -> Self {
        let queue = NotificationQueue::new();
        let sender = queue.sender();
        Self {
            nodes: BTreeMap::new(),
            visual: None,
            document: None,
            subscriptions: HashMap::new(),
            next_subscription: 1,
            queue,
            sender,
            collections: 0,
            view_content_type: "text".to_string(),
            view_roles: Vec::new(),
            viewport: (0.0, 0.0),
            tags: Vec::new(),
        }
    }

    /// Emit into another queue instead of the built-in one.
    pub(crate) fn connect(&mut self, sender: NotificationSender) {
        self.sender = sender;
    }

    /// Notifications emitted into the built-in queue.
    pub(crate) fn drain(&self) -> Vec<Notification> {
        self.queue.drain()
    }

    fn insert(&mut self, id: u32, node: MockNode) -> NodeId {
        let id = NodeId(id);
        self.nodes.insert(id, node);
        self.document.get_or_insert(id);
        self.visual = Some(id);
        id
    }

    /// Plain leaf; becomes the visual node, and the document if none is set.
    pub(crate) fn add_leaf(&mut self, id: u32, content_type: &str) -> NodeId {
        self.insert(id, MockNode::new(NodeCapabilities::empty(), content_type, &[]))
    }

    /// Document-backed leaf; becomes the document node.
    pub(crate) fn add_document(&mut self, id: u32, content_type: &str, encoding: Encoding) -> NodeId {
        let mut node = MockNode::new(NodeCapabilities::DOCUMENT, content_type, &[]);
        node.encoding = Some(encoding);
        node.roles = BufferRoles::DOCUMENT;
        let id = self.insert(id, node);
        self.document = Some(id);
        id
    }

    pub(crate) fn add_projection(&mut self, id: u32, content_type: &str, sources: &[NodeId]) -> NodeId {
        self.insert(id, MockNode::new(NodeCapabilities::PROJECTION, content_type, sources))
    }

    pub(crate) fn add_elision(&mut self, id: u32, content_type: &str, source: NodeId) -> NodeId {
        self.insert(id, MockNode::new(NodeCapabilities::ELISION, content_type, &[source]))
    }

    pub(crate) fn remove_node(&mut self, node: NodeId) {
        self.nodes.remove(&node);
    }

    pub(crate) fn set_visual(&mut self, node: NodeId) {
        self.visual = Some(node);
    }

    pub(crate) fn set_roles(&mut self, node: NodeId, roles: BufferRoles) {
        self.node_mut(node).roles = roles;
    }

    pub(crate) fn set_properties(&mut self, node: NodeId, properties: Vec<PropertyEntry>) {
        self.node_mut(node).properties = properties;
    }

    pub(crate) fn set_view(&mut self, content_type: &str, roles: &[&str]) -> bool {
        self.view_content_type = content_type.to_string();
        self.view_roles = roles.iter().map(ToString::to_string).collect();
        self.emit(Notification::ViewContentTypeChanged)
    }

    pub(crate) fn set_viewport(&mut self, left: f64, top: f64) {
        self.viewport = (left, top);
    }

    pub(crate) fn set_tags(&mut self, tags: Vec<TagSpan>) {
        self.tags = tags;
    }

    /// Current snapshot, kept alive by the caller.
    pub(crate) fn current(&self, node: NodeId) -> Arc<TextSnapshot> {
        Arc::clone(&self.nodes[&node].snapshot)
    }

    /// Content edit: both numbers advance.
    pub(crate) fn edit(&mut self, node: NodeId, length: usize) -> bool {
        let after = self.bump(node, true, Some(length));
        self.emit(Notification::ContentChanged { node, after })
    }

    /// Markup-only edit: only the reiterated number advances.
    pub(crate) fn markup_edit(&mut self, node: NodeId) -> bool {
        let after = self.bump(node, false, None);
        self.emit(Notification::ContentChanged { node, after })
    }

    pub(crate) fn set_content_type(&mut self, node: NodeId, content_type: &str) -> bool {
        self.node_mut(node).content_type = content_type.to_string();
        let after = self.bump(node, false, None);
        self.emit(Notification::ContentTypeChanged { node, after })
    }

    /// Replace a composite node's sources.
    pub(crate) fn set_sources(&mut self, node: NodeId, sources: &[NodeId]) -> bool {
        self.node_mut(node).sources = sources.to_vec();
        let after = self.bump(node, true, None);
        self.emit(Notification::ProjectionSpansChanged { node, after })
    }

    pub(crate) fn set_encoding(&mut self, node: NodeId, encoding: Encoding) -> bool {
        self.node_mut(node).encoding = Some(encoding);
        self.emit(Notification::EncodingChanged { node })
    }

    pub(crate) fn set_read_only(&mut self, node: NodeId, extents: Vec<Span>) -> bool {
        self.node_mut(node).read_only = extents;
        self.emit(Notification::ReadOnlyRegionsChanged { node })
    }

    pub(crate) fn set_caret(&mut self, node: NodeId, caret: Option<usize>) -> bool {
        self.node_mut(node).caret = caret;
        self.emit(Notification::CaretMoved)
    }

    pub(crate) fn set_selection(&mut self, node: NodeId, selection: Vec<Span>) -> bool {
        self.node_mut(node).selection = selection;
        self.emit(Notification::SelectionChanged)
    }

    pub(crate) fn announce_topology(&mut self, removed: &[NodeId], added: &[NodeId]) -> bool {
        self.emit(Notification::GraphBuffersChanged {
            removed: removed.to_vec(),
            added: added.to_vec(),
        })
    }

    pub(crate) fn layout(&mut self, new_or_reformatted: usize, translated: usize) -> bool {
        self.emit(Notification::LayoutChanged {
            new_or_reformatted,
            translated,
            snapshot_changed: false,
        })
    }

    pub(crate) fn is_subscribed(&self, channel: Channel) -> bool {
        self.subscriptions.values().any(|c| *c == channel)
    }

    pub(crate) fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Number of `collect_garbage` calls.
    pub(crate) const fn collections(&self) -> usize {
        self.collections
    }

    fn node_mut(&mut self, node: NodeId) -> &mut MockNode {
        self.nodes.get_mut(&node).expect("unknown mock node")
    }

    fn bump(&mut self, node: NodeId, content: bool, length: Option<usize>) -> Arc<TextSnapshot> {
        let entry = self.node_mut(node);
        let old = &entry.snapshot;
        let mut next = TextSnapshot::new(
            old.version + u64::from(content),
            old.reiterated_version + 1,
            length.unwrap_or(old.length),
        );
        if entry.capabilities.is_composite() {
            next = next.with_span_count(entry.sources.len());
        }
        entry.snapshot = Arc::new(next);
        Arc::clone(&entry.snapshot)
    }

    fn emit(&self, notification: Notification) -> bool {
        self.is_subscribed(notification.channel()) && self.sender.send(notification)
    }
}

impl Topology for MockHost {
    fn is_composite(&self, node: NodeId) -> bool {
        self.nodes
            .get(&node)
            .is_some_and(|n| n.capabilities.is_composite())
    }

    fn sources(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.get(&node).map(|n| n.sources.clone()).unwrap_or_default()
    }
}

impl BufferGraph for MockHost {
    fn nodes(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    fn visual_node(&self) -> NodeId {
        self.visual.expect("mock host has no nodes")
    }

    fn document_node(&self) -> NodeId {
        self.document.expect("mock host has no nodes")
    }

    fn capabilities(&self, node: NodeId) -> NodeCapabilities {
        self.nodes.get(&node).map(|n| n.capabilities).unwrap_or_default()
    }

    fn roles(&self, node: NodeId) -> BufferRoles {
        self.nodes.get(&node).map(|n| n.roles).unwrap_or_default()
    }

    fn current_snapshot(&self, node: NodeId) -> Option<Arc<TextSnapshot>> {
        self.nodes.get(&node).map(|n| Arc::clone(&n.snapshot))
    }

    fn content_type(&self, node: NodeId) -> String {
        self.nodes
            .get(&node)
            .map(|n| n.content_type.clone())
            .unwrap_or_default()
    }

    fn encoding(&self, node: NodeId) -> Option<Encoding> {
        self.nodes.get(&node).and_then(|n| n.encoding.clone())
    }

    fn caret_position(&self, node: NodeId) -> Option<usize> {
        self.nodes.get(&node).and_then(|n| n.caret)
    }

    fn selection_spans(&self, node: NodeId) -> Vec<Span> {
        self.nodes.get(&node).map(|n| n.selection.clone()).unwrap_or_default()
    }

    fn read_only_extents(&self, node: NodeId) -> Vec<Span> {
        self.nodes.get(&node).map(|n| n.read_only.clone()).unwrap_or_default()
    }

    fn properties(&self, node: NodeId) -> Vec<PropertyEntry> {
        self.nodes
            .get(&node)
            .map(|n| n.properties.clone())
            .unwrap_or_default()
    }

    fn subscribe(&mut self, channel: Channel) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.insert(id, channel);
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    fn collect_garbage(&mut self) {
        self.collections += 1;
    }
}

impl TextView for MockHost {
    fn view_content_type(&self) -> String {
        self.view_content_type.clone()
    }

    fn view_roles(&self) -> Vec<String> {
        self.view_roles.clone()
    }

    fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    fn tags_over_selection(&self) -> Vec<TagSpan> {
        self.tags.clone()
    }
}
