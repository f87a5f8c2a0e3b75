//! Read-only region highlighting per node.
//!
//! One tracker per node, created on first use. An active tracker listens to
//! the node's read-only-regions channel and caches the current extents so a
//! renderer can highlight them.

use std::collections::HashMap;

use crate::host::{BufferGraph, Channel, NodeId, Span, SubscriptionId};

/// Highlighting state of one node's read-only regions.
#[derive(Debug)]
pub struct ReadOnlyRegionTracker {
    node: NodeId,
    subscription: Option<SubscriptionId>,
    extents: Vec<Span>,
}

impl ReadOnlyRegionTracker {
    fn new(node: NodeId) -> Self {
        Self {
            node,
            subscription: None,
            extents: Vec::new(),
        }
    }

    /// Whether highlighting is on.
    pub const fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Turn highlighting on or off.
    ///
    /// Changing state (un)subscribes and refreshes the extents; setting the
    /// current state again does nothing.
    pub fn set_active<G: BufferGraph + ?Sized>(&mut self, graph: &mut G, active: bool) {
        if active == self.is_active() {
            return;
        }
        if active {
            self.subscription = Some(graph.subscribe(Channel::ReadOnlyRegionsChanged(self.node)));
        } else if let Some(id) = self.subscription.take() {
            graph.unsubscribe(id);
        }
        tracing::debug!(node = %self.node, active, "read-only highlighting toggled");
        self.refresh(&*graph);
    }

    /// Re-read the extents after a read-only-regions notification.
    pub fn refresh<G: BufferGraph + ?Sized>(&mut self, graph: &G) {
        self.extents = if self.is_active() {
            graph.read_only_extents(self.node)
        } else {
            Vec::new()
        };
    }

    /// Extents to highlight, empty while inactive.
    pub fn extents(&self) -> &[Span] {
        &self.extents
    }

    /// Extents as `[a..b),[c..d)`, or `None` when there is nothing to show.
    pub fn label(&self) -> Option<String> {
        if self.extents.is_empty() {
            return None;
        }
        let spans: Vec<String> = self.extents.iter().map(ToString::to_string).collect();
        Some(spans.join(","))
    }
}

/// Registry of trackers keyed by node.
#[derive(Debug, Default)]
pub struct ReadOnlyRegions {
    trackers: HashMap<NodeId, ReadOnlyRegionTracker>,
}

impl ReadOnlyRegions {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The node's tracker, created inactive if missing.
    pub fn get_or_create(&mut self, node: NodeId) -> &mut ReadOnlyRegionTracker {
        self.trackers
            .entry(node)
            .or_insert_with(|| ReadOnlyRegionTracker::new(node))
    }

    /// The node's tracker, if one was ever created.
    pub fn get(&self, node: NodeId) -> Option<&ReadOnlyRegionTracker> {
        self.trackers.get(&node)
    }

    /// Mutable access to an existing tracker.
    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut ReadOnlyRegionTracker> {
        self.trackers.get_mut(&node)
    }

    /// Deactivate and forget the node's tracker.
    pub fn remove<G: BufferGraph + ?Sized>(&mut self, graph: &mut G, node: NodeId) {
        if let Some(mut tracker) = self.trackers.remove(&node) {
            tracker.set_active(graph, false);
        }
    }

    /// Deactivate and forget every tracker.
    pub fn clear<G: BufferGraph + ?Sized>(&mut self, graph: &mut G) {
        for (_, mut tracker) in self.trackers.drain() {
            tracker.set_active(graph, false);
        }
    }

    /// Number of trackers.
    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    /// Check if no tracker exists.
    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}
