//! Keeps one observer per graph node and the display order current.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──initialize()──▶ Initialized ──teardown()──▶ TornDown
//!                                   │     ▲
//!                 GraphBuffersChanged│     │ recompute order
//!                                   ▼     │
//!                            on_topology_changed()
//! ```
//!
//! A torn down synchronizer stays torn down; every later operation except
//! `teardown` fails with [`DiagnosticError::AlreadyClosed`].

use std::collections::{HashMap, HashSet};

use crate::error::{DiagnosticError, Result};
use crate::host::{BufferGraph, Channel, NodeId, Notification, SubscriptionId};

use super::observer::BufferObserver;
use super::read_only::ReadOnlyRegions;
use super::sorter::{DisplayOrder, GraphSorter};

const NAME: &str = "graph synchronizer";

/// Lifecycle state of a [`GraphSynchronizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Created, not yet attached to a graph.
    #[default]
    Uninitialized,
    /// Observing the graph.
    Initialized,
    /// Detached for good.
    TornDown,
}

/// Owner of the observer set for one buffer graph.
#[derive(Debug, Default)]
pub struct GraphSynchronizer {
    state: SyncState,
    observers: HashMap<NodeId, BufferObserver>,
    topology: Option<SubscriptionId>,
    order: DisplayOrder,
    read_only: ReadOnlyRegions,
}

impl GraphSynchronizer {
    /// Create an uninitialized synchronizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> SyncState {
        self.state
    }

    /// Attach an observer to every node and start listening for topology changes.
    pub fn initialize<G: BufferGraph + ?Sized>(&mut self, graph: &mut G) -> Result<()> {
        match self.state {
            SyncState::Initialized => return Err(defect(DiagnosticError::AlreadyInitialized)),
            SyncState::TornDown => return Err(DiagnosticError::AlreadyClosed(NAME)),
            SyncState::Uninitialized => {}
        }

        for node in graph.nodes() {
            let mut observer = BufferObserver::new(&*graph, node);
            observer.attach(graph);
            self.observers.insert(node, observer);
        }
        self.topology = Some(graph.subscribe(Channel::GraphBuffersChanged));
        self.recompute_order(&*graph);
        self.state = SyncState::Initialized;

        tracing::debug!(
            nodes = self.observers.len(),
            ordered = self.order.len(),
            "graph synchronizer initialized"
        );
        Ok(())
    }

    /// Apply a topology change reported by the host.
    ///
    /// The change is validated before anything is touched: removing an
    /// unobserved node or adding an observed one fails and leaves the
    /// synchronizer as it was. A node may be removed and re-added in the same
    /// change; it gets a fresh observer.
    pub fn on_topology_changed<G: BufferGraph + ?Sized>(
        &mut self,
        graph: &mut G,
        removed: &[NodeId],
        added: &[NodeId],
    ) -> Result<()> {
        self.ensure_initialized()?;

        let mut seen = HashSet::new();
        for &node in removed {
            if !self.observers.contains_key(&node) || !seen.insert(node) {
                return Err(defect(DiagnosticError::UntrackedNode(node)));
            }
        }
        let mut seen = HashSet::new();
        for &node in added {
            let observed = self.observers.contains_key(&node) && !removed.contains(&node);
            if observed || !seen.insert(node) {
                return Err(defect(DiagnosticError::DuplicateNode(node)));
            }
        }

        for node in removed {
            if let Some(mut observer) = self.observers.remove(node) {
                observer.detach(graph, &mut self.read_only);
            }
            self.read_only.remove(graph, *node);
        }
        for &node in added {
            let mut observer = BufferObserver::new(&*graph, node);
            observer.attach(graph);
            self.observers.insert(node, observer);
        }
        self.recompute_order(&*graph);

        tracing::debug!(
            removed = removed.len(),
            added = added.len(),
            ordered = self.order.len(),
            "graph topology changed"
        );
        Ok(())
    }

    /// Stop listening and detach every observer.
    ///
    /// Calling this again, or before `initialize`, does nothing beyond
    /// marking the synchronizer closed.
    pub fn teardown<G: BufferGraph + ?Sized>(&mut self, graph: &mut G) {
        if self.state == SyncState::TornDown {
            return;
        }
        if let Some(id) = self.topology.take() {
            graph.unsubscribe(id);
        }
        for (_, mut observer) in self.observers.drain() {
            observer.detach(graph, &mut self.read_only);
        }
        self.read_only.clear(graph);
        self.order = DisplayOrder::default();
        self.state = SyncState::TornDown;
        tracing::debug!("graph synchronizer torn down");
    }

    /// Route one notification; returns whether anything consumed it.
    pub fn dispatch<G: BufferGraph + ?Sized>(
        &mut self,
        graph: &mut G,
        notification: &Notification,
    ) -> Result<bool> {
        self.ensure_initialized()?;
        tracing::trace!(channel = ?notification.channel(), "synchronizer dispatch");

        match notification {
            Notification::GraphBuffersChanged { removed, added } => {
                self.on_topology_changed(graph, removed, added)?;
                Ok(true)
            }
            Notification::ReadOnlyRegionsChanged { node } => {
                Ok(self.read_only.get_mut(*node).map_or(false, |tracker| {
                    tracker.refresh(&*graph);
                    tracker.is_active()
                }))
            }
            Notification::CaretMoved | Notification::SelectionChanged => {
                let mut handled = false;
                for observer in self.observers.values_mut() {
                    handled |= observer.handle(&*graph, notification);
                }
                Ok(handled)
            }
            Notification::LayoutChanged { .. } | Notification::ViewContentTypeChanged => Ok(false),
            _ => {
                let Some(node) = notification.channel().node() else {
                    return Ok(false);
                };
                match self.observers.get_mut(&node) {
                    Some(observer) => Ok(observer.handle(&*graph, notification)),
                    None => {
                        tracing::warn!(%node, "notification for unobserved node");
                        Ok(false)
                    }
                }
            }
        }
    }

    /// Observer of a node.
    pub fn observer(&self, node: NodeId) -> Option<&BufferObserver> {
        self.observers.get(&node)
    }

    /// Observers of displayable nodes, sources first.
    pub fn observers_in_order(&self) -> impl DoubleEndedIterator<Item = &BufferObserver> + '_ {
        self.order.iter().filter_map(|node| self.observers.get(&node))
    }

    /// Current display order.
    pub const fn display_order(&self) -> &DisplayOrder {
        &self.order
    }

    /// Number of observed nodes.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Check if no node is observed.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Read-only highlighting registry.
    pub const fn read_only_regions(&self) -> &ReadOnlyRegions {
        &self.read_only
    }

    /// Switch read-only highlighting of an observed node.
    pub fn set_read_only_highlight<G: BufferGraph + ?Sized>(
        &mut self,
        graph: &mut G,
        node: NodeId,
        active: bool,
    ) -> Result<()> {
        self.ensure_observed(node)?;
        self.read_only.get_or_create(node).set_active(graph, active);
        Ok(())
    }

    /// Collect host garbage, then list the node's live snapshot versions.
    pub fn sweep_snapshots<G: BufferGraph + ?Sized>(
        &mut self,
        graph: &mut G,
        node: NodeId,
    ) -> Result<Vec<u64>> {
        self.ensure_observed(node)?;
        let observer = self
            .observers
            .get_mut(&node)
            .ok_or(DiagnosticError::UntrackedNode(node))?;
        Ok(observer.sweep_snapshots(graph))
    }

    /// Property bag of an observed node, one line per entry.
    pub fn property_dump<G: BufferGraph + ?Sized>(&self, graph: &G, node: NodeId) -> Result<Vec<String>> {
        self.ensure_observed(node)?;
        self.observers
            .get(&node)
            .map(|observer| observer.property_dump(graph))
            .ok_or(DiagnosticError::UntrackedNode(node))
    }

    fn recompute_order<G: BufferGraph + ?Sized>(&mut self, graph: &G) {
        self.order = GraphSorter::compute_order(graph, graph.visual_node(), graph.document_node());
    }

    fn ensure_initialized(&self) -> Result<()> {
        match self.state {
            SyncState::Initialized => Ok(()),
            SyncState::TornDown => Err(DiagnosticError::AlreadyClosed(NAME)),
            SyncState::Uninitialized => Err(defect(DiagnosticError::InvariantViolation(
                "graph synchronizer used before initialize".to_string(),
            ))),
        }
    }

    fn ensure_observed(&self, node: NodeId) -> Result<()> {
        self.ensure_initialized()?;
        if self.observers.contains_key(&node) {
            Ok(())
        } else {
            Err(defect(DiagnosticError::UntrackedNode(node)))
        }
    }
}

/// Log a defect before handing it to the caller.
fn defect(err: DiagnosticError) -> DiagnosticError {
    tracing::error!(error = %err, "invariant violation");
    err
}
