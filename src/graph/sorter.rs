//! Display ordering of the buffer graph.
//!
//! Nodes are listed sources first, dependents after, starting from the
//! document node when it is a plain buffer. Only nodes reachable from the
//! visual or document node are listed.

use std::collections::HashSet;

use crate::host::{NodeId, Topology};

/// Nodes in display order, each exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayOrder {
    nodes: Vec<NodeId>,
}

impl DisplayOrder {
    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the order is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position of a node in the order.
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.nodes.iter().position(|&n| n == node)
    }

    /// Iterate in display order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// The ordered nodes.
    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }
}

impl From<Vec<NodeId>> for DisplayOrder {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self { nodes }
    }
}

/// Computes [`DisplayOrder`] for a graph.
pub struct GraphSorter;

impl GraphSorter {
    /// Order the graph rooted at `visual` for display.
    ///
    /// A plain (non-composite) document node comes first. When the document
    /// node is itself composite, ordering starts directly at `visual` and the
    /// document node gets no special position.
    pub fn compute_order<T: Topology + ?Sized>(
        graph: &T,
        visual: NodeId,
        document: NodeId,
    ) -> DisplayOrder {
        let mut result = Vec::new();
        let mut processed = HashSet::new();

        if graph.is_composite(document) {
            // TODO: a view built over an intermediate composite buffer reports
            // that buffer as the document; decide whether it should lead the order.
            Self::traverse(graph, visual, &mut result, &mut processed);
        } else {
            result.push(document);
            processed.insert(document);
            if visual != document {
                Self::traverse(graph, visual, &mut result, &mut processed);
            }
        }

        DisplayOrder { nodes: result }
    }

    /// Post-order walk over declared sources.
    fn traverse<T: Topology + ?Sized>(
        graph: &T,
        node: NodeId,
        result: &mut Vec<NodeId>,
        processed: &mut HashSet<NodeId>,
    ) {
        processed.insert(node);
        if graph.is_composite(node) {
            for source in graph.sources(node) {
                if !processed.contains(&source) {
                    Self::traverse(graph, source, result, processed);
                }
            }
        }
        result.push(node);
    }
}
