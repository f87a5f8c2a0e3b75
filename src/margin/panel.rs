//! Contracts between the margin and the panels it hosts.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::graph::GraphSynchronizer;
use crate::host::{EditorHost, Notification};

use super::config::MarginConfig;

static NEXT_ELEMENT: AtomicU64 = AtomicU64::new(1);

/// Identity of a panel's visual element.
///
/// Unique for the life of the process, so a retained panel can be told
/// apart from a freshly constructed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(u64);

impl ElementId {
    /// Allocate a new identity.
    pub fn next() -> Self {
        Self(NEXT_ELEMENT.fetch_add(1, Ordering::Relaxed))
    }
}

/// What a panel sees while rendering.
#[derive(Clone, Copy)]
pub struct PanelView<'a> {
    /// The editor host.
    pub host: &'a dyn EditorHost,
    /// The shared synchronizer, present while any graph panel is active.
    pub synchronizer: Option<&'a GraphSynchronizer>,
    /// Margin configuration.
    pub config: &'a MarginConfig,
}

/// An optional diagnostic panel bound to one margin row.
pub trait DiagnosticPanel {
    /// Identity of the panel's visual element.
    fn element(&self) -> ElementId;

    /// Start observing whatever the panel shows.
    fn activate(&mut self, host: &mut dyn EditorHost);

    /// Stop observing and release transient resources.
    fn inactivate(&mut self, host: &mut dyn EditorHost);

    /// Inactivate, then release any retained state.
    fn close(&mut self, host: &mut dyn EditorHost) {
        self.inactivate(host);
    }

    /// React to a host notification; returns whether the panel changed.
    fn on_notification(&mut self, host: &dyn EditorHost, notification: &Notification) -> bool {
        let _ = (host, notification);
        false
    }

    /// Text lines of the panel, top to bottom.
    fn render(&self, view: &PanelView<'_>) -> Vec<String>;
}

/// Builds a panel on first activation of its slot.
pub trait PanelFactory {
    /// Construct the panel.
    fn create_panel(&self, host: &dyn EditorHost) -> Box<dyn DiagnosticPanel>;

    /// Whether the panel reads the shared [`GraphSynchronizer`].
    fn needs_buffer_graph(&self) -> bool {
        false
    }
}

/// A named panel factory, as supplied by the host's registry.
pub struct PanelDescriptor {
    /// Display name.
    pub name: String,
    /// Factory of the panel.
    pub factory: Box<dyn PanelFactory>,
}

impl PanelDescriptor {
    /// Create a descriptor.
    pub fn new(name: impl Into<String>, factory: impl PanelFactory + 'static) -> Self {
        Self {
            name: name.into(),
            factory: Box::new(factory),
        }
    }
}

impl std::fmt::Debug for PanelDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelDescriptor")
            .field("name", &self.name)
            .field("needs_buffer_graph", &self.factory.needs_buffer_graph())
            .finish()
    }
}
