//! Probe panel for margin tests.

use std::cell::Cell;
use std::rc::Rc;

use crate::host::{Channel, EditorHost, Notification, SubscriptionId};

use super::panel::{DiagnosticPanel, ElementId, PanelFactory, PanelView};

/// Counters shared between a factory, its panel and the test.
#[derive(Debug, Clone, Default)]
pub(crate) struct Probe {
    built: Rc<Cell<usize>>,
    activations: Rc<Cell<usize>>,
    closes: Rc<Cell<usize>>,
}

impl Probe {
    pub(crate) fn built(&self) -> usize {
        self.built.get()
    }

    pub(crate) fn activations(&self) -> usize {
        self.activations.get()
    }

    pub(crate) fn closes(&self) -> usize {
        self.closes.get()
    }
}

pub(crate) struct ProbeFactory {
    probe: Probe,
    needs_graph: bool,
}

impl ProbeFactory {
    pub(crate) fn new(probe: &Probe) -> Self {
        Self {
            probe: probe.clone(),
            needs_graph: false,
        }
    }

    pub(crate) fn with_graph(mut self) -> Self {
        self.needs_graph = true;
        self
    }
}

impl PanelFactory for ProbeFactory {
    fn create_panel(&self, _host: &dyn EditorHost) -> Box<dyn DiagnosticPanel> {
        self.probe.built.set(self.probe.built.get() + 1);
        Box::new(ProbePanel {
            element: ElementId::next(),
            probe: self.probe.clone(),
            subscription: None,
            caret_moves: 0,
        })
    }

    fn needs_buffer_graph(&self) -> bool {
        self.needs_graph
    }
}

/// Listens to caret moves while active.
struct ProbePanel {
    element: ElementId,
    probe: Probe,
    subscription: Option<SubscriptionId>,
    caret_moves: usize,
}

impl DiagnosticPanel for ProbePanel {
    fn element(&self) -> ElementId {
        self.element
    }

    fn activate(&mut self, host: &mut dyn EditorHost) {
        self.probe.activations.set(self.probe.activations.get() + 1);
        self.subscription = Some(host.subscribe(Channel::CaretMoved));
    }

    fn inactivate(&mut self, host: &mut dyn EditorHost) {
        if let Some(id) = self.subscription.take() {
            host.unsubscribe(id);
        }
    }

    fn close(&mut self, host: &mut dyn EditorHost) {
        self.probe.closes.set(self.probe.closes.get() + 1);
        self.inactivate(host);
    }

    fn on_notification(&mut self, _host: &dyn EditorHost, notification: &Notification) -> bool {
        if matches!(notification, Notification::CaretMoved) {
            self.caret_moves += 1;
            return true;
        }
        false
    }

    fn render(&self, view: &PanelView<'_>) -> Vec<String> {
        let mut lines = vec![format!("caret moves: {}", self.caret_moves)];
        if let Some(sync) = view.synchronizer {
            lines.push(format!("nodes: {}", sync.display_order().len()));
        }
        lines
    }
}
