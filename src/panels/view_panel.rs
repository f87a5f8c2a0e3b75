//! Text view state: content type, roles, layouts and viewport.

use crate::host::{Channel, EditorHost, Notification, SubscriptionId};
use crate::margin::{DiagnosticPanel, ElementId, PanelFactory, PanelView};

/// Builds [`ViewPanel`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct ViewPanelFactory;

impl PanelFactory for ViewPanelFactory {
    fn create_panel(&self, host: &dyn EditorHost) -> Box<dyn DiagnosticPanel> {
        Box::new(ViewPanel::new(host))
    }
}

/// Layout counters of a [`ViewPanel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutCounters {
    /// Layouts seen, including the initial one.
    pub layouts: u64,
    /// New or reformatted lines in the latest layout.
    pub new_or_reformatted: usize,
    /// Translated lines in the latest layout.
    pub translated: usize,
}

/// Shows the view's content type, roles, layout counters and viewport.
#[derive(Debug)]
pub struct ViewPanel {
    element: ElementId,
    content_type: String,
    roles: String,
    layout: LayoutCounters,
    viewport: (f64, f64),
    subscriptions: Vec<SubscriptionId>,
}

impl ViewPanel {
    /// Create a panel and read the view's current state.
    pub fn new(host: &dyn EditorHost) -> Self {
        let mut panel = Self {
            element: ElementId::next(),
            content_type: host.view_content_type(),
            roles: host.view_roles().join("  "),
            layout: LayoutCounters::default(),
            viewport: (0.0, 0.0),
            subscriptions: Vec::new(),
        };
        panel.on_layout(host, 0, 0);
        panel
    }

    /// Current layout counters.
    pub const fn layout(&self) -> LayoutCounters {
        self.layout
    }

    fn on_layout(&mut self, host: &dyn EditorHost, new_or_reformatted: usize, translated: usize) {
        self.layout.layouts += 1;
        self.layout.new_or_reformatted = new_or_reformatted;
        self.layout.translated = translated;
        self.viewport = host.viewport();
    }
}

impl DiagnosticPanel for ViewPanel {
    fn element(&self) -> ElementId {
        self.element
    }

    fn activate(&mut self, host: &mut dyn EditorHost) {
        if self.subscriptions.is_empty() {
            self.subscriptions = vec![
                host.subscribe(Channel::ViewContentTypeChanged),
                host.subscribe(Channel::LayoutChanged),
            ];
        }
    }

    fn inactivate(&mut self, host: &mut dyn EditorHost) {
        for id in self.subscriptions.drain(..) {
            host.unsubscribe(id);
        }
    }

    fn on_notification(&mut self, host: &dyn EditorHost, notification: &Notification) -> bool {
        if self.subscriptions.is_empty() {
            return false;
        }
        match notification {
            Notification::ViewContentTypeChanged => {
                self.content_type = host.view_content_type();
                true
            }
            Notification::LayoutChanged {
                new_or_reformatted,
                translated,
                ..
            } => {
                self.on_layout(host, *new_or_reformatted, *translated);
                true
            }
            _ => false,
        }
    }

    fn render(&self, _view: &PanelView<'_>) -> Vec<String> {
        vec![
            format!("Content Type: {}", self.content_type),
            format!("Roles: {}", self.roles),
            format!(
                "Layouts: {}  New: {}  Translated: {}",
                self.layout.layouts, self.layout.new_or_reformatted, self.layout.translated
            ),
            format!("Viewport: {}, {}", self.viewport.0, self.viewport.1),
        ]
    }
}
