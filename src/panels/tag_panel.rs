//! Tags intersecting the selection, grouped by kind.

use std::collections::BTreeMap;

use crate::format::TagSpan;
use crate::host::{Channel, EditorHost, Notification, SubscriptionId};
use crate::margin::{DiagnosticPanel, ElementId, PanelFactory, PanelView};

/// Builds [`TagPanel`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct TagPanelFactory;

impl PanelFactory for TagPanelFactory {
    fn create_panel(&self, _host: &dyn EditorHost) -> Box<dyn DiagnosticPanel> {
        Box::new(TagPanel::new())
    }
}

/// Tags of one kind.
#[derive(Debug, Clone, PartialEq)]
pub struct TagGroup {
    /// Kind name, e.g. `ClassificationTag`.
    pub kind: String,
    /// Tags in host order.
    pub tags: Vec<TagSpan>,
}

impl TagGroup {
    /// Header line, `Kind (count)`.
    pub fn header(&self) -> String {
        format!("{} ({})", self.kind, self.tags.len())
    }
}

/// Lists the tags over the current selection.
#[derive(Debug)]
pub struct TagPanel {
    element: ElementId,
    groups: Vec<TagGroup>,
    subscriptions: Vec<SubscriptionId>,
}

impl TagPanel {
    /// Create an empty panel.
    pub fn new() -> Self {
        Self {
            element: ElementId::next(),
            groups: Vec::new(),
            subscriptions: Vec::new(),
        }
    }

    /// Current groups, sorted by kind name.
    pub fn groups(&self) -> &[TagGroup] {
        &self.groups
    }

    /// Group tags by kind name.
    pub fn group(tags: Vec<TagSpan>) -> Vec<TagGroup> {
        let mut by_kind: BTreeMap<String, Vec<TagSpan>> = BTreeMap::new();
        for tag in tags {
            by_kind
                .entry(tag.kind.kind_name().to_string())
                .or_default()
                .push(tag);
        }
        by_kind
            .into_iter()
            .map(|(kind, tags)| TagGroup { kind, tags })
            .collect()
    }

    /// One line per tag, `Tag: <description>, Span: <span>`.
    pub fn tag_line(tag: &TagSpan) -> String {
        match tag.kind.description() {
            Some(description) => format!("Tag: {description}, Span: {}", tag.span),
            None => format!("Span: {}", tag.span),
        }
    }

    fn update(&mut self, host: &dyn EditorHost) {
        self.groups = Self::group(host.tags_over_selection());
    }
}

impl Default for TagPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticPanel for TagPanel {
    fn element(&self) -> ElementId {
        self.element
    }

    fn activate(&mut self, host: &mut dyn EditorHost) {
        if self.subscriptions.is_empty() {
            self.subscriptions = vec![
                host.subscribe(Channel::SelectionChanged),
                host.subscribe(Channel::LayoutChanged),
            ];
        }
        self.update(&*host);
    }

    fn inactivate(&mut self, host: &mut dyn EditorHost) {
        for id in self.subscriptions.drain(..) {
            host.unsubscribe(id);
        }
    }

    fn close(&mut self, host: &mut dyn EditorHost) {
        self.inactivate(host);
        self.groups.clear();
    }

    fn on_notification(&mut self, host: &dyn EditorHost, notification: &Notification) -> bool {
        if self.subscriptions.is_empty() {
            return false;
        }
        match notification {
            Notification::SelectionChanged
            | Notification::LayoutChanged {
                snapshot_changed: true,
                ..
            } => {
                self.update(host);
                true
            }
            _ => false,
        }
    }

    fn render(&self, _view: &PanelView<'_>) -> Vec<String> {
        let mut lines = Vec::new();
        for group in &self.groups {
            lines.push(group.header());
            for tag in &group.tags {
                lines.push(format!("  {}", Self::tag_line(tag)));
                if let Some(tooltip) = tag.kind.tooltip() {
                    lines.push(format!("    Tooltip: {tooltip}"));
                }
            }
        }
        lines
    }
}
