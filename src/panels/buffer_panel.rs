//! One bar per buffer node, visual node on top.

use crate::format::BarLine;
use crate::graph::{BufferDiagnostics, BufferObserver, ReadOnlyRegionTracker};
use crate::host::EditorHost;
use crate::margin::{DiagnosticPanel, ElementId, MarginConfig, PanelFactory, PanelView};

/// Builds [`BufferPanel`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct BufferPanelFactory;

impl PanelFactory for BufferPanelFactory {
    fn create_panel(&self, _host: &dyn EditorHost) -> Box<dyn DiagnosticPanel> {
        Box::new(BufferPanel::new())
    }

    fn needs_buffer_graph(&self) -> bool {
        true
    }
}

/// Per-node diagnostics of the shared synchronizer.
///
/// The panel owns no subscriptions: observers belong to the synchronizer
/// the margin lends it while active.
#[derive(Debug)]
pub struct BufferPanel {
    element: ElementId,
}

impl BufferPanel {
    /// Create a panel.
    pub fn new() -> Self {
        Self {
            element: ElementId::next(),
        }
    }

    /// Bar of one node.
    ///
    /// Highlighted read-only extents show up in the right section while the
    /// node's tracker is active.
    pub fn bar(
        observer: &BufferObserver,
        read_only: Option<&ReadOnlyRegionTracker>,
        config: &MarginConfig,
    ) -> BarLine {
        let diag: &BufferDiagnostics = observer.diagnostics();
        let placeholder = config.placeholder.as_str();

        let left = format!(
            "{} {}  V {}  R {}",
            observer.node(),
            diag.content_type,
            diag.version,
            diag.reiterated_version
        );
        let center = format!(
            "Pos {}  Len {}  Sel {}",
            diag.caret.label(placeholder),
            diag.length,
            diag.selection.label(placeholder)
        );

        let mut right = Vec::new();
        if let Some(spans) = diag.projection_spans {
            right.push(format!("Spans {spans}"));
        }
        if let Some(encoding) = &diag.encoding {
            right.push(encoding.clone());
        }
        if let Some(extents) = read_only.and_then(ReadOnlyRegionTracker::label) {
            right.push(format!("RO {extents}"));
        }
        right.push(diag.role_tip.clone());

        BarLine::new(left, center, right.join("  "))
    }
}

impl Default for BufferPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticPanel for BufferPanel {
    fn element(&self) -> ElementId {
        self.element
    }

    fn activate(&mut self, _host: &mut dyn EditorHost) {}

    fn inactivate(&mut self, _host: &mut dyn EditorHost) {}

    fn render(&self, view: &PanelView<'_>) -> Vec<String> {
        let Some(sync) = view.synchronizer else {
            return Vec::new();
        };
        let regions = sync.read_only_regions();
        sync.observers_in_order()
            .rev()
            .map(|observer| {
                Self::bar(observer, regions.get(observer.node()), view.config)
                    .render(view.config.bar_width)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphSynchronizer;
    use crate::host::mock::MockHost;
    use crate::host::{BufferRoles, Encoding, Span};

    #[test]
    fn test_bar_sections() {
        let mut host = MockHost::new();
        let doc = host.add_document(0, "CSharp", Encoding::new(65001, "Unicode (UTF-8)"));
        let view = host.add_projection(1, "projection", &[doc]);
        host.set_roles(view, BufferRoles::EDIT | BufferRoles::VISUAL);
        host.set_caret(view, None);
        host.set_selection(doc, vec![Span::new(4, 2)]);

        let mut sync = GraphSynchronizer::new();
        sync.initialize(&mut host).unwrap();
        let config = MarginConfig::default();

        let bar = BufferPanel::bar(sync.observer(doc).unwrap(), None, &config);
        assert_eq!(bar.left(), "#0 CSharp  V 1  R 1");
        assert_eq!(bar.center(), "Pos 0  Len 0  Sel [4..6)");
        assert_eq!(bar.right(), "65001: Unicode (UTF-8)  Document Buffer");

        let bar = BufferPanel::bar(sync.observer(view).unwrap(), None, &config);
        assert_eq!(bar.center(), "Pos -  Len 0  Sel -");
        assert_eq!(bar.right(), "Spans 1  Edit Buffer,Visual Buffer");
    }

    #[test]
    fn test_render_puts_visual_on_top() {
        let mut host = MockHost::new();
        let d = host.add_leaf(0, "text");
        let x = host.add_leaf(1, "text");
        host.add_projection(2, "projection", &[d, x]);

        let mut sync = GraphSynchronizer::new();
        sync.initialize(&mut host).unwrap();
        let config = MarginConfig::default().with_bar_width(60);
        let panel = BufferPanel::new();
        let view = PanelView {
            host: &host,
            synchronizer: Some(&sync),
            config: &config,
        };

        let lines = panel.render(&view);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#2 projection"));
        assert!(lines[1].starts_with("#1 text"));
        assert!(lines[2].starts_with("#0 text"));
        assert!(lines.iter().all(|line| line.chars().count() == 60));
    }

    #[test]
    fn test_bar_shows_highlighted_read_only_extents() {
        let mut host = MockHost::new();
        let doc = host.add_document(0, "text", Encoding::new(65001, "Unicode (UTF-8)"));
        host.set_read_only(doc, vec![Span::new(0, 3)]);

        let mut sync = GraphSynchronizer::new();
        sync.initialize(&mut host).unwrap();
        let config = MarginConfig::default();

        sync.set_read_only_highlight(&mut host, doc, true).unwrap();
        let bar = BufferPanel::bar(
            sync.observer(doc).unwrap(),
            sync.read_only_regions().get(doc),
            &config,
        );
        assert_eq!(
            bar.right(),
            "65001: Unicode (UTF-8)  RO [0..3)  Document Buffer"
        );

        sync.set_read_only_highlight(&mut host, doc, false).unwrap();
        let bar = BufferPanel::bar(
            sync.observer(doc).unwrap(),
            sync.read_only_regions().get(doc),
            &config,
        );
        assert_eq!(bar.right(), "65001: Unicode (UTF-8)  Document Buffer");
    }

    #[test]
    fn test_render_without_synchronizer_is_empty() {
        let host = MockHost::new();
        let config = MarginConfig::default();
        let view = PanelView {
            host: &host,
            synchronizer: None,
            config: &config,
        };
        assert!(BufferPanel::new().render(&view).is_empty());
    }
}
