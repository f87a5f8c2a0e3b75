//! Built-in diagnostic panels.
//!
//! - [`BufferPanel`]: one bar per buffer node, visual node on top.
//! - [`ViewPanel`]: view content type, roles, layout counters and viewport.
//! - [`TagPanel`]: tags over the selection grouped by kind.

mod buffer_panel;
mod tag_panel;
mod view_panel;

pub use buffer_panel::{BufferPanel, BufferPanelFactory};
pub use tag_panel::{TagGroup, TagPanel, TagPanelFactory};
pub use view_panel::{LayoutCounters, ViewPanel, ViewPanelFactory};

use crate::margin::PanelDescriptor;

/// Descriptors of the built-in panels, in their usual margin order.
pub fn builtin() -> Vec<PanelDescriptor> {
    vec![
        PanelDescriptor::new("Buffers", BufferPanelFactory),
        PanelDescriptor::new("View", ViewPanelFactory),
        PanelDescriptor::new("Tags", TagPanelFactory),
    ]
}
