//! The diagnostic margin and its panel lifecycle.
//!
//! A [`PanelHost`] owns one [`PanelSlot`] per registered panel kind, each on
//! a fixed row of [`MarginRows`]. Slots toggle independently; panels that
//! declare [`PanelFactory::needs_buffer_graph`] share one
//! [`GraphSynchronizer`](crate::graph::GraphSynchronizer) lent by the host.
//!
//! # Architecture
//!
//! ```text
//!   toggle(row)                 pump()
//!       │                         │
//!       ▼                         ▼
//! ┌───────────┐  lease   ┌───────────────────┐
//! │ PanelHost │ ───────▶ │ GraphSynchronizer │
//! └───────────┘          └───────────────────┘
//!       │ 1..n
//!       ▼
//! ┌───────────┐  build once  ┌─────────────────┐
//! │ PanelSlot │ ───────────▶ │ DiagnosticPanel │
//! └───────────┘              └─────────────────┘
//! ```

mod config;
mod host;
mod panel;
mod rows;
mod slot;

#[cfg(test)]
pub(crate) mod fixtures;

pub use config::MarginConfig;
pub use host::PanelHost;
pub use panel::{DiagnosticPanel, ElementId, PanelDescriptor, PanelFactory, PanelView};
pub use rows::{MarginRows, Row};
pub use slot::{PanelSlot, SlotState};
