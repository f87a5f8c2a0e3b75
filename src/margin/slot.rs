//! Lifecycle of one optional panel.
//!
//! # State Machine
//!
//! ```text
//!            toggle                toggle
//! Dormant ──────────▶ Active ◀──────────────▶ Suspended
//!   (panel built        │       toggle
//!    on first use)      │
//!                       ▼
//!            same instance on every resume
//! ```
//!
//! `Dormant` is never re-entered. A suspended panel stays alive so resuming
//! does not rebuild it.

use crate::error::{DiagnosticError, Result};
use crate::host::EditorHost;

use super::panel::{DiagnosticPanel, PanelDescriptor, PanelFactory};
use super::rows::MarginRows;

const NAME: &str = "panel slot";

/// State of a [`PanelSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    /// No panel constructed yet.
    #[default]
    Dormant,
    /// Panel shown and observing.
    Active,
    /// Panel hidden, instance retained.
    Suspended,
}

/// One panel kind bound to a fixed margin row.
pub struct PanelSlot {
    row: usize,
    name: String,
    factory: Box<dyn PanelFactory>,
    panel: Option<Box<dyn DiagnosticPanel>>,
    state: SlotState,
    closed: bool,
}

impl PanelSlot {
    /// Bind a descriptor to a row.
    pub fn new(row: usize, descriptor: PanelDescriptor) -> Self {
        Self {
            row,
            name: descriptor.name,
            factory: descriptor.factory,
            panel: None,
            state: SlotState::Dormant,
            closed: false,
        }
    }

    /// Row the slot occupies.
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Name of the panel kind.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state.
    pub const fn state(&self) -> SlotState {
        self.state
    }

    /// Whether the slot was closed.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether the panel reads the shared synchronizer.
    pub fn needs_buffer_graph(&self) -> bool {
        self.factory.needs_buffer_graph()
    }

    /// The panel, once constructed.
    pub fn panel(&self) -> Option<&dyn DiagnosticPanel> {
        self.panel.as_deref()
    }

    /// Mutable access to the panel, once constructed.
    pub fn panel_mut(&mut self) -> Option<&mut (dyn DiagnosticPanel + 'static)> {
        self.panel.as_deref_mut()
    }

    /// Advance the state machine by one toggle.
    pub fn toggle(&mut self, host: &mut dyn EditorHost, rows: &mut MarginRows) -> Result<SlotState> {
        if self.closed {
            return Err(DiagnosticError::AlreadyClosed(NAME));
        }

        let next = match self.state {
            SlotState::Dormant => {
                let mut panel = self.factory.create_panel(&*host);
                rows.insert(self.row, panel.element())?;
                panel.activate(host);
                self.panel = Some(panel);
                SlotState::Active
            }
            SlotState::Active => {
                let panel = self.retained()?;
                panel.inactivate(host);
                rows.remove(self.row);
                SlotState::Suspended
            }
            SlotState::Suspended => {
                let row = self.row;
                let panel = self.retained()?;
                rows.insert(row, panel.element())?;
                panel.activate(host);
                SlotState::Active
            }
        };

        tracing::debug!(slot = %self.name, row = self.row, from = ?self.state, to = ?next, "panel toggled");
        self.state = next;
        Ok(next)
    }

    /// Close the panel and release it.
    ///
    /// Closing twice does nothing.
    pub fn close(&mut self, host: &mut dyn EditorHost, rows: &mut MarginRows) {
        if self.closed {
            return;
        }
        if let Some(mut panel) = self.panel.take() {
            match self.state {
                SlotState::Active => {
                    panel.close(host);
                    rows.remove(self.row);
                }
                // Already inactivated; only retained state is left to release.
                SlotState::Suspended | SlotState::Dormant => {}
            }
        }
        self.closed = true;
        tracing::debug!(slot = %self.name, "panel slot closed");
    }

    fn retained(&mut self) -> Result<&mut Box<dyn DiagnosticPanel>> {
        let state = self.state;
        self.panel.as_mut().ok_or_else(|| {
            let err = DiagnosticError::InvariantViolation(format!(
                "slot in state {state:?} holds no panel"
            ));
            tracing::error!(error = %err, "invariant violation");
            err
        })
    }
}

impl std::fmt::Debug for PanelSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelSlot")
            .field("row", &self.row)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
