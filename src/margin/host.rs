//! The margin: one slot per registered panel kind and the shared synchronizer.

use crate::error::{DiagnosticError, Result};
use crate::graph::GraphSynchronizer;
use crate::host::{EditorHost, Notification, NotificationQueue, NotificationSender};

use super::config::MarginConfig;
use super::panel::{PanelDescriptor, PanelView};
use super::rows::MarginRows;
use super::slot::{PanelSlot, SlotState};

const NAME: &str = "panel host";

/// Hosts the diagnostic panels of one text view.
///
/// Descriptors arrive already filtered and ordered; slot `i` is bound to
/// row `i`. The [`GraphSynchronizer`] is built when the first panel that
/// needs it activates and dropped when the last one suspends.
pub struct PanelHost {
    config: MarginConfig,
    slots: Vec<PanelSlot>,
    rows: MarginRows,
    synchronizer: Option<GraphSynchronizer>,
    leases: usize,
    queue: NotificationQueue,
    /// Queued before the current synchronizer was built; panels only.
    backlog: Vec<Notification>,
    closed: bool,
}

impl PanelHost {
    /// Create a margin with one dormant slot per descriptor.
    pub fn new(config: MarginConfig, descriptors: Vec<PanelDescriptor>) -> Self {
        let slots: Vec<PanelSlot> = descriptors
            .into_iter()
            .enumerate()
            .map(|(row, descriptor)| PanelSlot::new(row, descriptor))
            .collect();
        Self {
            config,
            rows: MarginRows::new(slots.len()),
            slots,
            synchronizer: None,
            leases: 0,
            queue: NotificationQueue::new(),
            backlog: Vec::new(),
            closed: false,
        }
    }

    /// Margin configuration.
    pub const fn config(&self) -> &MarginConfig {
        &self.config
    }

    /// Sender the host raises notifications through.
    pub fn sender(&self) -> Result<NotificationSender> {
        self.ensure_open()?;
        Ok(self.queue.sender())
    }

    /// Number of panel slots.
    pub fn panel_count(&self) -> Result<usize> {
        self.ensure_open()?;
        Ok(self.slots.len())
    }

    /// Slot bound to a row.
    pub fn slot(&self, row: usize) -> Result<&PanelSlot> {
        self.ensure_open()?;
        self.slots.get(row).ok_or(DiagnosticError::RowOutOfRange {
            row,
            count: self.slots.len(),
        })
    }

    /// State of the slot bound to a row.
    pub fn slot_state(&self, row: usize) -> Result<SlotState> {
        self.slot(row).map(PanelSlot::state)
    }

    /// The margin rows.
    pub fn rows(&self) -> Result<&MarginRows> {
        self.ensure_open()?;
        Ok(&self.rows)
    }

    /// Rows changed since the last call.
    pub fn take_dirty_rows(&mut self) -> Result<Vec<usize>> {
        self.ensure_open()?;
        let dirty = self.rows.dirty_rows().collect();
        self.rows.clear_dirty();
        Ok(dirty)
    }

    /// The shared synchronizer, while any graph panel is active.
    pub fn synchronizer(&self) -> Result<Option<&GraphSynchronizer>> {
        self.ensure_open()?;
        Ok(self.synchronizer.as_ref())
    }

    /// Mutable access to the shared synchronizer.
    pub fn synchronizer_mut(&mut self) -> Result<Option<&mut GraphSynchronizer>> {
        self.ensure_open()?;
        Ok(self.synchronizer.as_mut())
    }

    /// Number of active panels holding the synchronizer.
    pub fn leases(&self) -> Result<usize> {
        self.ensure_open()?;
        Ok(self.leases)
    }

    /// Toggle the panel in `row`.
    pub fn toggle(&mut self, row: usize, host: &mut dyn EditorHost) -> Result<SlotState> {
        self.ensure_open()?;
        let count = self.slots.len();
        let slot = self
            .slots
            .get(row)
            .ok_or(DiagnosticError::RowOutOfRange { row, count })?;
        let needs_graph = slot.needs_buffer_graph();
        let activating = slot.state() != SlotState::Active;

        if needs_graph && activating {
            self.acquire(host)?;
        }

        let result = self.slots[row].toggle(host, &mut self.rows);

        match &result {
            Ok(SlotState::Suspended) if needs_graph => self.release(host),
            Err(_) if needs_graph && activating => self.release(host),
            _ => {}
        }
        result
    }

    /// Dispatch every queued notification.
    ///
    /// All notifications are processed even if one fails; the first failure
    /// is returned. Returns the number of notifications dispatched.
    ///
    /// Notifications queued before the current synchronizer was built reach
    /// the panels only: the synchronizer read the graph after they were
    /// raised.
    pub fn pump(&mut self, host: &mut dyn EditorHost) -> Result<usize> {
        self.ensure_open()?;
        let backlog = std::mem::take(&mut self.backlog);
        let pending = self.queue.drain();
        let mut first_error = None;
        let stamped = backlog
            .iter()
            .map(|notification| (notification, false))
            .chain(pending.iter().map(|notification| (notification, true)));
        for (notification, fresh) in stamped {
            if let Err(err) = self.deliver(host, notification, fresh) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(backlog.len() + pending.len()), Err)
    }

    /// Dispatch one notification: synchronizer first, then active panels.
    pub fn dispatch(&mut self, host: &mut dyn EditorHost, notification: &Notification) -> Result<()> {
        self.ensure_open()?;
        self.deliver(host, notification, true)
    }

    fn deliver(
        &mut self,
        host: &mut dyn EditorHost,
        notification: &Notification,
        to_synchronizer: bool,
    ) -> Result<()> {
        let graph_changed = match self.synchronizer.as_mut() {
            Some(sync) if to_synchronizer => sync.dispatch(host, notification)?,
            _ => false,
        };

        for slot in &mut self.slots {
            if slot.state() != SlotState::Active {
                continue;
            }
            let row = slot.row();
            let needs_graph = slot.needs_buffer_graph();
            let changed = slot
                .panel_mut()
                .is_some_and(|panel| panel.on_notification(&*host, notification));
            if changed || (graph_changed && needs_graph) {
                self.rows.mark_dirty(row);
            }
        }
        Ok(())
    }

    /// Lines of every active panel, keyed by row.
    pub fn render(&self, host: &dyn EditorHost) -> Result<Vec<(usize, Vec<String>)>> {
        self.ensure_open()?;
        let view = PanelView {
            host,
            synchronizer: self.synchronizer.as_ref(),
            config: &self.config,
        };
        Ok(self
            .slots
            .iter()
            .filter(|slot| slot.state() == SlotState::Active)
            .filter_map(|slot| slot.panel().map(|panel| (slot.row(), panel.render(&view))))
            .collect())
    }

    /// Whether this margin answers to `name`, ignoring case.
    pub fn margin_named(&self, name: &str) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.config.margin_name.eq_ignore_ascii_case(name))
    }

    /// Close every panel and tear the synchronizer down.
    ///
    /// Every later operation fails with [`DiagnosticError::AlreadyClosed`];
    /// closing again does nothing.
    pub fn close(&mut self, host: &mut dyn EditorHost) {
        if self.closed {
            return;
        }
        for slot in &mut self.slots {
            slot.close(host, &mut self.rows);
        }
        if let Some(mut sync) = self.synchronizer.take() {
            sync.teardown(host);
        }
        self.leases = 0;
        self.backlog.clear();
        self.closed = true;
        tracing::debug!(margin = %self.config.margin_name, "margin closed");
    }

    /// Whether the margin was closed.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    fn acquire(&mut self, host: &mut dyn EditorHost) -> Result<()> {
        if self.synchronizer.is_none() {
            self.backlog.extend(self.queue.drain());
            let mut sync = GraphSynchronizer::new();
            sync.initialize(host)?;
            self.synchronizer = Some(sync);
        }
        self.leases += 1;
        tracing::debug!(leases = self.leases, "synchronizer lease acquired");
        Ok(())
    }

    fn release(&mut self, host: &mut dyn EditorHost) {
        self.leases = self.leases.saturating_sub(1);
        tracing::debug!(leases = self.leases, "synchronizer lease released");
        if self.leases == 0 {
            if let Some(mut sync) = self.synchronizer.take() {
                sync.teardown(host);
            }
        }
    }

    const fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(DiagnosticError::AlreadyClosed(NAME))
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for PanelHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelHost")
            .field("config", &self.config)
            .field("slots", &self.slots)
            .field("leases", &self.leases)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
