//! Fixed row grid of the margin.
//!
//! Each panel slot owns one row for its whole life. A row holds at most one
//! visual element and a dirty generation that advances when the element's
//! content changes.

use crate::error::{DiagnosticError, Result};

use super::panel::ElementId;

/// One row of the margin.
#[derive(Clone, Debug, Default)]
pub struct Row {
    /// Element currently shown, if any.
    pub element: Option<ElementId>,
    /// Dirty generation (incremented when content changes).
    pub dirty_generation: u64,
}

impl Row {
    /// Mark the row as dirty.
    pub fn mark_dirty(&mut self) {
        self.dirty_generation += 1;
    }
}

/// Rows of the margin, created once with a fixed count.
#[derive(Clone, Debug, Default)]
pub struct MarginRows {
    rows: Vec<Row>,
}

impl MarginRows {
    /// Create `count` empty rows.
    pub fn new(count: usize) -> Self {
        Self {
            rows: vec![Row::default(); count],
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the margin has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a row by index.
    pub fn get(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    /// Show `element` in an empty row.
    pub fn insert(&mut self, row: usize, element: ElementId) -> Result<()> {
        let count = self.rows.len();
        let slot = self
            .rows
            .get_mut(row)
            .ok_or(DiagnosticError::RowOutOfRange { row, count })?;
        if slot.element.is_some() {
            return Err(DiagnosticError::RowOccupied(row));
        }
        slot.element = Some(element);
        slot.mark_dirty();
        Ok(())
    }

    /// Take the element out of a row.
    pub fn remove(&mut self, row: usize) -> Option<ElementId> {
        let slot = self.rows.get_mut(row)?;
        let element = slot.element.take();
        if element.is_some() {
            slot.mark_dirty();
        }
        element
    }

    /// Mark a row as dirty.
    pub fn mark_dirty(&mut self, row: usize) {
        if let Some(slot) = self.rows.get_mut(row) {
            slot.mark_dirty();
        }
    }

    /// Indices of rows that changed since the last [`clear_dirty`](Self::clear_dirty).
    pub fn dirty_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.dirty_generation > 0)
            .map(|(i, _)| i)
    }

    /// Clear all dirty flags.
    pub fn clear_dirty(&mut self) {
        for row in &mut self.rows {
            row.dirty_generation = 0;
        }
    }
}
