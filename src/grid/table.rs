//! The visible page of cells

use super::buffer::{Row, RowBuffer};

/// Cell contents of the rendered page plus the offset it was rendered from
#[derive(Debug, Clone, Default)]
pub struct CellTable {
    rows: Vec<Row>,
    last_rendered: Option<usize>,
    renders: usize,
}

impl CellTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the page starting at `start` out of the buffer.
    ///
    /// Returns false without touching the table when `start` is the offset
    /// already on screen. Table rows past the end of the buffer are cleared.
    pub fn replace_cell_contents(
        &mut self,
        buffer: &RowBuffer,
        start: usize,
        page_size: usize,
    ) -> bool {
        if self.last_rendered == Some(start) {
            return false;
        }
        self.last_rendered = Some(start);
        self.rows = buffer.get_rows(start, page_size).to_vec();
        self.renders += 1;
        true
    }

    /// Forget the rendered offset so the next render always repaints
    pub fn invalidate(&mut self) {
        self.last_rendered = None;
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn last_rendered(&self) -> Option<usize> {
        self.last_rendered
    }

    /// Number of repaints so far
    pub fn renders(&self) -> usize {
        self.renders
    }
}
