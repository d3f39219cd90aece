//! Client-side window of server rows
//!
//! A `RowBuffer` is replaced wholesale on every successful fetch and never
//! mutated in place. The range predicates decide whether a requested offset
//! can be served locally and whether a refetch should start early.

use std::fmt;

use super::metadata::GridMetadata;
use crate::ajax::XmlElement;

/// One row of cell contents
pub type Row = Vec<String>;

const ROWS_TAG: &str = "rows";
const ROW_TAG: &str = "tr";
const CELL_TAG: &str = "td";
const NBSP: &str = "&nbsp;";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Response has no `rows` container
    MissingRows,
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::MissingRows => write!(f, "response has no <rows> element"),
        }
    }
}

impl std::error::Error for BufferError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowBuffer {
    start: usize,
    rows: Vec<Row>,
    update_ui: bool,
}

impl RowBuffer {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(start: usize, rows: Vec<Row>) -> Self {
        Self {
            start,
            rows,
            update_ui: false,
        }
    }

    /// Build a buffer from a grid response element, positioned at `start`
    pub fn from_response(response: &XmlElement, start: usize) -> Result<Self, BufferError> {
        let rows_el = response.find(ROWS_TAG).ok_or(BufferError::MissingRows)?;
        let update_ui = rows_el.attribute("update_ui") == Some("true");

        let rows = rows_el
            .descendants_named(ROW_TAG)
            .into_iter()
            .map(|tr| {
                tr.descendants_named(CELL_TAG)
                    .into_iter()
                    .map(|td| {
                        let text = td.text_content();
                        if td.attribute("convert_spaces") == Some("true") {
                            convert_spaces(&text)
                        } else {
                            text
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            start,
            rows,
            update_ui,
        })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// One past the last buffered offset
    pub fn end(&self) -> usize {
        self.start + self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Server asked for the UI to be refreshed with this data
    pub fn update_ui(&self) -> bool {
        self.update_ui
    }

    /// Row count differs from a page (short read or large window)
    pub fn is_partial(&self, meta: &GridMetadata) -> bool {
        meta.page_size() != self.size()
    }

    /// Within half a buffer of the current span
    pub fn is_close(&self, position: usize) -> bool {
        // p < start + size + size/2  &&  p + size + size/2 > start, doubled to stay integral
        let p = position.saturating_mul(2);
        let start = self.start.saturating_mul(2);
        let span = self.size().saturating_mul(3);
        p < start.saturating_add(span) && p.saturating_add(span) > start
    }

    /// `[start, start + count)` overlaps the buffer
    pub fn is_in_range(&self, start: usize, count: usize) -> bool {
        start < self.end() && start.saturating_add(count) > self.start
    }

    /// A full page starting at `position` lies inside the buffer
    pub fn is_fully_in_range(&self, meta: &GridMetadata, position: usize) -> bool {
        position >= self.start && position.saturating_add(meta.page_size()) <= self.end()
    }

    /// `position - start < tolerance`
    pub fn is_nearing_top_limit(&self, meta: &GridMetadata, position: usize) -> bool {
        position < self.start.saturating_add(meta.limit_tolerance())
    }

    /// `end - (position + page) < tolerance`
    pub fn is_nearing_bottom_limit(&self, meta: &GridMetadata, position: usize) -> bool {
        let page_end = position.saturating_add(meta.page_size());
        self.end() < page_end.saturating_add(meta.limit_tolerance())
    }

    /// Buffer starts at the first row of the dataset
    pub fn is_at_top(&self) -> bool {
        self.start == 0
    }

    /// Buffer ends at the last row of the dataset
    pub fn is_at_bottom(&self, meta: &GridMetadata) -> bool {
        self.end() == meta.total_rows()
    }

    /// Near an edge that is not also the edge of the dataset
    pub fn is_nearing_limit(&self, meta: &GridMetadata, position: usize) -> bool {
        (!self.is_at_top() && self.is_nearing_top_limit(meta, position))
            || (!self.is_at_bottom(meta) && self.is_nearing_bottom_limit(meta, position))
    }

    /// Up to `count` rows starting at logical offset `start`.
    ///
    /// Clamped to the buffer: returns fewer rows instead of failing, and
    /// nothing for offsets before the buffer start.
    pub fn get_rows(&self, start: usize, count: usize) -> &[Row] {
        if start < self.start {
            return &[];
        }
        let begin = (start - self.start).min(self.rows.len());
        let end = begin.saturating_add(count).min(self.rows.len());
        &self.rows[begin..end]
    }
}

fn convert_spaces(text: &str) -> String {
    text.replace(' ', NBSP)
}
