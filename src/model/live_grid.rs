//! Per-grid state: data window, scrollbar, rendered page and fetch state

use std::fmt;

use serde::Serialize;

use crate::ajax::{QueryParam, RequestId};
use crate::grid::{BufferRatios, CellTable, GridMetadata, GridScroller, RowBuffer, SCROLL_IDLE_MS};
use crate::timer::TimerSlot;

/// Server gets this long to answer a grid fetch before the grid gives up on it
pub const FETCH_TIMEOUT_MS: u64 = 4000;

/// Identifies a live grid; also the prefix of its request and handler names
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridId(String);

impl GridId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The single fetch a grid may have outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// Offset the caller asked to see
    pub request_offset: usize,
    /// First row of the window being fetched
    pub buffer_offset: usize,
    /// Large window rather than a single page
    pub full: bool,
    /// Dispatcher id of the HTTP request carrying this fetch
    pub request_id: RequestId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    InFlight {
        request: FetchRequest,
        /// Most recent offset requested while the fetch was outstanding
        pending: Option<usize>,
    },
}

impl FetchState {
    pub fn in_flight(&self) -> Option<&FetchRequest> {
        match self {
            FetchState::InFlight { request, .. } => Some(request),
            FetchState::Idle => None,
        }
    }

    pub fn pending(&self) -> Option<usize> {
        match self {
            FetchState::InFlight { pending, .. } => *pending,
            FetchState::Idle => None,
        }
    }
}

/// Construction options for a live grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    /// Rows on the visible page
    pub page_size: usize,
    pub total_rows: usize,
    /// Endpoint registered as `<id>_request`
    pub url: String,
    pub ratios: BufferRatios,
    /// Fetch a large window at offset 0 as soon as the grid is created
    pub prefetch_buffer: bool,
    /// Extra parameters appended to every fetch
    pub request_params: Vec<QueryParam>,
    pub fetch_timeout_ms: u64,
    pub scroll_idle_ms: u64,
    /// Snap the scrollbar to whole rows on every scroll event
    pub snap_to_rows: bool,
    /// Height of the visible table in pixels
    pub visible_height: f64,
}

impl GridOptions {
    pub fn new(url: impl Into<String>, page_size: usize, total_rows: usize) -> Self {
        Self {
            page_size,
            total_rows,
            url: url.into(),
            ratios: BufferRatios::default(),
            prefetch_buffer: false,
            request_params: Vec::new(),
            fetch_timeout_ms: FETCH_TIMEOUT_MS,
            scroll_idle_ms: SCROLL_IDLE_MS,
            snap_to_rows: false,
            visible_height: page_size as f64 * 20.0,
        }
    }
}

/// Counters surfaced in logs and in the CLI status line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GridStats {
    pub fetches_issued: usize,
    pub fetches_completed: usize,
    pub coalesced: usize,
    pub timeouts: usize,
    pub stale_responses: usize,
    pub malformed_responses: usize,
}

#[derive(Debug, Clone)]
pub struct LiveGrid {
    pub id: GridId,
    pub metadata: GridMetadata,
    pub buffer: RowBuffer,
    pub scroller: GridScroller,
    pub table: CellTable,
    pub state: FetchState,
    /// Armed while a fetch is in flight
    pub timeout: TimerSlot,
    pub request_params: Vec<QueryParam>,
    pub fetch_timeout_ms: u64,
    pub scroll_idle_ms: u64,
    pub snap_to_rows: bool,
    pub stats: GridStats,
}

impl LiveGrid {
    pub fn new(id: GridId, options: &GridOptions) -> Self {
        let metadata = GridMetadata::new(options.page_size, options.total_rows, options.ratios);
        let scroller = GridScroller::new(options.visible_height, &metadata);
        Self {
            id,
            metadata,
            buffer: RowBuffer::empty(),
            scroller,
            table: CellTable::new(),
            state: FetchState::Idle,
            timeout: TimerSlot::new(),
            request_params: options.request_params.clone(),
            fetch_timeout_ms: options.fetch_timeout_ms,
            scroll_idle_ms: options.scroll_idle_ms,
            snap_to_rows: options.snap_to_rows,
            stats: GridStats::default(),
        }
    }

    /// Logical request name registered with the dispatcher
    pub fn request_name(&self) -> String {
        request_name(&self.id)
    }

    /// Handler id the server addresses row data to
    pub fn updater_id(&self) -> String {
        updater_id(&self.id)
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.state, FetchState::InFlight { .. })
    }

    /// Offset currently on screen
    pub fn displayed_offset(&self) -> Option<usize> {
        self.table.last_rendered()
    }
}

pub fn request_name(id: &GridId) -> String {
    format!("{}_request", id)
}

pub fn updater_id(id: &GridId) -> String {
    format!("{}_updater", id)
}
