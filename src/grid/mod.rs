//! Live grid building blocks
//!
//! - `metadata` - page size, total rows and buffer sizing
//! - `buffer` - the client-side window of server rows and its range queries
//! - `scroller` - scrollbar pixels to logical row offsets
//! - `table` - the rendered page
//! - `render` - terminal output of the rendered page
//!
//! The state machine that ties these together lives in `update::grid`.

mod buffer;
mod metadata;
pub mod render;
mod scroller;
mod table;

pub use buffer::{BufferError, Row, RowBuffer};
pub use metadata::{BufferRatios, GridMetadata};
pub use render::{OutputFormat, PageView};
pub use scroller::{GridScroller, SCROLL_IDLE_MS};
pub use table::CellTable;
