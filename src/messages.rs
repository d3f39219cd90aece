//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use crate::ajax::{HttpResponse, QueryParam, RequestId, ResponseElement, ResponseMode};
use crate::model::{GridId, GridOptions};
use crate::timer::{TimerId, TimerToken};

/// Live grid messages
#[derive(Debug, Clone)]
pub enum GridMsg {
    /// Create a grid and register its request and handler
    Create { grid_id: GridId, options: GridOptions },
    /// Show the page starting at a logical row offset
    RequestOffset { grid_id: GridId, offset: usize },
    /// Scrollbar moved to a pixel position
    Scrolled { grid_id: GridId, scroll_top: f64 },
    /// Row data arrived through the grid's `_updater` handler
    FetchCompleted {
        grid_id: GridId,
        response: ResponseElement,
    },
    /// Dataset size changed on the server
    SetTotalRows { grid_id: GridId, total_rows: usize },
    /// Replace the extra parameters sent with every fetch
    SetRequestParams {
        grid_id: GridId,
        params: Vec<QueryParam>,
    },
    /// Plug or unplug the scrollbar
    SetScrollEnabled { grid_id: GridId, enabled: bool },
    /// Drop the buffer and refetch around the displayed offset
    Reload { grid_id: GridId },
}

/// Dispatcher messages
#[derive(Debug, Clone)]
pub enum AjaxMsg {
    /// Map a logical request name to a URL
    RegisterRequest { name: String, url: String },
    /// Register a content target for `element` responses
    RegisterTarget { id: String },
    /// Send a request; the response is parsed as an envelope.
    /// GET without a body, POST `text/xml` with one.
    Send {
        name: String,
        params: Vec<QueryParam>,
        body: Option<String>,
    },
    /// Send a request; the raw body replaces the target's content
    SendAndUpdate {
        name: String,
        container: String,
        params: Vec<QueryParam>,
        body: Option<String>,
    },
    /// Transport finished (sent by the runtime)
    Completed {
        request: RequestId,
        name: String,
        mode: ResponseMode,
        result: Result<HttpResponse, String>,
    },
}

/// Timer messages
#[derive(Debug, Clone)]
pub enum TimerMsg {
    /// A scheduled timer elapsed (sent by the runtime)
    Fired { timer: TimerId, token: TimerToken },
}

/// Application lifecycle messages
#[derive(Debug, Clone)]
pub enum AppMsg {
    /// Stop the runtime
    Quit,
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Grid(GridMsg),
    Ajax(AjaxMsg),
    Timer(TimerMsg),
    App(AppMsg),
}
