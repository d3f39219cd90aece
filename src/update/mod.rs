//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod ajax;
mod app;
mod grid;
mod timer;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::AppModel;

#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use ajax::{send_request, update_ajax};
pub use app::update_app;
pub use grid::{install_grid, request_content_refresh, update_grid};
pub use timer::update_timer;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

fn update_inner(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Grid(m) => grid::update_grid(model, m),
        Msg::Ajax(m) => ajax::update_ajax(model, m),
        Msg::Timer(m) => timer::update_timer(model, m),
        Msg::App(m) => app::update_app(model, m),
    }
}

/// Traced update wrapper (debug builds only)
#[cfg(debug_assertions)]
fn update_traced(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);

    if let Some(ref cmd) = result {
        debug!(target: "message", cmd = ?cmd, "produced");
    }
    result
}

/// Get a display name for a message type
///
/// Row payloads are left out so traces stay one line per message.
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    use crate::messages::{AjaxMsg, GridMsg};

    match msg {
        Msg::Grid(GridMsg::FetchCompleted { grid_id, response }) => {
            format!("Grid::FetchCompleted({}, {:?})", grid_id, response.request)
        }
        Msg::Grid(m) => format!("Grid::{:?}", m),
        Msg::Ajax(AjaxMsg::Completed {
            request,
            name,
            result,
            ..
        }) => format!(
            "Ajax::Completed({:?}, {}, {})",
            request,
            name,
            match result {
                Ok(response) => format!("status {}", response.status),
                Err(e) => format!("error {}", e),
            }
        ),
        Msg::Ajax(m) => format!("Ajax::{:?}", m),
        Msg::Timer(m) => format!("Timer::{:?}", m),
        Msg::App(m) => format!("App::{:?}", m),
    }
}
