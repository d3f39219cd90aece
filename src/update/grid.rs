//! Live grid controller
//!
//! Each grid is a two-state machine:
//!
//! ```text
//!              request_offset(o), not covered
//!   Idle ─────────────────────────────────────► InFlight { request, pending }
//!    ▲                                              │  request_offset(o'): pending = o'
//!    └──── fetch completed / timed out ◄────────────┘
//!          (pending re-evaluated as a fresh request)
//! ```
//!
//! At most one fetch is outstanding per grid. Offsets requested meanwhile
//! collapse into the single `pending` slot, last write wins.

use crate::ajax::{GridUpdater, QueryParam, ResponseElement, ResponseMode};
use crate::commands::{Cmd, Notification};
use crate::grid::RowBuffer;
use crate::messages::GridMsg;
use crate::model::{AppModel, FetchRequest, FetchState, GridId, GridOptions, LiveGrid};
use crate::timer::TimerId;

pub fn update_grid(model: &mut AppModel, msg: GridMsg) -> Option<Cmd> {
    match msg {
        GridMsg::Create { grid_id, options } => install_grid(model, grid_id, &options),
        GridMsg::RequestOffset { grid_id, offset } => {
            if let Some(grid) = model.grid_mut(&grid_id) {
                grid.scroller.move_to_offset(offset);
            }
            request_content_refresh(model, &grid_id, offset)
        }
        GridMsg::Scrolled {
            grid_id,
            scroll_top,
        } => handle_scroll(model, &grid_id, scroll_top),
        GridMsg::FetchCompleted { grid_id, response } => {
            fetch_completed(model, &grid_id, &response)
        }
        GridMsg::SetTotalRows {
            grid_id,
            total_rows,
        } => {
            let grid = grid_or_log(model, &grid_id)?;
            grid.metadata.set_total_rows(total_rows);
            grid.scroller.update_size(&grid.metadata);
            tracing::debug!(
                "Grid '{}' total rows = {}, track height = {}",
                grid_id,
                total_rows,
                grid.scroller.track_height()
            );
            None
        }
        GridMsg::SetRequestParams { grid_id, params } => {
            let grid = grid_or_log(model, &grid_id)?;
            grid.request_params = params;
            None
        }
        GridMsg::SetScrollEnabled { grid_id, enabled } => {
            let grid = grid_or_log(model, &grid_id)?;
            if enabled {
                grid.scroller.plug();
            } else {
                grid.scroller.unplug();
            }
            None
        }
        GridMsg::Reload { grid_id } => {
            let grid = grid_or_log(model, &grid_id)?;
            let offset = grid.displayed_offset().unwrap_or(0);
            grid.buffer = RowBuffer::empty();
            grid.table.invalidate();
            request_content_refresh(model, &grid_id, offset)
        }
    }
}

fn grid_or_log<'a>(model: &'a mut AppModel, grid_id: &GridId) -> Option<&'a mut LiveGrid> {
    let grid = model.grid_mut(grid_id);
    if grid.is_none() {
        tracing::debug!("No grid '{}'", grid_id);
    }
    grid
}

/// Create a grid, registering `<id>_request` and `<id>_updater` with the
/// dispatcher. With `prefetch_buffer` a large fetch at offset 0 starts
/// right away.
pub fn install_grid(model: &mut AppModel, grid_id: GridId, options: &GridOptions) -> Option<Cmd> {
    let grid = LiveGrid::new(grid_id.clone(), options);

    model
        .ajax
        .register_request(grid.request_name(), options.url.clone());
    model.ajax.register_handler(
        grid.updater_id(),
        Box::new(GridUpdater::new(grid_id.clone())),
    );
    if model.grids.insert(grid_id.clone(), grid).is_some() {
        tracing::warn!("Grid '{}' replaced an existing grid", grid_id);
    }
    tracing::info!(
        "Created grid '{}' ({} rows, page {})",
        grid_id,
        options.total_rows,
        options.page_size
    );

    if options.prefetch_buffer {
        fetch_buffer(model, &grid_id, 0, true)
    } else {
        None
    }
}

/// Bring the page at `offset` on screen, fetching rows when the buffer
/// cannot serve it.
///
/// - fully buffered: render now; also refetch a large window in the
///   background when the page sits near a buffer edge
/// - close to the buffer: fetch a single page starting at `offset`
/// - otherwise: fetch a large window centered on `offset`
///
/// While a fetch is in flight no request is sent; `offset` replaces the
/// pending slot and is re-evaluated when that fetch settles.
pub fn request_content_refresh(
    model: &mut AppModel,
    grid_id: &GridId,
    offset: usize,
) -> Option<Cmd> {
    let grid = grid_or_log(model, grid_id)?;
    // offsets past the dataset ask for its tail
    let offset = offset.min(grid.metadata.total_rows());
    let covered = grid.buffer.is_fully_in_range(&grid.metadata, offset);

    if let FetchState::InFlight { pending, .. } = &mut grid.state {
        if let Some(previous) = pending.replace(offset) {
            tracing::debug!(
                "Grid '{}' coalesced pending offset {} -> {}",
                grid_id,
                previous,
                offset
            );
        }
        grid.stats.coalesced += 1;
        return if covered {
            render_page(grid, offset)
        } else {
            None
        };
    }

    if covered {
        let render = render_page(grid, offset);
        let refill = if grid.buffer.is_nearing_limit(&grid.metadata, offset) {
            fetch_buffer(model, grid_id, offset, true)
        } else {
            None
        };
        Cmd::merge([render, refill])
    } else if grid.buffer.is_close(offset) {
        fetch_buffer(model, grid_id, offset, false)
    } else {
        fetch_buffer(model, grid_id, offset, true)
    }
}

/// Issue a fetch for `offset`. Callers only reach this while idle.
fn fetch_buffer(model: &mut AppModel, grid_id: &GridId, offset: usize, full: bool) -> Option<Cmd> {
    let AppModel { ajax, grids, .. } = model;
    let grid = grids.get_mut(grid_id)?;
    debug_assert!(
        !grid.is_fetching(),
        "grid '{}' already has a fetch in flight",
        grid_id
    );

    let fetch_size = grid.metadata.buffer_size(full);
    let buffer_offset = if full {
        grid.metadata.large_buffer_window_start(offset)
    } else {
        offset
    };

    let mut params = vec![
        QueryParam::pair("id", grid_id),
        QueryParam::pair("page_size", fetch_size),
        QueryParam::pair("offset", buffer_offset),
    ];
    params.extend(grid.request_params.iter().cloned());

    let Some(request) = ajax.prepare(&grid.request_name(), &params, None) else {
        tracing::warn!("Grid '{}' has no registered request", grid_id);
        return None;
    };

    grid.state = FetchState::InFlight {
        request: FetchRequest {
            request_offset: offset,
            buffer_offset,
            full,
            request_id: request.id,
        },
        pending: None,
    };
    grid.stats.fetches_issued += 1;
    let token = grid.timeout.schedule();

    tracing::debug!(
        "Grid '{}' fetching {} rows at {} for offset {} ({:?})",
        grid_id,
        fetch_size,
        buffer_offset,
        offset,
        request.id
    );

    Some(Cmd::batch(vec![
        Cmd::SendRequest {
            request,
            mode: ResponseMode::Dispatch,
        },
        Cmd::ScheduleTimer {
            timer: TimerId::FetchTimeout(grid_id.clone()),
            token,
            delay_ms: grid.fetch_timeout_ms,
        },
    ]))
}

fn fetch_completed(
    model: &mut AppModel,
    grid_id: &GridId,
    response: &ResponseElement,
) -> Option<Cmd> {
    let grid = grid_or_log(model, grid_id)?;

    let request = match grid.state.in_flight() {
        Some(request) if request.request_id == response.request => *request,
        in_flight => {
            tracing::debug!(
                "Grid '{}' dropping stale response {:?} (in flight: {:?})",
                grid_id,
                response.request,
                in_flight.map(|r| r.request_id)
            );
            grid.stats.stale_responses += 1;
            return None;
        }
    };

    let pending = grid.state.pending();
    grid.state = FetchState::Idle;
    grid.timeout.cancel();

    match RowBuffer::from_response(&response.element, request.buffer_offset) {
        Ok(buffer) => {
            tracing::debug!(
                "Grid '{}' buffer now [{}, {})",
                grid_id,
                buffer.start(),
                buffer.end()
            );
            if buffer.update_ui() {
                grid.table.invalidate();
            }
            grid.buffer = buffer;
            grid.stats.fetches_completed += 1;
        }
        Err(e) => {
            // Same recovery as a timeout: keep the old buffer
            tracing::warn!("Grid '{}' malformed response: {}", grid_id, e);
            grid.stats.malformed_responses += 1;
            return pending.and_then(|offset| request_content_refresh(model, grid_id, offset));
        }
    }

    match pending {
        None => render_page(grid, request.request_offset),
        Some(offset) => request_content_refresh(model, grid_id, offset),
    }
}

/// The server did not answer in time: allow fetching again, keep the buffer
pub(super) fn fetch_timed_out(
    model: &mut AppModel,
    grid_id: &GridId,
    token: crate::timer::TimerToken,
) -> Option<Cmd> {
    let grid = grid_or_log(model, grid_id)?;
    if !grid.timeout.fire(token) {
        tracing::debug!("Grid '{}' ignoring stale timeout {:?}", grid_id, token);
        return None;
    }

    let FetchState::InFlight { request, pending } = grid.state else {
        return None;
    };
    tracing::warn!(
        "Grid '{}' fetch {:?} at {} timed out after {}ms",
        grid_id,
        request.request_id,
        request.buffer_offset,
        grid.fetch_timeout_ms
    );
    grid.state = FetchState::Idle;
    grid.stats.timeouts += 1;

    pending.and_then(|offset| request_content_refresh(model, grid_id, offset))
}

fn handle_scroll(model: &mut AppModel, grid_id: &GridId, scroll_top: f64) -> Option<Cmd> {
    let grid = grid_or_log(model, grid_id)?;

    if grid.scroller.scroll_to(scroll_top, &grid.metadata).is_none() {
        tracing::debug!("Grid '{}' scroller unplugged, ignoring scroll", grid_id);
        return None;
    }
    if grid.snap_to_rows {
        grid.scroller.adjust_scroll_top();
    }
    let offset = grid
        .scroller
        .content_offset(grid.scroller.scroll_top(), grid.metadata.total_rows());

    let idle = Cmd::ScheduleTimer {
        timer: TimerId::ScrollIdle(grid_id.clone()),
        token: grid.scroller.idle.schedule(),
        delay_ms: grid.scroll_idle_ms,
    };

    let refresh = request_content_refresh(model, grid_id, offset);
    Cmd::merge([
        refresh,
        Some(Cmd::Notify(Notification::Scrolled {
            grid_id: grid_id.clone(),
            offset,
        })),
        Some(idle),
    ])
}

pub(super) fn scroll_idle(
    model: &mut AppModel,
    grid_id: &GridId,
    token: crate::timer::TimerToken,
) -> Option<Cmd> {
    let grid = grid_or_log(model, grid_id)?;
    if !grid.scroller.idle.fire(token) {
        return None;
    }
    Some(Cmd::Notify(Notification::ScrollIdle {
        grid_id: grid_id.clone(),
    }))
}

/// Repaint the table unless `offset` is already on screen
fn render_page(grid: &mut LiveGrid, offset: usize) -> Option<Cmd> {
    let page_size = grid.metadata.page_size();
    if !grid
        .table
        .replace_cell_contents(&grid.buffer, offset, page_size)
    {
        return None;
    }
    Some(Cmd::RenderGrid {
        grid_id: grid.id.clone(),
    })
}
