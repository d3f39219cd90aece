//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use livegrid::ajax::{HttpRequest, HttpResponse, ResponseMode};
use livegrid::commands::Cmd;
use livegrid::messages::{AjaxMsg, Msg};
use livegrid::model::{AppModel, GridId, GridOptions};
use livegrid::timer::{TimerId, TimerToken};
use livegrid::update::{install_grid, update};

pub const GRID: &str = "orders";

/// Model with one grid of `total` rows, page size 20, no prefetch
pub fn grid_model(total: usize) -> (AppModel, GridId) {
    let mut model = AppModel::new();
    let id = GridId::new(GRID);
    let cmd = install_grid(&mut model, id.clone(), &GridOptions::new("/rows", 20, total));
    assert!(cmd.is_none());
    (model, id)
}

/// Leaf commands, in execution order
pub fn leaves(cmd: Option<Cmd>) -> Vec<Cmd> {
    cmd.map(Cmd::flatten).unwrap_or_default()
}

pub fn requests(cmds: &[Cmd]) -> Vec<HttpRequest> {
    cmds.iter()
        .filter_map(|c| match c {
            Cmd::SendRequest { request, .. } => Some(request.clone()),
            _ => None,
        })
        .collect()
}

pub fn render_count(cmds: &[Cmd]) -> usize {
    cmds.iter()
        .filter(|c| matches!(c, Cmd::RenderGrid { .. }))
        .count()
}

pub fn timeout_token(cmds: &[Cmd]) -> Option<TimerToken> {
    cmds.iter().find_map(|c| match c {
        Cmd::ScheduleTimer {
            timer: TimerId::FetchTimeout(_),
            token,
            ..
        } => Some(*token),
        _ => None,
    })
}

/// Numeric wire parameter of a grid fetch
pub fn param(request: &HttpRequest, name: &str) -> usize {
    request
        .param(name)
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| panic!("request has no numeric '{}' param", name))
}

/// `ajax-response` body holding rows `[offset, offset + count)` clamped to
/// `total`, with one cell `r<n>` per row
pub fn rows_envelope(grid: &str, offset: usize, count: usize, total: usize) -> String {
    let end = (offset + count).min(total);
    let rows: String = (offset.min(end)..end)
        .map(|i| format!("<tr><td>r{}</td></tr>", i))
        .collect();
    format!(
        r#"<?xml version="1.0"?><ajax-response><response type="object" id="{}_updater"><rows update_ui="false">{}</rows></response></ajax-response>"#,
        grid, rows
    )
}

/// Deliver a response body for `request` through the full dispatch path
pub fn deliver(model: &mut AppModel, request: &HttpRequest, body: String) -> Option<Cmd> {
    update(
        model,
        Msg::Ajax(AjaxMsg::Completed {
            request: request.id,
            name: request.name.clone(),
            mode: ResponseMode::Dispatch,
            result: Ok(HttpResponse::ok(body)),
        }),
    )
}

/// Answer a grid fetch the way a well-behaved server would
pub fn respond(model: &mut AppModel, request: &HttpRequest, total: usize) -> Option<Cmd> {
    let grid = request.param("id").unwrap_or(GRID).to_string();
    let body = rows_envelope(
        &grid,
        param(request, "offset"),
        param(request, "page_size"),
        total,
    );
    deliver(model, request, body)
}

/// Transport closure for runtime tests: serves grid fetches from a virtual
/// dataset of `total` rows
pub fn fake_server(
    total: usize,
) -> impl Fn(&HttpRequest) -> Result<HttpResponse, String> + Send + Sync + 'static {
    move |request: &HttpRequest| {
        let grid = request.param("id").unwrap_or(GRID).to_string();
        let offset = param(request, "offset");
        let count = param(request, "page_size");
        Ok(HttpResponse::ok(rows_envelope(&grid, offset, count, total)))
    }
}
