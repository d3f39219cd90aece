//! Envelope routing across grids, handlers and content targets

mod common;

use common::*;
use livegrid::ajax::{HttpResponse, QueryParam, ResponseMode, VERSION_HEADER};
use livegrid::commands::{Cmd, Notification};
use livegrid::messages::{AjaxMsg, Msg};
use livegrid::model::{AppModel, GridId, GridOptions};
use livegrid::update::{install_grid, request_content_refresh, update};

fn send(model: &mut AppModel, name: &str, params: Vec<QueryParam>) -> Option<Cmd> {
    update(
        model,
        Msg::Ajax(AjaxMsg::Send {
            name: name.to_string(),
            params,
            body: None,
        }),
    )
}

#[test]
fn test_envelope_feeds_grid_and_target_together() {
    let (mut model, id) = grid_model(1000);
    model.ajax.register_target("summary");
    let request = requests(&leaves(request_content_refresh(&mut model, &id, 0))).remove(0);

    let rows = rows_envelope(GRID, 0, 140, 1000);
    let body = rows.replace(
        "</ajax-response>",
        r#"<response type="element" id="summary">1000 <em>orders</em></response></ajax-response>"#,
    );
    let cmds = leaves(deliver(&mut model, &request, body));

    assert_eq!(render_count(&cmds), 1);
    assert!(cmds.iter().any(|c| matches!(
        c,
        Cmd::Notify(Notification::ContentReplaced { target }) if target == "summary"
    )));
    assert_eq!(
        model.ajax.targets.get("summary").unwrap().inner(),
        "1000 <em>orders</em>"
    );
    assert_eq!(model.grid(&id).unwrap().buffer.size(), 140);
}

#[test]
fn test_responses_route_to_their_own_grid() {
    let (mut model, orders) = grid_model(1000);
    let customers = GridId::new("customers");
    install_grid(
        &mut model,
        customers.clone(),
        &GridOptions::new("/customers", 10, 50),
    );

    let orders_req = requests(&leaves(request_content_refresh(&mut model, &orders, 0))).remove(0);
    let customers_req =
        requests(&leaves(request_content_refresh(&mut model, &customers, 0))).remove(0);
    assert_eq!(customers_req.name, "customers_request");
    assert_eq!(customers_req.url, "/customers");
    assert_ne!(orders_req.id, customers_req.id);

    respond(&mut model, &customers_req, 50);
    assert_eq!(model.grid(&customers).unwrap().buffer.size(), 50);
    assert!(model.grid(&orders).unwrap().is_fetching());
    assert_eq!(model.grid(&orders).unwrap().buffer.size(), 0);
}

#[test]
fn test_unknown_ids_and_types() {
    let (mut model, id) = grid_model(1000);
    let request = requests(&leaves(request_content_refresh(&mut model, &id, 0))).remove(0);

    let body = r#"<ajax-response>
        <response type="object" id="ghost_updater"><rows/></response>
        <response type="element" id="ghost"/>
        <response type="refresh" id="orders_updater"/>
    </ajax-response>"#;
    let cmds = leaves(deliver(&mut model, &request, body.to_string()));

    assert_eq!(cmds.len(), 1);
    assert!(matches!(
        &cmds[0],
        Cmd::Notify(Notification::Diagnostic(message)) if message.contains("refresh")
    ));
    assert_eq!(model.diagnostics.len(), 1);
    assert!(model.grid(&id).unwrap().is_fetching());
}

#[test]
fn test_transport_failure_leaves_grid_waiting_for_timeout() {
    let (mut model, id) = grid_model(1000);
    let cmds = leaves(request_content_refresh(&mut model, &id, 0));
    let request = requests(&cmds).remove(0);

    let cmd = update(
        &mut model,
        Msg::Ajax(AjaxMsg::Completed {
            request: request.id,
            name: request.name.clone(),
            mode: ResponseMode::Dispatch,
            result: Err("connection refused".to_string()),
        }),
    );
    assert!(cmd.is_none());
    let grid = model.grid(&id).unwrap();
    assert!(grid.is_fetching());
    assert!(grid.timeout.is_armed());

    let cmd = update(
        &mut model,
        Msg::Ajax(AjaxMsg::Completed {
            request: request.id,
            name: request.name.clone(),
            mode: ResponseMode::Dispatch,
            result: Ok(HttpResponse {
                status: 404,
                body: rows_envelope(GRID, 0, 140, 1000),
            }),
        }),
    );
    assert!(cmd.is_none());
    assert_eq!(model.grid(&id).unwrap().buffer.size(), 0);
}

#[test]
fn test_send_builds_versioned_get() {
    let mut model = AppModel::new();
    update(
        &mut model,
        Msg::Ajax(AjaxMsg::RegisterRequest {
            name: "lookup".into(),
            url: "/lookup".into(),
        }),
    );

    let cmds = leaves(send(
        &mut model,
        "lookup",
        vec!["q=bolt".parse().unwrap(), QueryParam::pair("limit", 5)],
    ));
    let sent = requests(&cmds);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url, "/lookup");
    assert_eq!(sent[0].param("q"), Some("bolt"));
    assert_eq!(sent[0].param("limit"), Some("5"));
    assert!(sent[0].body.is_none());
    assert!(sent[0].headers.iter().any(|(k, _)| k == VERSION_HEADER));

    assert!(send(&mut model, "unregistered", vec![]).is_none());
}

#[test]
fn test_send_and_update_to_unregistered_target_is_noop() {
    let mut model = AppModel::new();
    model.ajax.register_request("fragment", "/fragment");

    let cmd = update(
        &mut model,
        Msg::Ajax(AjaxMsg::SendAndUpdate {
            name: "fragment".into(),
            container: "missing".into(),
            params: vec![],
            body: None,
        }),
    );
    let Some(Cmd::SendRequest { request, mode }) = cmd else {
        panic!("Expected SendRequest");
    };
    let cmd = update(
        &mut model,
        Msg::Ajax(AjaxMsg::Completed {
            request: request.id,
            name: request.name,
            mode,
            result: Ok(HttpResponse::ok("<p>hi</p>")),
        }),
    );
    assert!(cmd.is_none());
    assert!(model.ajax.targets.is_empty());
}
