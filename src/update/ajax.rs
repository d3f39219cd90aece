//! Request dispatch and response routing
//!
//! Failure handling is quiet: unregistered names, transport
//! errors, non-200 statuses and malformed envelopes abort processing with a
//! log line and no state change. Only an unknown response type is reported
//! to the user.

use crate::ajax::{
    parse_envelope, HttpResponse, QueryParam, RequestId, ResponseElement, ResponseKind,
    ResponseMode,
};
use crate::commands::{Cmd, Notification};
use crate::messages::AjaxMsg;
use crate::model::AppModel;

pub fn update_ajax(model: &mut AppModel, msg: AjaxMsg) -> Option<Cmd> {
    match msg {
        AjaxMsg::RegisterRequest { name, url } => {
            tracing::debug!("Registered request '{}' -> {}", name, url);
            model.ajax.register_request(name, url);
            None
        }
        AjaxMsg::RegisterTarget { id } => {
            model.ajax.register_target(id);
            None
        }
        AjaxMsg::Send { name, params, body } => {
            send_request(model, &name, &params, body, ResponseMode::Dispatch)
        }
        AjaxMsg::SendAndUpdate {
            name,
            container,
            params,
            body,
        } => send_request(
            model,
            &name,
            &params,
            body,
            ResponseMode::ReplaceContent { container },
        ),
        AjaxMsg::Completed {
            request,
            name,
            mode,
            result,
        } => request_completed(model, request, &name, mode, result),
    }
}

/// Prepare a request and hand it to the runtime. Unregistered names are a no-op.
pub fn send_request(
    model: &mut AppModel,
    name: &str,
    params: &[QueryParam],
    body: Option<String>,
    mode: ResponseMode,
) -> Option<Cmd> {
    let request = model.ajax.prepare(name, params, body)?;
    tracing::debug!(
        "Sending {:?} '{}' ({:?}, {} params)",
        request.id,
        name,
        request.method,
        request.params.len()
    );
    Some(Cmd::SendRequest { request, mode })
}

fn request_completed(
    model: &mut AppModel,
    request: RequestId,
    name: &str,
    mode: ResponseMode,
    result: Result<HttpResponse, String>,
) -> Option<Cmd> {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Request {:?} '{}' failed: {}", request, name, e);
            return None;
        }
    };

    if !response.is_success() {
        tracing::warn!(
            "Request {:?} '{}' returned status {}, ignoring response",
            request,
            name,
            response.status
        );
        return None;
    }

    match mode {
        ResponseMode::ReplaceContent { container } => {
            let Some(target) = model.ajax.targets.get_mut(&container) else {
                tracing::debug!("No content target '{}' for '{}'", container, name);
                return None;
            };
            target.replace(response.body);
            Some(Cmd::Notify(Notification::ContentReplaced { target: container }))
        }
        ResponseMode::Dispatch => {
            let elements = match parse_envelope(&response.body, request) {
                Ok(elements) => elements,
                Err(e) => {
                    tracing::warn!("Request {:?} '{}': {}", request, name, e);
                    return None;
                }
            };

            let cmds: Vec<Option<Cmd>> = elements
                .into_iter()
                .map(|element| dispatch_element(model, element))
                .collect();
            Cmd::merge(cmds)
        }
    }
}

/// Route one response element. Unknown ids are ignored; an unknown type is
/// reported and processing carries on with the next element.
fn dispatch_element(model: &mut AppModel, element: ResponseElement) -> Option<Cmd> {
    let id = element.id.clone().unwrap_or_default();

    match &element.kind {
        ResponseKind::Object => {
            let Some(handler) = model.ajax.handlers.get_mut(&id) else {
                tracing::debug!("No handler registered for '{}'", id);
                return None;
            };
            let follow_up = handler.deliver(&element)?;
            super::update(model, follow_up)
        }
        ResponseKind::Element => {
            let Some(target) = model.ajax.targets.get_mut(&id) else {
                tracing::debug!("No content target registered for '{}'", id);
                return None;
            };
            target.replace(element.element.inner_xml());
            Some(Cmd::Notify(Notification::ContentReplaced { target: id }))
        }
        ResponseKind::Unknown(kind) => {
            let message = format!("Unrecognized ajax response type: '{}' (id '{}')", kind, id);
            model.push_diagnostic(message.clone());
            Some(Cmd::Notify(Notification::Diagnostic(message)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ajax::HttpMethod;
    use crate::messages::Msg;

    fn completed(model: &mut AppModel, body: &str) -> Option<Cmd> {
        update_ajax(
            model,
            AjaxMsg::Completed {
                request: RequestId(1),
                name: "r".into(),
                mode: ResponseMode::Dispatch,
                result: Ok(HttpResponse::ok(body)),
            },
        )
    }

    #[test]
    fn test_send_unregistered_is_noop() {
        let mut model = AppModel::new();
        let cmd = update_ajax(
            &mut model,
            AjaxMsg::Send {
                name: "missing".into(),
                params: vec![],
                body: None,
            },
        );
        assert!(cmd.is_none());
    }

    #[test]
    fn test_send_with_body_posts() {
        let mut model = AppModel::new();
        model.ajax.register_request("save", "/save");
        let cmd = update_ajax(
            &mut model,
            AjaxMsg::Send {
                name: "save".into(),
                params: vec![QueryParam::raw("a=1")],
                body: Some("<x/>".into()),
            },
        );
        match cmd {
            Some(Cmd::SendRequest { request, mode }) => {
                assert_eq!(request.method, HttpMethod::Post);
                assert_eq!(request.param("a"), Some("1"));
                assert_eq!(mode, ResponseMode::Dispatch);
            }
            other => panic!("Expected SendRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_element_response_replaces_target() {
        let mut model = AppModel::new();
        model.ajax.register_target("status");
        let cmd = completed(
            &mut model,
            r#"<ajax-response><response type="element" id="status"><b>ok</b></response></ajax-response>"#,
        );
        assert!(matches!(
            cmd,
            Some(Cmd::Notify(Notification::ContentReplaced { ref target })) if target == "status"
        ));
        assert_eq!(model.ajax.targets.get("status").unwrap().inner(), "<b>ok</b>");
    }

    #[test]
    fn test_unknown_type_reports_and_continues() {
        let mut model = AppModel::new();
        model.ajax.register_target("status");
        let cmd = completed(
            &mut model,
            r#"<ajax-response>
                 <response type="script" id="x"/>
                 <response type="element" id="status">done</response>
               </ajax-response>"#,
        );
        assert_eq!(model.diagnostics.len(), 1);
        assert!(model.diagnostics[0].contains("script"));
        assert_eq!(model.ajax.targets.get("status").unwrap().inner(), "done");
        assert_eq!(cmd.map(Cmd::flatten).unwrap_or_default().len(), 2);
    }

    #[test]
    fn test_object_response_reaches_handler() {
        let mut model = AppModel::new();
        let seen = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = seen.clone();
        model.ajax.register_handler(
            "tally",
            Box::new(move |_: &ResponseElement| -> Option<Msg> {
                counter.set(counter.get() + 1);
                None
            }),
        );
        completed(
            &mut model,
            r#"<ajax-response><response type="object" id="tally"/><response type="object" id="nobody"/></ajax-response>"#,
        );
        assert_eq!(seen.get(), 1);
        assert!(model.diagnostics.is_empty());
    }

    #[test]
    fn test_non_200_is_silent() {
        let mut model = AppModel::new();
        model.ajax.register_target("status");
        let cmd = update_ajax(
            &mut model,
            AjaxMsg::Completed {
                request: RequestId(1),
                name: "r".into(),
                mode: ResponseMode::Dispatch,
                result: Ok(HttpResponse {
                    status: 500,
                    body: r#"<ajax-response><response type="element" id="status">x</response></ajax-response>"#.into(),
                }),
            },
        );
        assert!(cmd.is_none());
        assert_eq!(model.ajax.targets.get("status").unwrap().replacements(), 0);
        assert!(model.diagnostics.is_empty());
    }

    #[test]
    fn test_duplicate_envelope_is_ignored() {
        let mut model = AppModel::new();
        model.ajax.register_target("status");
        let cmd = completed(
            &mut model,
            r#"<r><ajax-response><response type="element" id="status">a</response></ajax-response><ajax-response/></r>"#,
        );
        assert!(cmd.is_none());
        assert_eq!(model.ajax.targets.get("status").unwrap().replacements(), 0);
    }

    #[test]
    fn test_send_and_update_replaces_with_raw_body() {
        let mut model = AppModel::new();
        model.ajax.register_request("fragment", "/fragment");
        model.ajax.register_target("panel");
        let cmd = update_ajax(
            &mut model,
            AjaxMsg::SendAndUpdate {
                name: "fragment".into(),
                container: "panel".into(),
                params: vec![],
                body: None,
            },
        );
        let Some(Cmd::SendRequest { request, mode }) = cmd else {
            panic!("Expected SendRequest");
        };
        update_ajax(
            &mut model,
            AjaxMsg::Completed {
                request: request.id,
                name: request.name,
                mode,
                result: Ok(HttpResponse::ok("<p>not an envelope</p>")),
            },
        );
        assert_eq!(
            model.ajax.targets.get("panel").unwrap().inner(),
            "<p>not an envelope</p>"
        );
    }
}
