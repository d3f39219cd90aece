//! AJAX request dispatch
//!
//! Sends parameterized requests to logical request names and routes the
//! typed elements of `ajax-response` envelopes to registered handlers.
//!
//! # Architecture
//!
//! The engine itself never performs I/O. Preparing a request yields an
//! [`HttpRequest`] that the update loop wraps in `Cmd::SendRequest`; the
//! runtime executes it on a worker thread and feeds the result back as
//! `AjaxMsg::Completed`.
//!
//! ```text
//! AjaxMsg::Send ──► AjaxEngine::prepare ──► Cmd::SendRequest
//!                                              │ (worker thread)
//! AjaxMsg::Completed ◄─────────────────────────┘
//!     └─► parse_envelope ─► object  → AjaxHandler::deliver → Msg
//!                         ─► element → ContentTarget::replace
//! ```

mod envelope;
mod handler;
mod query;
mod registry;

pub use envelope::{
    parse_envelope, EnvelopeError, ResponseElement, ResponseKind, XmlElement, XmlNode,
    ENVELOPE_TAG,
};
pub use handler::{AjaxHandler, ContentTarget, GridUpdater, HandlerRegistry, TargetRegistry};
pub use query::{to_pairs, QueryParam};
pub use registry::RequestRegistry;

use reqwest::Url;

/// Version string sent in the `X-Rico-Version` header
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const VERSION_HEADER: &str = "X-Rico-Version";

/// Id assigned to every dispatched request, echoed back with its response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A fully prepared request, ready for the transport
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub id: RequestId,
    /// Logical name the request was sent under
    pub name: String,
    pub method: HttpMethod,
    /// Registered URL, possibly relative
    pub url: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Value of a query parameter, if present
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Resolve against an optional base URL and append the query parameters
    pub fn resolve_url(&self, base: Option<&Url>) -> Result<Url, String> {
        let mut url = match Url::parse(&self.url) {
            Ok(url) => url,
            Err(_) => {
                let base = base.ok_or_else(|| {
                    format!("Relative URL '{}' requires a base URL", self.url)
                })?;
                base.join(&self.url)
                    .map_err(|e| format!("Invalid URL '{}': {}", self.url, e))?
            }
        };

        if !self.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.params {
                pairs.append_pair(name, value);
            }
        }

        Ok(url)
    }
}

/// Raw transport result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// What to do with a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseMode {
    /// Parse as an `ajax-response` envelope and dispatch its elements
    Dispatch,
    /// Replace the inner content of a target with the raw body
    ReplaceContent { container: String },
}

/// Registries plus request id allocation
#[derive(Debug, Default)]
pub struct AjaxEngine {
    pub requests: RequestRegistry,
    pub handlers: HandlerRegistry,
    pub targets: TargetRegistry,
    next_request: u64,
}

impl AjaxEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_request(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.requests.register(name, url);
    }

    pub fn register_handler(&mut self, id: impl Into<String>, handler: Box<dyn AjaxHandler>) {
        self.handlers.register(id, handler);
    }

    pub fn register_target(&mut self, id: impl Into<String>) {
        self.targets.register(id);
    }

    /// Build a request for a logical name.
    ///
    /// Returns `None` for unregistered names. GET is used unless a body is
    /// supplied, in which case the body is POSTed as `text/xml`.
    pub fn prepare(
        &mut self,
        name: &str,
        params: &[QueryParam],
        body: Option<String>,
    ) -> Option<HttpRequest> {
        let Some(url) = self.requests.resolve(name) else {
            tracing::debug!("Ignoring send for unregistered request '{}'", name);
            return None;
        };
        let url = url.to_string();

        self.next_request += 1;
        let id = RequestId(self.next_request);

        let mut headers = vec![(VERSION_HEADER.to_string(), PROTOCOL_VERSION.to_string())];
        let method = if body.is_some() {
            headers.push(("Content-Type".to_string(), "text/xml".to_string()));
            HttpMethod::Post
        } else {
            HttpMethod::Get
        };

        Some(HttpRequest {
            id,
            name: name.to_string(),
            method,
            url,
            params: to_pairs(params),
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_unregistered_is_none() {
        let mut engine = AjaxEngine::new();
        assert!(engine.prepare("nope", &[], None).is_none());
    }

    #[test]
    fn test_prepare_get_without_body() {
        let mut engine = AjaxEngine::new();
        engine.register_request("rows", "/grid/rows");
        let request = engine
            .prepare("rows", &[QueryParam::pair("offset", 20)], None)
            .unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.param("offset"), Some("20"));
        assert!(request
            .headers
            .iter()
            .any(|(k, v)| k == VERSION_HEADER && v == PROTOCOL_VERSION));
    }

    #[test]
    fn test_prepare_post_with_body() {
        let mut engine = AjaxEngine::new();
        engine.register_request("save", "http://example.com/save");
        let request = engine
            .prepare("save", &[], Some("<doc/>".to_string()))
            .unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request
            .headers
            .iter()
            .any(|(k, v)| k == "Content-Type" && v == "text/xml"));
    }

    #[test]
    fn test_request_ids_increase() {
        let mut engine = AjaxEngine::new();
        engine.register_request("r", "/r");
        let a = engine.prepare("r", &[], None).unwrap();
        let b = engine.prepare("r", &[], None).unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn test_resolve_relative_url_with_base() {
        let mut engine = AjaxEngine::new();
        engine.register_request("rows", "/grid/rows");
        let request = engine
            .prepare(
                "rows",
                &[QueryParam::pair("id", "g"), QueryParam::raw("q=a b")],
                None,
            )
            .unwrap();
        let base = Url::parse("http://localhost:8080/app/").unwrap();
        let url = request.resolve_url(Some(&base)).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/grid/rows?id=g&q=a+b");
    }

    #[test]
    fn test_resolve_relative_url_without_base_fails() {
        let mut engine = AjaxEngine::new();
        engine.register_request("rows", "grid/rows");
        let request = engine.prepare("rows", &[], None).unwrap();
        assert!(request.resolve_url(None).is_err());
    }

    #[test]
    fn test_resolve_absolute_url_ignores_base() {
        let mut engine = AjaxEngine::new();
        engine.register_request("rows", "https://data.example.com/rows");
        let request = engine.prepare("rows", &[], None).unwrap();
        let base = Url::parse("http://localhost/").unwrap();
        let url = request.resolve_url(Some(&base)).unwrap();
        assert_eq!(url.as_str(), "https://data.example.com/rows");
    }
}
