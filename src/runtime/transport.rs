//! HTTP execution for prepared requests

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

use crate::ajax::{HttpMethod, HttpRequest, HttpResponse};

/// Executes a prepared request. Called on worker threads.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, String>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, String> + Send + Sync,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
        self(request)
    }
}

/// Blocking `reqwest` client with an optional base for relative URLs
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: Option<Url>,
}

impl HttpTransport {
    pub fn new(base_url: Option<&str>, timeout: Duration) -> Result<Self> {
        let base_url = base_url
            .map(|url| Url::parse(url).with_context(|| format!("Invalid base URL '{}'", url)))
            .transpose()?;
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
        let url = request.resolve_url(self.base_url.as_ref())?;
        tracing::debug!("{:?} {}", request.method, url);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| e.to_string())?;
        Ok(HttpResponse { status, body })
    }
}
