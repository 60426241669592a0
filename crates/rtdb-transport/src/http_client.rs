//! reqwest-backed transport.

use std::error::Error as StdError;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::endpoint::TransportConfig;
use crate::error::{TransportError, TransportResult};
use crate::message::{HttpRequest, HttpResponse, Method};
use crate::transport::HttpTransport;

/// Sends requests through a shared [`reqwest::Client`].
#[derive(Clone, Debug)]
pub struct HttpClientTransport {
    client: Client,
}

impl HttpClientTransport {
    pub fn new(config: &TransportConfig) -> TransportResult<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for HttpClientTransport {
    async fn send(&self, request: HttpRequest) -> TransportResult<HttpResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            // hyper derives Content-Length from the body itself.
            if name.eq_ignore_ascii_case("content-length") {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
        let body = response.bytes().await.map_err(classify)?;
        debug!(status = status.as_u16(), bytes = body.len(), "response received");

        Ok(HttpResponse::new(status.as_u16(), reason, body))
    }
}

/// Map a reqwest failure onto the transport taxonomy.
fn classify(err: reqwest::Error) -> TransportError {
    let detail = error_chain(&err);
    if err.is_timeout() {
        TransportError::Timeout(detail)
    } else if err.is_connect() {
        let lowered = detail.to_ascii_lowercase();
        if lowered.contains("dns") || lowered.contains("resolve") || lowered.contains("lookup") {
            TransportError::Resolve(detail)
        } else {
            TransportError::Connect(detail)
        }
    } else if err.is_body() || err.is_decode() {
        TransportError::Body(detail)
    } else {
        TransportError::Other(detail)
    }
}

/// The error message followed by every source, joined with `: `.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
