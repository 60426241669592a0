use std::fmt;

use bytes::Bytes;

/// HTTP verbs used against a tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Patch,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }

    /// Whether requests with this verb carry a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Put | Self::Patch | Self::Post)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully framed request, ready to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body with matching `Content-Type` and `Content-Length`.
    pub fn json_body(self, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        let len = body.len();
        let mut req = self
            .header("Content-Type", "application/json")
            .header("Content-Length", len.to_string());
        req.body = Some(body);
        req
    }

    /// First header value with the given name, case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }
}

/// A response as received, whatever its status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, reason: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    /// A response with the canonical reason phrase for `status`.
    pub fn with_status(status: u16, body: impl Into<Bytes>) -> Self {
        Self::new(status, canonical_reason(status), body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as text. Invalid UTF-8 is replaced, never rejected.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Status line in `HTTP/1.1 <code> <reason>` form.
    pub fn status_line(&self) -> String {
        let reason = if self.reason.is_empty() { "Unknown" } else { &self.reason };
        format!("HTTP/1.1 {} {reason}", self.status)
    }
}

fn canonical_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        412 => "Precondition Failed",
        413 => "Payload Too Large",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
