//! Request/response types for the virtual router

use std::collections::HashMap;

/// One simulated HTTP request, as assembled by the `curl` builtin.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    /// Upper-cased method (`GET`, `POST`, ...).
    pub method: String,
    /// URL path component; `/` when the URL has none.
    pub path: String,
    /// Raw query string without the leading `?`; empty when absent.
    pub query: String,
    /// Header map with lower-cased keys.
    pub headers: HashMap<String, String>,
    /// Raw request body.
    pub body: String,
}

/// One simulated HTTP response. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Insertion-ordered headers, rendered in order by `curl -v`.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self {
            status: 200,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: String::new(),
        }
    }
}

impl HttpResponse {
    /// A 200 response with the default `application/json` content type.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    /// A response with the given status and a compact-JSON body.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Replace the default headers with the given list.
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }
}

/// Reason phrase for the small set of statuses the sandbox uses.
/// Unknown codes render as `OK`; only `curl -v` output consumes this.
pub fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "OK",
    }
}
