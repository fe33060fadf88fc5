//! Route table and dispatch

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use url::Url;

use super::response::{HttpRequest, HttpResponse};
use crate::shell::ShellContext;

/// Body returned for requests no route claims.
const NOT_FOUND_BODY: &str =
    r#"{"ok":false,"error":{"code":"NOT_FOUND","message":"route not found"}}"#;

/// A scenario endpoint: receives the request and the live shell context,
/// returns the full response. The handler owns status, headers, auth and
/// business logic; session state belongs in `ctx.data` or in per-session
/// state captured by the closure, never in globals.
pub trait RouteHandler: Send + Sync {
    fn handle(&self, req: &HttpRequest, ctx: &mut ShellContext) -> HttpResponse;
}

impl<F> RouteHandler for F
where
    F: Fn(&HttpRequest, &mut ShellContext) -> HttpResponse + Send + Sync,
{
    fn handle(&self, req: &HttpRequest, ctx: &mut ShellContext) -> HttpResponse {
        self(req, ctx)
    }
}

/// A canned response: status, optional headers, body. A missing header
/// list falls back to `content-type: application/json`; a non-string body
/// is JSON-serialized compactly at dispatch time.
#[derive(Debug, Clone)]
pub struct StaticResponse {
    pub status: u16,
    pub headers: Option<Vec<(String, String)>>,
    pub body: Value,
}

impl StaticResponse {
    pub fn new(body: impl Into<Value>) -> Self {
        Self {
            status: 200,
            headers: None,
            body: body.into(),
        }
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Vec::new)
            .push((name.into(), value.into()));
        self
    }
}

/// One route table entry.
pub enum Route {
    Static(StaticResponse),
    Handler(Arc<dyn RouteHandler>),
}

impl Route {
    /// A 200 route with a JSON payload.
    pub fn json(body: Value) -> Self {
        Route::Static(StaticResponse::new(body))
    }

    /// A route backed by a handler function.
    pub fn handler<H: RouteHandler + 'static>(handler: H) -> Self {
        Route::Handler(Arc::new(handler))
    }
}

impl From<StaticResponse> for Route {
    fn from(response: StaticResponse) -> Self {
        Route::Static(response)
    }
}

/// Route table keyed by `METHOD:path?query`, `METHOD:path`, or the
/// catch-all `*`. Lookup priority is always exact query match, then
/// path-only match, then wildcard, then a synthesized 404.
#[derive(Default)]
pub struct VirtualRouter {
    routes: HashMap<String, Route>,
}

impl VirtualRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. Later registrations replace earlier ones.
    pub fn route(mut self, key: impl Into<String>, route: impl Into<Route>) -> Self {
        self.routes.insert(key.into(), route.into());
        self
    }

    /// Dispatch one request.
    pub fn request(
        &self,
        method: &str,
        raw_url: &str,
        headers: HashMap<String, String>,
        body: &str,
        ctx: &mut ShellContext,
    ) -> HttpResponse {
        let method = if method.is_empty() {
            "GET".to_string()
        } else {
            method.to_uppercase()
        };
        let (path, query) = split_url(raw_url);

        let key_path = format!("{method}:{path}");
        let route = if query.is_empty() {
            None
        } else {
            self.routes.get(&format!("{key_path}?{query}"))
        };
        let route = route
            .or_else(|| self.routes.get(&key_path))
            .or_else(|| self.routes.get("*"));

        tracing::debug!(%method, %path, %query, matched = route.is_some(), "route lookup");

        let Some(route) = route else {
            return HttpResponse {
                status: 404,
                body: NOT_FOUND_BODY.to_string(),
                ..HttpResponse::default()
            };
        };

        match route {
            Route::Handler(handler) => {
                let req = HttpRequest {
                    method,
                    path,
                    query,
                    headers,
                    body: body.to_string(),
                };
                handler.handle(&req, ctx)
            }
            Route::Static(canned) => HttpResponse {
                status: canned.status,
                headers: canned.headers.clone().unwrap_or_else(|| {
                    vec![("content-type".to_string(), "application/json".to_string())]
                }),
                body: match &canned.body {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            },
        }
    }
}

/// Split a URL into (path, query). Absolute URLs go through the `url`
/// crate; scheme-less strings (a learner typing `curl /api/me`) fall back
/// to a plain `path?query` split, mirroring how lenient URL parsers treat
/// them.
fn split_url(raw: &str) -> (String, String) {
    if let Ok(parsed) = Url::parse(raw) {
        let path = parsed.path();
        let path = if path.is_empty() { "/" } else { path };
        return (
            path.to_string(),
            parsed.query().unwrap_or_default().to_string(),
        );
    }
    let without_fragment = raw.split('#').next().unwrap_or(raw);
    match without_fragment.split_once('?') {
        Some((path, query)) => {
            let path = if path.is_empty() { "/" } else { path };
            (path.to_string(), query.to_string())
        }
        None => {
            let path = if without_fragment.is_empty() {
                "/"
            } else {
                without_fragment
            };
            (path.to_string(), String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::ShellContext;
    use serde_json::json;

    fn get(router: &VirtualRouter, url: &str) -> HttpResponse {
        let mut ctx = ShellContext::new();
        router.request("GET", url, HashMap::new(), "", &mut ctx)
    }

    #[test]
    fn test_split_url_absolute() {
        assert_eq!(
            split_url("http://api.local/users/1?full=1"),
            ("/users/1".to_string(), "full=1".to_string())
        );
        assert_eq!(split_url("http://api.local"), ("/".to_string(), String::new()));
    }

    #[test]
    fn test_split_url_schemeless() {
        assert_eq!(split_url("/api/me"), ("/api/me".to_string(), String::new()));
        assert_eq!(
            split_url("/search?q=flag"),
            ("/search".to_string(), "q=flag".to_string())
        );
    }

    #[test]
    fn test_lookup_priority() {
        let router = VirtualRouter::new()
            .route("GET:/a?x=1", Route::json(json!("query")))
            .route("GET:/a", Route::json(json!("path")))
            .route("*", Route::json(json!("wildcard")));

        assert_eq!(get(&router, "http://h/a?x=1").body, "\"query\"");
        assert_eq!(get(&router, "http://h/a?x=2").body, "\"path\"");
        assert_eq!(get(&router, "http://h/a").body, "\"path\"");
        assert_eq!(get(&router, "http://h/other").body, "\"wildcard\"");
    }

    #[test]
    fn test_unrouted_request_404() {
        let router = VirtualRouter::new();
        let resp = get(&router, "http://h/none");
        assert_eq!(resp.status, 404);
        assert_eq!(
            resp.body,
            r#"{"ok":false,"error":{"code":"NOT_FOUND","message":"route not found"}}"#
        );
    }

    #[test]
    fn test_method_is_uppercased() {
        let router = VirtualRouter::new().route("POST:/submit", Route::json(json!(1)));
        let mut ctx = ShellContext::new();
        let resp = router.request("post", "http://h/submit", HashMap::new(), "", &mut ctx);
        assert_eq!(resp.status, 200);
    }

    #[test]
    fn test_static_string_body_passes_through() {
        let router =
            VirtualRouter::new().route("GET:/motd", Route::Static(StaticResponse::new("hi")));
        assert_eq!(get(&router, "http://h/motd").body, "hi");
    }

    #[test]
    fn test_static_status_and_headers() {
        let router = VirtualRouter::new().route(
            "GET:/admin",
            StaticResponse::new(json!({"ok": false}))
                .status(403)
                .header("x-reason", "denied"),
        );
        let resp = get(&router, "http://h/admin");
        assert_eq!(resp.status, 403);
        assert_eq!(
            resp.headers,
            vec![("x-reason".to_string(), "denied".to_string())]
        );
    }

    #[test]
    fn test_handler_sees_request_and_context() {
        let router = VirtualRouter::new().route(
            "POST:/echo",
            Route::handler(|req: &HttpRequest, ctx: &mut ShellContext| {
                ctx.data
                    .insert("hits".to_string(), json!(1));
                HttpResponse::new(req.body.clone())
            }),
        );
        let mut ctx = ShellContext::new();
        let resp = router.request(
            "POST",
            "http://h/echo",
            HashMap::new(),
            r#"{"a":1}"#,
            &mut ctx,
        );
        assert_eq!(resp.body, r#"{"a":1}"#);
        assert_eq!(ctx.data.get("hits"), Some(&json!(1)));
    }
}
