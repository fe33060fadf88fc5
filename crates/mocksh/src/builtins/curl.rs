//! curl builtin - HTTP client simulator
//!
//! Dispatches exclusively through the shell's virtual router; no real
//! network access exists anywhere in the sandbox.

use async_trait::async_trait;
use std::collections::HashMap;

use super::{Builtin, Context};
use crate::error::Result;
use crate::http::status_text;
use crate::shell::ExecResult;

/// The curl builtin.
///
/// Usage: curl [-v|-i|--include] [-X METHOD] [-H HEADER]...
///             [-d|--data|--data-raw BODY] URL
///
/// `-d` without an explicit `-X` implies POST. An HTTP-level failure
/// (404, 401, ...) is still shell exit 0; the failure is visible only in
/// the response body, matching real curl semantics.
pub struct Curl;

struct CurlArgs {
    method: String,
    url: String,
    headers: HashMap<String, String>,
    body: String,
    show_headers: bool,
}

fn parse_args(args: &[String]) -> CurlArgs {
    let mut parsed = CurlArgs {
        method: "GET".to_string(),
        url: String::new(),
        headers: HashMap::new(),
        body: String::new(),
        show_headers: false,
    };

    let mut i = 0;
    while i < args.len() {
        let token = args[i].as_str();
        match token {
            "-v" | "-i" | "--include" => {
                parsed.show_headers = true;
                i += 1;
            }
            "-X" if i + 1 < args.len() => {
                parsed.method = args[i + 1].to_uppercase();
                i += 2;
            }
            "-H" | "--header" if i + 1 < args.len() => {
                if let Some((name, value)) = args[i + 1].split_once(':') {
                    parsed
                        .headers
                        .insert(name.trim().to_lowercase(), value.trim().to_string());
                }
                i += 2;
            }
            "-d" | "--data" | "--data-raw" if i + 1 < args.len() => {
                parsed.body = args[i + 1].clone();
                if parsed.method == "GET" {
                    parsed.method = "POST".to_string();
                }
                i += 2;
            }
            _ if !token.starts_with('-') && parsed.url.is_empty() => {
                parsed.url = token.to_string();
                i += 1;
            }
            _ => {
                // Unknown options are skipped for compatibility.
                i += 1;
            }
        }
    }
    parsed
}

#[async_trait]
impl Builtin for Curl {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult> {
        let Some(http) = ctx.ctx.http.clone() else {
            return Ok(ExecResult::err("virtual http unavailable", 1));
        };
        let parsed = parse_args(ctx.args);
        if parsed.url.is_empty() {
            return Ok(ExecResult::err("curl: URL required", 1));
        }

        let resp = http.request(
            &parsed.method,
            &parsed.url,
            parsed.headers,
            &parsed.body,
            ctx.ctx,
        );

        let mut body = resp.body.clone();
        if !body.is_empty() && !body.ends_with('\n') {
            body.push('\n');
        }

        if !parsed.show_headers {
            return Ok(ExecResult::ok(body));
        }

        let mut lines = vec![format!(
            "< HTTP/1.1 {} {}",
            resp.status,
            status_text(resp.status)
        )];
        for (name, value) in &resp.headers {
            lines.push(format!("< {name}: {value}"));
        }
        lines.push("<".to_string());
        lines.push(body.trim_end_matches('\n').to_string());
        Ok(ExecResult::ok(format!("{}\n", lines.join("\n"))))
    }
}
