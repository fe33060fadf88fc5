//! base64 builtin command - encode/decode base64

use async_trait::async_trait;
use base64::Engine;

use super::{Builtin, Context};
use crate::error::Result;
use crate::shell::ExecResult;

/// The base64 builtin.
///
/// Usage: base64 [-d|--decode] [TEXT...]
///
/// Operates on the inline arguments joined by spaces, or on stdin when
/// none are given. Decoding strips whitespace first so piped input with a
/// trailing newline round-trips.
pub struct Base64;

#[async_trait]
impl Builtin for Base64 {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult> {
        let mut decode = false;
        let mut rest: Vec<&str> = Vec::new();
        for arg in ctx.args {
            match arg.as_str() {
                "-d" | "--decode" => decode = true,
                other => rest.push(other),
            }
        }

        let input = if rest.is_empty() {
            ctx.stdin.to_string()
        } else {
            rest.join(" ")
        };

        if decode {
            let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
            match base64::engine::general_purpose::STANDARD.decode(&cleaned) {
                Ok(bytes) => Ok(ExecResult::ok(
                    String::from_utf8_lossy(&bytes).to_string(),
                )),
                Err(err) => Ok(ExecResult::err(format!("base64: {err}"), 1)),
            }
        } else {
            let encoded = base64::engine::general_purpose::STANDARD.encode(&input);
            Ok(ExecResult::ok(format!("{encoded}\n")))
        }
    }
}
