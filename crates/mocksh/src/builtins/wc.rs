//! wc builtin command

use async_trait::async_trait;

use super::{read_source, Builtin, Context};
use crate::error::Result;
use crate::shell::ExecResult;

/// The wc builtin. Only line counting is supported: `-l` explicitly, or
/// implicitly when invoked bare on stdin.
pub struct Wc;

#[async_trait]
impl Builtin for Wc {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult> {
        let line_mode = ctx.args.is_empty() || ctx.args.iter().any(|a| a == "-l");
        let rest: Vec<String> = ctx.args.iter().filter(|a| *a != "-l").cloned().collect();

        let text = match read_source(&rest, 0, ctx.stdin, ctx.ctx) {
            Ok(text) => text,
            Err(err) => return Ok(ExecResult::err(format!("wc: {err}"), 1)),
        };
        if !line_mode {
            return Ok(ExecResult::err("wc: only -l is supported", 1));
        }
        Ok(ExecResult::ok(format!("{}\n", text.lines().count())))
    }
}
