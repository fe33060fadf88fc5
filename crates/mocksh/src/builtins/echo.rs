//! echo builtin command

use async_trait::async_trait;

use super::{Builtin, Context};
use crate::error::Result;
use crate::shell::ExecResult;

/// The echo builtin.
///
/// With arguments, prints them joined by spaces. With none, passes stdin
/// through, supplying a trailing newline if the input lacks one, which
/// makes `... | echo` usable as a line terminator in pipelines.
pub struct Echo;

#[async_trait]
impl Builtin for Echo {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult> {
        if !ctx.args.is_empty() {
            return Ok(ExecResult::ok(format!("{}\n", ctx.args.join(" "))));
        }
        let mut out = ctx.stdin.to_string();
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        Ok(ExecResult::ok(out))
    }
}
