//! cat builtin command

use async_trait::async_trait;

use super::{Builtin, Context};
use crate::error::Result;
use crate::shell::ExecResult;

/// The cat builtin. With no arguments, passes stdin through; otherwise
/// concatenates the named files, failing on the first one missing.
pub struct Cat;

#[async_trait]
impl Builtin for Cat {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult> {
        if ctx.args.is_empty() {
            return Ok(ExecResult::ok(ctx.stdin));
        }
        let Some(fs) = ctx.ctx.fs.clone() else {
            return Ok(ExecResult::err("filesystem unavailable", 1));
        };

        let mut chunks = Vec::with_capacity(ctx.args.len());
        for path in ctx.args {
            match fs.read_file(path, &ctx.ctx.cwd) {
                Ok(content) => chunks.push(content),
                Err(_) => {
                    return Ok(ExecResult::err(
                        format!("cat: {path}: No such file or directory"),
                        1,
                    ));
                }
            }
        }
        let mut out = chunks.join("\n");
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        Ok(ExecResult::ok(out))
    }
}
