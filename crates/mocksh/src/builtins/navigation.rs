//! cd and pwd builtins

use async_trait::async_trait;

use super::{Builtin, Context};
use crate::error::Result;
use crate::shell::ExecResult;

/// The cd builtin. Targets default to `$HOME`, then `/`. The only command
/// that mutates the context's working directory.
pub struct Cd;

#[async_trait]
impl Builtin for Cd {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult> {
        let target = match ctx.args.first() {
            Some(arg) => arg.clone(),
            None => ctx.ctx.env_var("HOME").unwrap_or("/").to_string(),
        };
        let Some(fs) = ctx.ctx.fs.clone() else {
            return Ok(ExecResult::err("filesystem unavailable", 1));
        };
        let resolved = fs.resolve(&target, &ctx.ctx.cwd);
        if !fs.is_dir(&resolved, "/") {
            return Ok(ExecResult::err(
                format!("cd: no such directory: {target}"),
                1,
            ));
        }
        ctx.ctx.cwd = resolved;
        Ok(ExecResult::ok(""))
    }
}

/// The pwd builtin.
pub struct Pwd;

#[async_trait]
impl Builtin for Pwd {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult> {
        Ok(ExecResult::ok(format!("{}\n", ctx.ctx.cwd)))
    }
}
