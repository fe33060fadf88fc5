//! help and whoami builtins

use async_trait::async_trait;

use super::{Builtin, Context};
use crate::error::Result;
use crate::shell::ExecResult;

/// Username reported by `whoami` when the environment carries none.
pub const DEFAULT_USERNAME: &str = "guest";

/// The help builtin: lists the commands allowed in this context, sorted.
pub struct Help;

#[async_trait]
impl Builtin for Help {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult> {
        let mut names: Vec<&str> = ctx
            .ctx
            .allowed
            .iter()
            .flatten()
            .map(String::as_str)
            .collect();
        names.sort_unstable();

        let mut out = String::from("Available commands:");
        for name in names {
            out.push_str("\n  - ");
            out.push_str(name);
        }
        out.push('\n');
        Ok(ExecResult::ok(out))
    }
}

/// The whoami builtin: prints `$USER` or the guest fallback.
pub struct Whoami;

#[async_trait]
impl Builtin for Whoami {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult> {
        let user = ctx.ctx.env_var("USER").unwrap_or(DEFAULT_USERNAME);
        Ok(ExecResult::ok(format!("{user}\n")))
    }
}
