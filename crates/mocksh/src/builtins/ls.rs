//! ls and find builtins

use async_trait::async_trait;

use super::{Builtin, Context};
use crate::error::Result;
use crate::shell::ExecResult;

/// The ls builtin: sorted child names, one per line.
pub struct Ls;

#[async_trait]
impl Builtin for Ls {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult> {
        let Some(fs) = ctx.ctx.fs.clone() else {
            return Ok(ExecResult::err("filesystem unavailable", 1));
        };
        let target = ctx.args.first().map(String::as_str).unwrap_or(".");
        match fs.list_dir(target, &ctx.ctx.cwd) {
            Ok(names) if names.is_empty() => Ok(ExecResult::ok("")),
            Ok(names) => Ok(ExecResult::ok(format!("{}\n", names.join("\n")))),
            Err(_) => Ok(ExecResult::err(
                format!("ls: cannot access '{target}': No such file or directory"),
                1,
            )),
        }
    }
}

/// The find builtin: `find [-name PATTERN] [START]`.
///
/// `*` is stripped from the pattern, leaving case-insensitive substring
/// semantics: `-name "*.log"` matches anything whose basename contains
/// `.log`.
pub struct Find;

#[async_trait]
impl Builtin for Find {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult> {
        let Some(fs) = ctx.ctx.fs.clone() else {
            return Ok(ExecResult::err("filesystem unavailable", 1));
        };
        let mut start = ".";
        let mut name_contains = String::new();

        let mut i = 0;
        while i < ctx.args.len() {
            let token = ctx.args[i].as_str();
            if token == "-name" && i + 1 < ctx.args.len() {
                name_contains = ctx.args[i + 1].replace('*', "");
                i += 2;
                continue;
            }
            if !token.starts_with('-') {
                start = token;
            }
            i += 1;
        }

        let results = fs.find(start, &ctx.ctx.cwd, &name_contains);
        if results.is_empty() {
            Ok(ExecResult::ok(""))
        } else {
            Ok(ExecResult::ok(format!("{}\n", results.join("\n"))))
        }
    }
}
