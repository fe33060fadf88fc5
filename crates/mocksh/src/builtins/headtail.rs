//! head and tail builtins

use async_trait::async_trait;

use super::{read_source, Builtin, Context};
use crate::error::Result;
use crate::shell::ExecResult;

const DEFAULT_LINES: usize = 10;

/// Parse a leading `-n N`. An unparsable count leaves the argument list
/// untouched, so the `-n` token then reads as a (missing) filename.
fn parse_count(args: &[String]) -> (usize, &[String]) {
    if args.len() >= 2 && args[0] == "-n" {
        if let Ok(n) = args[1].parse::<i64>() {
            return (n.max(0) as usize, &args[2..]);
        }
    }
    (DEFAULT_LINES, args)
}

fn joined(lines: &[&str]) -> String {
    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    }
}

/// The head builtin: first N lines (default 10) of a file or stdin.
pub struct Head;

#[async_trait]
impl Builtin for Head {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult> {
        let (n, rest) = parse_count(ctx.args);
        let text = match read_source(rest, 0, ctx.stdin, ctx.ctx) {
            Ok(text) => text,
            Err(err) => return Ok(ExecResult::err(format!("head: {err}"), 1)),
        };
        let lines: Vec<&str> = text.lines().take(n).collect();
        Ok(ExecResult::ok(joined(&lines)))
    }
}

/// The tail builtin: last N lines (default 10); `-n 0` yields nothing.
pub struct Tail;

#[async_trait]
impl Builtin for Tail {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult> {
        let (n, rest) = parse_count(ctx.args);
        let text = match read_source(rest, 0, ctx.stdin, ctx.ctx) {
            Ok(text) => text,
            Err(err) => return Ok(ExecResult::err(format!("tail: {err}"), 1)),
        };
        if n == 0 {
            return Ok(ExecResult::ok(""));
        }
        let all: Vec<&str> = text.lines().collect();
        let start = all.len().saturating_sub(n);
        Ok(ExecResult::ok(joined(&all[start..])))
    }
}
