//! grep builtin command (also registered as `findstr`)

use async_trait::async_trait;

use super::{read_source, Builtin, Context};
use crate::error::Result;
use crate::shell::ExecResult;

/// The grep builtin: `grep [-i] PATTERN [FILE]`.
///
/// Plain substring matching per line, not regex; `-i` makes it
/// case-insensitive. Reads the named file or, without one, the pipeline
/// stdin. `findstr` is the same command under its Windows name, so hints
/// written for either platform work unchanged.
pub struct Grep;

#[async_trait]
impl Builtin for Grep {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult> {
        if ctx.args.is_empty() {
            return Ok(ExecResult::err("grep: pattern required", 1));
        }

        let mut ignore_case = false;
        let mut i = 0;
        while i < ctx.args.len() && ctx.args[i].starts_with('-') {
            if ctx.args[i] == "-i" {
                ignore_case = true;
            }
            i += 1;
        }
        let Some(pattern) = ctx.args.get(i) else {
            return Ok(ExecResult::err("grep: pattern required", 1));
        };

        let text = match read_source(ctx.args, i + 1, ctx.stdin, ctx.ctx) {
            Ok(text) => text,
            Err(err) => return Ok(ExecResult::err(format!("grep: {err}"), 1)),
        };

        let needle = if ignore_case {
            pattern.to_lowercase()
        } else {
            pattern.clone()
        };
        let matches: Vec<&str> = text
            .lines()
            .filter(|line| {
                if ignore_case {
                    line.to_lowercase().contains(&needle)
                } else {
                    line.contains(needle.as_str())
                }
            })
            .collect();

        if matches.is_empty() {
            Ok(ExecResult::ok(""))
        } else {
            Ok(ExecResult::ok(format!("{}\n", matches.join("\n"))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::testing::run_builtin;
    use crate::fs::VirtualFs;
    use crate::shell::ShellContext;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_grep_stdin_substring() {
        let mut ctx = ShellContext::new();
        let result = run_builtin(&Grep, &["Key"], "D/Secret: Key = 1\nI/Other: x\n", &mut ctx).await;
        assert_eq!(result.stdout, "D/Secret: Key = 1\n");
        assert_eq!(result.exit_code, 0);
    }

    #[tokio::test]
    async fn test_grep_case_insensitive_flag() {
        let mut ctx = ShellContext::new();
        let result = run_builtin(&Grep, &["-i", "key"], "a KEY b\nnothing\n", &mut ctx).await;
        assert_eq!(result.stdout, "a KEY b\n");
    }

    #[tokio::test]
    async fn test_grep_no_match_is_quiet_success() {
        let mut ctx = ShellContext::new();
        let result = run_builtin(&Grep, &["zzz"], "abc\n", &mut ctx).await;
        assert_eq!(result.stdout, "");
        assert_eq!(result.exit_code, 0);
    }

    #[tokio::test]
    async fn test_grep_pattern_required() {
        let mut ctx = ShellContext::new();
        let result = run_builtin(&Grep, &[], "abc", &mut ctx).await;
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stderr, "grep: pattern required");

        let result = run_builtin(&Grep, &["-i"], "abc", &mut ctx).await;
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stderr, "grep: pattern required");
    }

    #[tokio::test]
    async fn test_grep_reads_file_argument() {
        let fs = VirtualFs::from_tree(&json!({
            "/logs": { "app.log": "I/App: ok\nE/App: fail\n" },
        }))
        .unwrap();
        let mut ctx = ShellContext::new();
        ctx.fs = Some(Arc::new(fs));
        let result = run_builtin(&Grep, &["E/App", "/logs/app.log"], "", &mut ctx).await;
        assert_eq!(result.stdout, "E/App: fail\n");
    }

    #[tokio::test]
    async fn test_grep_missing_file() {
        let mut ctx = ShellContext::new();
        ctx.fs = Some(Arc::new(VirtualFs::new()));
        let result = run_builtin(&Grep, &["x", "/nope"], "", &mut ctx).await;
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stderr, "grep: file not found: /nope");
    }

    #[tokio::test]
    async fn test_grep_pattern_with_pipe_char() {
        let mut ctx = ShellContext::new();
        let result = run_builtin(&Grep, &["a|b"], "has a|b inside\nnope\n", &mut ctx).await;
        assert_eq!(result.stdout, "has a|b inside\n");
    }
}
