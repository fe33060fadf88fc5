//! xargs builtin command

use async_trait::async_trait;

use super::{Builtin, Context};
use crate::error::Result;
use crate::parser::join_words;
use crate::shell::ExecResult;

/// The xargs builtin: `xargs [-I TOKEN] COMMAND...`.
///
/// Splits stdin on whitespace and re-invokes the shell once per token,
/// substituting the token for the placeholder (default `{}`) in every
/// argument of the command template. Outputs concatenate in token order;
/// the exit code is the last invocation's, so an earlier failure does not
/// abort the batch.
pub struct Xargs;

#[async_trait]
impl Builtin for Xargs {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult> {
        if ctx.stdin.trim().is_empty() {
            return Ok(ExecResult::err("xargs: stdin required", 1));
        }
        if ctx.args.is_empty() {
            return Ok(ExecResult::err("xargs: command required", 1));
        }

        let mut placeholder = "{}".to_string();
        let mut i = 0;
        while i < ctx.args.len() {
            if ctx.args[i] == "-I" && i + 1 < ctx.args.len() {
                placeholder = ctx.args[i + 1].clone();
                i += 2;
                continue;
            }
            break;
        }
        let template = &ctx.args[i..];
        if template.is_empty() {
            return Ok(ExecResult::err("xargs: command required", 1));
        }

        let normalized = ctx.stdin.replace('\r', "\n");
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(ExecResult::ok(""));
        }

        let mut stdout = String::new();
        let mut stderr = String::new();
        let mut last_code = 0;

        for token in tokens {
            let rendered: Vec<String> = template
                .iter()
                .map(|part| part.replace(placeholder.as_str(), token))
                .collect();
            let line = join_words(rendered.iter().map(String::as_str));
            let result = ctx.shell.exec_nested(line, ctx.ctx).await;
            stdout.push_str(&result.stdout);
            stderr.push_str(&result.stderr);
            last_code = result.exit_code;
        }

        Ok(ExecResult {
            stdout,
            stderr,
            exit_code: last_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::shell::{Shell, ShellContext};

    // xargs re-enters the engine, so it is tested through the shell
    // rather than in isolation.

    #[tokio::test]
    async fn test_xargs_echo_per_token() {
        let shell = Shell::new();
        let result = shell.exec("echo 'a b' | xargs -I{} echo {}").await;
        assert_eq!(result.stdout, "a\nb\n");
        assert_eq!(result.exit_code, 0);
    }

    #[tokio::test]
    async fn test_xargs_default_placeholder() {
        let shell = Shell::new();
        let result = shell.exec("echo 2 | xargs seq {}").await;
        assert_eq!(result.stdout, "1\n2\n");
    }

    #[tokio::test]
    async fn test_xargs_without_stdin() {
        let shell = Shell::new();
        let result = shell.exec("xargs echo hi").await;
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stderr, "xargs: stdin required");
    }

    #[tokio::test]
    async fn test_xargs_without_command() {
        let shell = Shell::new();
        let result = shell.exec("echo a | xargs").await;
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stderr, "xargs: command required");
    }

    #[tokio::test]
    async fn test_xargs_last_exit_code_wins() {
        let shell = Shell::new();
        // First token fails (missing file), second succeeds; the batch
        // reports the last invocation's code.
        let mut ctx = ShellContext::new();
        let result = shell
            .exec_with("echo 'nope 2' | xargs seq {}", &mut ctx)
            .await;
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "1\n2\n");
        assert!(result.stderr.contains("seq: numeric arguments required"));
    }

    #[tokio::test]
    async fn test_xargs_crlf_stdin() {
        let shell = Shell::new();
        let mut ctx = ShellContext::new();
        let result = shell
            .exec_with("echo 'a\r\nb' | xargs -I{} echo {}", &mut ctx)
            .await;
        assert_eq!(result.stdout, "a\nb\n");
    }
}
