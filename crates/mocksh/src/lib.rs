//! Mocksh - deterministic mock shell and virtual HTTP sandbox
//!
//! A restricted command interpreter for scripted training scenarios: a
//! fixed builtin set (including a `curl` simulator) runs against an
//! in-memory filesystem and an in-memory route table, with resource
//! limits and captured output. Nothing touches the host: no processes,
//! no files, no sockets.
//!
//! # Example
//!
//! ```rust
//! use mocksh::{Shell, VirtualFs};
//! use serde_json::json;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let fs = VirtualFs::from_tree(&json!({
//!         "/home/user": { "notes.txt": "the flag is upstairs\n" },
//!     }))?;
//!     let shell = Shell::builder().fs(fs).build();
//!
//!     let result = shell.exec("cat /home/user/notes.txt | grep flag").await;
//!     assert_eq!(result.stdout, "the flag is upstairs\n");
//!     assert_eq!(result.exit_code, 0);
//!     Ok(())
//! }
//! ```

mod builtins;
mod error;
mod fs;
mod http;
mod limits;
mod parser;
mod shell;

pub use async_trait::async_trait;

pub use builtins::{Builtin, Context as BuiltinContext};
pub use error::{Error, Result};
pub use fs::{Node, VirtualFs};
pub use http::{
    status_text, HttpRequest, HttpResponse, Route, RouteHandler, StaticResponse, VirtualRouter,
};
pub use limits::{LimitExceeded, Limits, TRUNCATION_MARKER};
pub use parser::{parse_command_line, CommandLine, Pipeline, Stage};
pub use shell::{ExecResult, Shell, ShellBuilder, ShellContext};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn training_shell() -> Shell {
        let fs = VirtualFs::from_tree(&json!({
            "/home/user": {
                "readme.txt": "look closer\n",
                "logs": { "app.log": "I/App: boot\nD/Secret: Key = 42\n" },
            },
        }))
        .expect("tree is valid");
        Shell::builder()
            .fs(fs)
            .env("USER", "learner")
            .env("HOME", "/home/user")
            .build()
    }

    #[tokio::test]
    async fn test_echo_hello() {
        let shell = Shell::new();
        let result = shell.exec("echo hello").await;
        assert_eq!(result.stdout, "hello\n");
        assert_eq!(result.exit_code, 0);
    }

    #[tokio::test]
    async fn test_empty_command_is_noop() {
        let shell = Shell::new();
        let result = shell.exec("").await;
        assert_eq!(result, ExecResult::default());

        let result = shell.exec(" | && ").await;
        assert_eq!(result, ExecResult::default());
    }

    #[tokio::test]
    async fn test_pipeline_hand_off() {
        let shell = Shell::new();
        let result = shell.exec("echo hi | grep h").await;
        assert_eq!(result.stdout, "hi\n");
        assert_eq!(result.exit_code, 0);
    }

    #[tokio::test]
    async fn test_pipeline_three_stages() {
        let shell = Shell::new();
        let result = shell.exec("seq 5 | head -n 3 | tail -n 1").await;
        assert_eq!(result.stdout, "3\n");
    }

    #[tokio::test]
    async fn test_chain_runs_in_order() {
        let shell = training_shell();
        let result = shell.exec("cd /home/user && pwd").await;
        assert_eq!(result.stdout, "/home/user\n");
        assert_eq!(result.exit_code, 0);
    }

    #[tokio::test]
    async fn test_chain_reports_last_output_only() {
        let shell = Shell::new();
        let result = shell.exec("echo first && echo second").await;
        assert_eq!(result.stdout, "second\n");
    }

    #[tokio::test]
    async fn test_chain_failure_aborts_rest() {
        let shell = Shell::new();
        let result = shell.exec("cat /missing && echo never").await;
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stdout, "");
        assert_eq!(result.stderr, "cat: /missing: No such file or directory");
    }

    #[tokio::test]
    async fn test_disallowed_command() {
        let shell = Shell::builder().allow(["echo"]).build();
        let result = shell.exec("whoami").await;
        assert_eq!(result.exit_code, 126);
        assert_eq!(result.stderr, "command not allowed: whoami");
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let shell = Shell::builder().allow(["echo", "rm"]).build();
        let result = shell.exec("rm -rf /").await;
        assert_eq!(result.exit_code, 127);
        assert_eq!(result.stderr, "command not found: rm");
    }

    #[tokio::test]
    async fn test_disallowed_stage_stops_pipeline() {
        let shell = Shell::builder().allow(["echo"]).build();
        let result = shell.exec("whoami | echo hi").await;
        assert_eq!(result.exit_code, 126);
        assert_eq!(result.stdout, "");
    }

    #[tokio::test]
    async fn test_cwd_persists_across_calls() {
        let shell = training_shell();
        let mut ctx = ShellContext::new();
        shell.exec_with("cd /home/user/logs", &mut ctx).await;
        let result = shell.exec_with("pwd", &mut ctx).await;
        assert_eq!(result.stdout, "/home/user/logs\n");
    }

    #[tokio::test]
    async fn test_logcat_scenario() {
        let shell = Shell::builder()
            .env("ADB_LOGCAT", "D/Tag: hello")
            .build();
        let result = shell.exec("adb logcat -d").await;
        assert_eq!(result.stdout, "D/Tag: hello\n");
        assert_eq!(result.exit_code, 0);
    }

    #[tokio::test]
    async fn test_logcat_grep_scenario() {
        let shell = training_shell();
        let mut ctx = ShellContext::new()
            .env("ADB_LOGCAT", "I/App: boot\nD/Secret: Key = 42\nI/App: done");
        let result = shell
            .exec_with("adb logcat -d | grep Secret", &mut ctx)
            .await;
        assert_eq!(result.stdout, "D/Secret: Key = 42\n");
    }

    #[tokio::test]
    async fn test_findstr_alias() {
        let shell = Shell::new();
        let result = shell.exec("echo hi | findstr h").await;
        assert_eq!(result.stdout, "hi\n");
    }

    #[tokio::test]
    async fn test_for_loop_fast_path() {
        let shell = Shell::new();
        let result = shell
            .exec("for i in $(seq 1 3); do echo ${i}; done")
            .await;
        assert_eq!(result.stdout, "1\n2\n3\n");
        assert_eq!(result.exit_code, 0);
    }

    #[tokio::test]
    async fn test_for_loop_bare_variable() {
        let shell = Shell::new();
        let result = shell.exec("for n in $(seq 2 1); do echo $n; done").await;
        assert_eq!(result.stdout, "2\n1\n");
    }

    #[tokio::test]
    async fn test_for_loop_body_pipeline() {
        let shell = Shell::new();
        let result = shell
            .exec("for i in $(seq 1 2); do echo line${i} | grep line; done")
            .await;
        assert_eq!(result.stdout, "line1\nline2\n");
    }

    #[tokio::test]
    async fn test_command_too_long() {
        let shell = Shell::new();
        let long = format!("echo {}", "x".repeat(1_300));
        let result = shell.exec(&long).await;
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stderr, "command too long (max 1250)");
        assert_eq!(result.stdout, "");
    }

    #[tokio::test]
    async fn test_too_many_stages() {
        let shell = Shell::new();
        let command = vec!["echo x"; 9].join(" | ");
        let result = shell.exec(&command).await;
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stderr, "too many pipeline stages (max 8)");
    }

    #[tokio::test]
    async fn test_unterminated_quote_is_exit_1() {
        let shell = Shell::new();
        let result = shell.exec("echo \"open").await;
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stderr, "no closing quotation");
    }

    #[tokio::test]
    async fn test_output_truncation() {
        let shell = Shell::builder()
            .limits(Limits::new().max_output_bytes(16))
            .build();
        let result = shell.exec("seq 1 100").await;
        assert!(result.stdout.ends_with(TRUNCATION_MARKER));
        assert_eq!(result.stdout.matches("...(truncated)").count(), 1);
        assert!(result.stdout.len() <= 16 + TRUNCATION_MARKER.len());
    }

    #[tokio::test]
    async fn test_recursion_depth_cap() {
        let shell = Shell::new();
        let mut ctx = ShellContext::new();
        ctx.depth = 51;
        let result = shell.exec_with("echo hi", &mut ctx).await;
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stderr, "recursion depth exceeded (max 50)");
    }

    #[tokio::test]
    async fn test_loop_iteration_cap() {
        let shell = Shell::builder()
            .limits(Limits::new().max_loop_iterations(3))
            .build();
        let result = shell
            .exec("for i in $(seq 1 10); do echo ${i}; done")
            .await;
        assert_eq!(result.stdout, "1\n2\n3\n");
        assert_eq!(result.exit_code, 1);
        assert!(result.stderr.contains("loop iterations exceeded (max 3)"));
    }

    #[tokio::test]
    async fn test_custom_builtin_registration() {
        struct Banner;

        #[crate::async_trait]
        impl Builtin for Banner {
            async fn run(&self, _ctx: BuiltinContext<'_>) -> Result<ExecResult> {
                Ok(ExecResult::ok("scenario online\n"))
            }
        }

        let shell = Shell::builder().builtin("banner", Box::new(Banner)).build();
        let result = shell.exec("banner").await;
        assert_eq!(result.stdout, "scenario online\n");
    }

    #[tokio::test]
    async fn test_help_reflects_allowlist() {
        let shell = Shell::builder().allow(["adb", "grep"]).build();
        let result = shell.exec("help").await;
        assert_eq!(result.exit_code, 126, "help itself must be allowed");

        let shell = Shell::builder().allow(["adb", "grep", "help"]).build();
        let result = shell.exec("help").await;
        assert_eq!(
            result.stdout,
            "Available commands:\n  - adb\n  - grep\n  - help\n"
        );
    }
}
