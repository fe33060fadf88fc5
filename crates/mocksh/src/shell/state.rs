//! Execution result type

use serde::Serialize;

/// Result of executing one command line: captured stdout, stderr, and the
/// exit code of the last stage that ran.
///
/// Serializes with camelCase keys, the shape transport layers return to
/// clients as `{"stdout": ..., "stderr": ..., "exitCode": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecResult {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Exit code
    pub exit_code: i32,
}

impl ExecResult {
    /// A successful result with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: 0,
        }
    }

    /// A failed result with the given stderr.
    pub fn err(stderr: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    /// Whether the result indicates success.
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}
