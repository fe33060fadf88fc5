//! Resource limits for sandboxed execution
//!
//! These limits keep a learner's command line from consuming unbounded
//! resources: input length, pipeline width, per-command wall clock, total
//! output size, and (unlike the systems this simulates) recursion depth
//! and loop iterations.

use std::time::Duration;

/// Marker appended to output clipped by [`Limits::truncate_output`].
pub const TRUNCATION_MARKER: &str = "\n...(truncated)\n";

/// Resource limits for command execution.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum raw command length in characters.
    /// Default: 1,250
    pub max_input_chars: usize,

    /// Maximum total pipeline stage count across all chains.
    /// Default: 8
    pub max_pipe_stages: usize,

    /// Maximum final stdout/stderr size in bytes before truncation.
    /// Default: 50,000
    pub max_output_bytes: usize,

    /// Wall-clock budget for a single builtin. Checked after the builtin
    /// returns, so this is retroactive, not preemptive.
    /// Default: 500ms
    pub command_timeout: Duration,

    /// Maximum nested-execute depth (for-loop bodies, xargs).
    /// Default: 50
    pub max_shell_depth: usize,

    /// Maximum iterations of the bounded for-loop form.
    /// Default: 10,000
    pub max_loop_iterations: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_chars: 1_250,
            max_pipe_stages: 8,
            max_output_bytes: 50_000,
            command_timeout: Duration::from_millis(500),
            max_shell_depth: 50,
            max_loop_iterations: 10_000,
        }
    }
}

impl Limits {
    /// Create new limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum input length in characters.
    pub fn max_input_chars(mut self, count: usize) -> Self {
        self.max_input_chars = count;
        self
    }

    /// Set maximum pipeline stage count.
    pub fn max_pipe_stages(mut self, count: usize) -> Self {
        self.max_pipe_stages = count;
        self
    }

    /// Set maximum output size in bytes.
    pub fn max_output_bytes(mut self, bytes: usize) -> Self {
        self.max_output_bytes = bytes;
        self
    }

    /// Set the per-command wall-clock budget.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Set maximum nested-execute depth.
    pub fn max_shell_depth(mut self, depth: usize) -> Self {
        self.max_shell_depth = depth;
        self
    }

    /// Set maximum for-loop iterations.
    pub fn max_loop_iterations(mut self, count: usize) -> Self {
        self.max_loop_iterations = count;
        self
    }

    /// Reject a raw command string that exceeds the input cap.
    pub fn check_input_len(&self, command: &str) -> Result<(), LimitExceeded> {
        if command.chars().count() > self.max_input_chars {
            return Err(LimitExceeded::InputLength(self.max_input_chars));
        }
        Ok(())
    }

    /// Reject a parsed command line with too many pipeline stages.
    pub fn check_stage_count(&self, stage_count: usize) -> Result<(), LimitExceeded> {
        if stage_count > self.max_pipe_stages {
            return Err(LimitExceeded::PipeStages(self.max_pipe_stages));
        }
        Ok(())
    }

    /// Clip `text` to the output byte cap on a UTF-8 boundary, appending
    /// [`TRUNCATION_MARKER`] when anything was removed.
    ///
    /// Returns the (possibly clipped) text and whether truncation happened.
    pub fn truncate_output(&self, text: &str) -> (String, bool) {
        if text.len() <= self.max_output_bytes {
            return (text.to_string(), false);
        }
        let mut end = self.max_output_bytes;
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        (format!("{}{}", &text[..end], TRUNCATION_MARKER), true)
    }
}

/// Error returned when a resource limit is exceeded.
///
/// Messages match what learners see on stderr.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LimitExceeded {
    #[error("command too long (max {0})")]
    InputLength(usize),

    #[error("too many pipeline stages (max {0})")]
    PipeStages(usize),

    #[error("command timeout: {0}")]
    Timeout(String),

    #[error("recursion depth exceeded (max {0})")]
    ShellDepth(usize),

    #[error("loop iterations exceeded (max {0})")]
    LoopIterations(usize),
}
