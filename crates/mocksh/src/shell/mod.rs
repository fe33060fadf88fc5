//! Shell engine
//!
//! Orchestrates one execute call: limit checks, the bounded for-loop fast
//! path, parsing, chain/pipeline execution with stop-on-first-failure,
//! retroactive per-command timeouts, and final output truncation.
//! Execution is strictly sequential; piping is a string hand-off between
//! stages, never concurrent streaming.

mod context;
mod state;

pub use context::ShellContext;
pub use state::ExecResult;

use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, LazyLock};
use std::time::Instant;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use regex::Regex;

use crate::builtins::{self, Builtin, Context};
use crate::fs::VirtualFs;
use crate::http::VirtualRouter;
use crate::limits::{LimitExceeded, Limits};
use crate::parser;

/// The one loop form the sandbox understands:
/// `for VAR in $(seq START END); do BODY; done`, newline-tolerant.
static FOR_LOOP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)^\s*for\s+([A-Za-z_]\w*)\s+in\s+\$\(\s*seq\s+(-?\d+)\s+(-?\d+)\s*\)\s*;\s*do\s+(.+?)\s*;\s*done\s*$",
    )
    .expect("for-loop pattern is valid")
});

/// Sandboxed shell instance.
///
/// Owns the default collaborators (filesystem, router, allowlist, limits)
/// and the builtin registry. One instance serves any number of execute
/// calls; per-session mutable state lives in the [`ShellContext`] the
/// caller threads through.
pub struct Shell {
    fs: Arc<VirtualFs>,
    http: Arc<VirtualRouter>,
    allowed: HashSet<String>,
    limits: Limits,
    default_env: HashMap<String, String>,
    builtins: HashMap<String, Box<dyn Builtin>>,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    /// Create a shell with an empty filesystem, an empty route table, and
    /// every builtin allowed.
    pub fn new() -> Self {
        ShellBuilder::default().build()
    }

    /// Create a [`ShellBuilder`] for customized configuration.
    pub fn builder() -> ShellBuilder {
        ShellBuilder::default()
    }

    /// Execute a command line in a fresh context seeded with the shell's
    /// default environment.
    pub async fn exec(&self, command: &str) -> ExecResult {
        let mut ctx = ShellContext::new();
        ctx.env = self.default_env.clone();
        self.exec_with(command, &mut ctx).await
    }

    /// Execute a command line in a caller-supplied context. The context's
    /// `fs`/`http`/`allowed` fall back to the shell's own when unset; the
    /// caller keeps the context to preserve `cwd` and session data across
    /// calls.
    pub async fn exec_with(&self, command: &str, ctx: &mut ShellContext) -> ExecResult {
        if ctx.fs.is_none() {
            ctx.fs = Some(Arc::clone(&self.fs));
        }
        if ctx.http.is_none() {
            ctx.http = Some(Arc::clone(&self.http));
        }
        if ctx.allowed.is_none() {
            ctx.allowed = Some(self.allowed.clone());
        }
        self.execute(command, ctx).await
    }

    /// Re-enter the engine from a builtin (`xargs`) or the for-loop with a
    /// rendered sub-command. Bumps the recursion depth for the duration.
    pub(crate) fn exec_nested<'a>(
        &'a self,
        command: String,
        ctx: &'a mut ShellContext,
    ) -> BoxFuture<'a, ExecResult> {
        Box::pin(async move {
            ctx.depth += 1;
            let result = self.execute(&command, ctx).await;
            ctx.depth -= 1;
            result
        })
    }

    async fn execute(&self, command: &str, ctx: &mut ShellContext) -> ExecResult {
        tracing::debug!(len = command.len(), depth = ctx.depth, "execute");

        if ctx.depth > self.limits.max_shell_depth {
            return ExecResult::err(
                LimitExceeded::ShellDepth(self.limits.max_shell_depth).to_string(),
                1,
            );
        }
        if let Err(limit) = self.limits.check_input_len(command) {
            return ExecResult::err(limit.to_string(), 1);
        }

        if let Some(result) = self.run_bounded_loop(command, ctx).await {
            return result;
        }

        let line = match parser::parse_command_line(command) {
            Ok(line) => line,
            Err(err) => return ExecResult::err(err.to_string(), 1),
        };
        if let Err(limit) = self.limits.check_stage_count(line.stage_count()) {
            return ExecResult::err(limit.to_string(), 1);
        }
        if line.is_empty() {
            return ExecResult::default();
        }

        // Stop-on-first-failure across chains: a failing chain aborts the
        // remaining ones, and only the last executed chain's output is
        // reported.
        let mut last = ExecResult::default();
        for pipeline in &line.chains {
            let mut stdin = String::new();
            let mut result = ExecResult::default();
            for stage in &pipeline.stages {
                result = self.run_stage(&stage.argv, &stdin, ctx).await;
                if result.exit_code != 0 {
                    break;
                }
                stdin = result.stdout.clone();
            }
            let failed = result.exit_code != 0;
            last = result;
            if failed {
                break;
            }
        }

        self.finish(last)
    }

    /// Fast path for the single supported loop form. Returns `None` when
    /// the command is not a loop, handing control back to the parser.
    async fn run_bounded_loop(
        &self,
        command: &str,
        ctx: &mut ShellContext,
    ) -> Option<ExecResult> {
        let caps = FOR_LOOP.captures(command)?;
        let var = &caps[1];
        let body = caps[4].to_string();
        let (Ok(start), Ok(end)) = (caps[2].parse::<i64>(), caps[3].parse::<i64>()) else {
            return Some(ExecResult::err("seq: numeric arguments required", 1));
        };

        let step: i128 = if end >= start { 1 } else { -1 };
        let end = end as i128;
        let brace_pattern = format!("${{{var}}}");
        let bare_pattern = format!("${var}");

        let mut stdout = String::new();
        let mut stderr = String::new();
        let mut last_code = 0;
        let mut iterations = 0usize;

        let mut i = start as i128;
        while (step > 0 && i <= end) || (step < 0 && i >= end) {
            iterations += 1;
            if iterations > self.limits.max_loop_iterations {
                if !stderr.is_empty() && !stderr.ends_with('\n') {
                    stderr.push('\n');
                }
                stderr.push_str(
                    &LimitExceeded::LoopIterations(self.limits.max_loop_iterations).to_string(),
                );
                last_code = 1;
                break;
            }

            let value = i.to_string();
            let rendered = body
                .replace(&brace_pattern, &value)
                .replace(&bare_pattern, &value);
            let result = self.exec_nested(rendered, ctx).await;
            stdout.push_str(&result.stdout);
            stderr.push_str(&result.stderr);
            last_code = result.exit_code;
            i += step;
        }

        Some(self.finish(ExecResult {
            stdout,
            stderr,
            exit_code: last_code,
        }))
    }

    async fn run_stage(&self, argv: &[String], stdin: &str, ctx: &mut ShellContext) -> ExecResult {
        let Some(name) = argv.first() else {
            return ExecResult::default();
        };
        tracing::trace!(command = %name, args = argv.len() - 1, "stage");

        let allowed = ctx
            .allowed
            .as_ref()
            .is_some_and(|allowed| allowed.contains(name.as_str()));
        if !allowed {
            return ExecResult::err(format!("command not allowed: {name}"), 126);
        }
        let Some(builtin) = self.builtins.get(name.as_str()) else {
            return ExecResult::err(format!("command not found: {name}"), 127);
        };

        let started = Instant::now();
        let run = builtin.run(Context {
            args: &argv[1..],
            stdin,
            shell: self,
            ctx,
        });
        // A panicking builtin must not take down the engine or the
        // enclosing pipeline; unwinding is kept on in release for this.
        let result = match AssertUnwindSafe(run).catch_unwind().await {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => ExecResult::err(format!("{name}: {err}"), 1),
            Err(_) => ExecResult::err(format!("{name}: internal error"), 1),
        };

        if started.elapsed() > self.limits.command_timeout {
            return ExecResult::err(LimitExceeded::Timeout(name.clone()).to_string(), 124);
        }
        result
    }

    /// Clip final stdout/stderr to the output budget.
    fn finish(&self, result: ExecResult) -> ExecResult {
        let (stdout, _) = self.limits.truncate_output(&result.stdout);
        let (stderr, _) = self.limits.truncate_output(&result.stderr);
        ExecResult {
            stdout,
            stderr,
            exit_code: result.exit_code,
        }
    }

    /// The shell's resource limits.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }
}

/// Builder for customized [`Shell`] configuration. This is the
/// registration surface scenario modules use: a filesystem tree, a route
/// table, a command allowlist, and optional custom builtins.
#[derive(Default)]
pub struct ShellBuilder {
    fs: Option<VirtualFs>,
    http: Option<VirtualRouter>,
    allowed: Option<HashSet<String>>,
    limits: Option<Limits>,
    env: HashMap<String, String>,
    extra_builtins: Vec<(String, Box<dyn Builtin>)>,
}

impl ShellBuilder {
    /// Set the virtual filesystem.
    pub fn fs(mut self, fs: VirtualFs) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Set the virtual route table.
    pub fn http(mut self, router: VirtualRouter) -> Self {
        self.http = Some(router);
        self
    }

    /// Restrict the allowed command set. Without this, every registered
    /// builtin is allowed.
    pub fn allow<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Override the resource limits.
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Set a default environment variable for contexts created by
    /// [`Shell::exec`]. Caller-supplied contexts are never touched.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Register a custom builtin command.
    pub fn builtin(mut self, name: impl Into<String>, builtin: Box<dyn Builtin>) -> Self {
        self.extra_builtins.push((name.into(), builtin));
        self
    }

    /// Build the shell.
    pub fn build(self) -> Shell {
        let mut registry = builtins::registry();
        for (name, builtin) in self.extra_builtins {
            registry.insert(name, builtin);
        }
        let allowed = self
            .allowed
            .unwrap_or_else(|| registry.keys().cloned().collect());

        Shell {
            fs: Arc::new(self.fs.unwrap_or_default()),
            http: Arc::new(self.http.unwrap_or_default()),
            allowed,
            limits: self.limits.unwrap_or_default(),
            default_env: self.env,
            builtins: registry,
        }
    }
}
