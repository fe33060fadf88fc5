//! Mutable execution context

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;

use crate::fs::VirtualFs;
use crate::http::VirtualRouter;

/// Mutable context threaded through one top-level execute call and every
/// command and nested execution it spawns.
///
/// A fresh context works out of the box: `fs`, `http` and `allowed` are
/// filled from the shell's own instances at the top of execution when
/// unset. Callers that want continuity across calls (a learner session
/// keeping its `cd` state, route handlers accumulating attempt counters)
/// hold onto the context and pass it back in.
pub struct ShellContext {
    /// Environment variables (USER, HOME, ADB_LOGCAT, ...). Read-only by
    /// convention once execution starts; populated at setup.
    pub env: HashMap<String, String>,

    /// Current working directory. Mutated only by `cd`.
    pub cwd: String,

    /// Caller-supplied session bag. Route handlers read and mutate this;
    /// it is the only sanctioned home for per-session mutable state.
    pub data: serde_json::Map<String, Value>,

    /// Filesystem handle; defaults to the shell's own instance.
    pub fs: Option<Arc<VirtualFs>>,

    /// Router handle; defaults to the shell's own instance.
    pub http: Option<Arc<VirtualRouter>>,

    /// Command names permitted in this context; defaults to the shell's
    /// own allowlist.
    pub allowed: Option<HashSet<String>>,

    /// Nested-execute depth, bumped by the for-loop and `xargs` re-entry
    /// paths and checked against the recursion limit.
    pub depth: usize,
}

impl Default for ShellContext {
    fn default() -> Self {
        Self {
            env: HashMap::new(),
            cwd: "/".to_string(),
            data: serde_json::Map::new(),
            fs: None,
            http: None,
            allowed: None,
            depth: 0,
        }
    }
}

impl ShellContext {
    /// A fresh context rooted at `/`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an environment variable, builder-style.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the working directory, builder-style.
    pub fn cwd(mut self, cwd: impl Into<String>) -> Self {
        self.cwd = cwd.into();
        self
    }

    /// Look up an environment variable.
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }
}
