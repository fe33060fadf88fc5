//! Built-in shell commands
//!
//! Every command is a pure function of `(args, stdin, context)` returning
//! captured stdout, stderr, and an exit code. The set is closed and
//! statically registered; scenario modules may add their own commands via
//! [`ShellBuilder::builtin`](crate::ShellBuilder::builtin).
//!
//! # Custom Builtins
//!
//! ```rust
//! use mocksh::{async_trait, Builtin, BuiltinContext, ExecResult, Shell};
//!
//! struct Banner;
//!
//! #[async_trait]
//! impl Builtin for Banner {
//!     async fn run(&self, _ctx: BuiltinContext<'_>) -> mocksh::Result<ExecResult> {
//!         Ok(ExecResult::ok("welcome to the sandbox\n"))
//!     }
//! }
//!
//! let shell = Shell::builder().builtin("banner", Box::new(Banner)).build();
//! ```

mod android;
mod base64;
mod cat;
mod curl;
mod echo;
mod grep;
mod headtail;
mod ls;
mod navigation;
mod seq;
mod system;
mod wc;
mod xargs;

pub use android::Adb;
pub use base64::Base64;
pub use cat::Cat;
pub use curl::Curl;
pub use echo::Echo;
pub use grep::Grep;
pub use headtail::{Head, Tail};
pub use ls::{Find, Ls};
pub use navigation::{Cd, Pwd};
pub use seq::Seq;
pub use system::{Help, Whoami};
pub use wc::Wc;
pub use xargs::Xargs;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;
use crate::shell::{ExecResult, Shell, ShellContext};

/// Execution context for builtin commands.
pub struct Context<'a> {
    /// Command arguments, not including the command name.
    pub args: &'a [String],

    /// Output of the previous pipeline stage; empty for the first stage.
    pub stdin: &'a str,

    /// The owning shell, for commands that re-invoke the engine (`xargs`).
    pub shell: &'a Shell,

    /// The mutable shell context: env, cwd, session data, collaborators.
    pub ctx: &'a mut ShellContext,
}

/// Trait for builtin commands.
///
/// Return `Ok(ExecResult)` for both success and command-level failure
/// (missing file, bad argument); the exit code carries the distinction.
/// An `Err` is a fault in the builtin itself and is folded into a
/// command-prefixed exit-1 stderr at the dispatch boundary.
#[async_trait]
pub trait Builtin: Send + Sync {
    async fn run(&self, ctx: Context<'_>) -> Result<ExecResult>;
}

/// The fixed command table. `findstr` is an alias of `grep`.
pub(crate) fn registry() -> HashMap<String, Box<dyn Builtin>> {
    let mut table: HashMap<String, Box<dyn Builtin>> = HashMap::new();
    table.insert("echo".to_string(), Box::new(Echo));
    table.insert("help".to_string(), Box::new(Help));
    table.insert("whoami".to_string(), Box::new(Whoami));
    table.insert("pwd".to_string(), Box::new(Pwd));
    table.insert("cd".to_string(), Box::new(Cd));
    table.insert("ls".to_string(), Box::new(Ls));
    table.insert("cat".to_string(), Box::new(Cat));
    table.insert("find".to_string(), Box::new(Find));
    table.insert("grep".to_string(), Box::new(Grep));
    table.insert("findstr".to_string(), Box::new(Grep));
    table.insert("head".to_string(), Box::new(Head));
    table.insert("tail".to_string(), Box::new(Tail));
    table.insert("wc".to_string(), Box::new(Wc));
    table.insert("seq".to_string(), Box::new(Seq));
    table.insert("xargs".to_string(), Box::new(Xargs));
    table.insert("curl".to_string(), Box::new(Curl));
    table.insert("adb".to_string(), Box::new(Adb));
    table.insert("base64".to_string(), Box::new(Base64));
    table
}

/// Read a command's input: the file named at `args[offset]` when present,
/// otherwise the pipeline stdin. The error string is ready for a
/// command-prefixed message (`"grep: {err}"`).
pub(crate) fn read_source(
    args: &[String],
    offset: usize,
    stdin: &str,
    ctx: &ShellContext,
) -> std::result::Result<String, String> {
    if let (Some(path), Some(fs)) = (args.get(offset), &ctx.fs) {
        return fs
            .read_file(path, &ctx.cwd)
            .map_err(|_| format!("file not found: {path}"));
    }
    Ok(stdin.to_string())
}
