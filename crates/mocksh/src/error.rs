//! Error types for Mocksh
//!
//! Nothing in this enum ever escapes [`Shell::exec`](crate::Shell::exec):
//! every error is folded into the `(stdout, stderr, exit_code)` triple at
//! the dispatch boundary. The enum exists so internal layers (parser,
//! filesystem, router) can propagate failures with `?` before the engine
//! flattens them.

use crate::limits::LimitExceeded;
use thiserror::Error;

/// Result type alias using Mocksh's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Mocksh error types.
///
/// Messages are written to be shown verbatim on a command's stderr.
#[derive(Error, Debug)]
pub enum Error {
    /// Parse error while splitting or tokenizing a command line.
    #[error("{0}")]
    Parse(String),

    /// A path did not resolve to a usable filesystem node.
    #[error("file not found: {0}")]
    NotFound(String),

    /// Execution error while running a command.
    #[error("{0}")]
    Execution(String),

    /// Resource limit exceeded.
    #[error("{0}")]
    Limit(#[from] LimitExceeded),

    /// Internal error for unexpected failures.
    ///
    /// Used for recovered panics and logic errors; the message never
    /// carries payload data, so a misbehaving builtin cannot leak state
    /// through its crash.
    #[error("internal error: {0}")]
    Internal(String),
}
