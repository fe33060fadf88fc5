//! Virtual filesystem for Mocksh
//!
//! An in-memory, read-only tree built once from a nested mapping literal.
//! Paths are plain strings resolved POSIX-style against a caller-supplied
//! working directory; traversal can never leave the root.

mod tree;

pub use tree::{Node, VirtualFs};
