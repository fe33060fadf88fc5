//! Virtual HTTP router for Mocksh
//!
//! Stands in for a real network: the `curl` builtin dispatches every
//! request through a route table of canned responses and handler
//! callbacks. Handlers receive the live [`ShellContext`] so scenario
//! endpoints can read and mutate caller-supplied session state; no
//! request ever touches a socket.
//!
//! [`ShellContext`]: crate::ShellContext

mod response;
mod router;

pub use response::{status_text, HttpRequest, HttpResponse};
pub use router::{Route, RouteHandler, StaticResponse, VirtualRouter};
