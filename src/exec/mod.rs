//! External process and HTTP execution
//!
//! Every `git`/`gh` call and every HTTP GET goes through this module so that
//! timeouts, output capture and failure reporting behave the same way.

pub mod http;
pub mod process;

pub use http::{HttpFetcher, HttpRequest};
pub use process::{CommandOutput, CommandRunner, Invocation, ProcessRunner};
