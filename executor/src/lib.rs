//! Action executor: runs a small, fixed set of development actions on behalf
//! of HTTP clients.
//!
//! - **[`core`]**: Request decoding, the closed [`core::action::ActionKind`] set,
//!   and the JSON response model. No I/O.
//! - **[`io`]**: Side-effecting adapters (process execution, git, config).
//! - **[`handlers`]**: One handler per action, behind [`handlers::ActionHandler`].
//!
//! [`dispatch::Dispatcher`] ties these together; the HTTP surface lives in the
//! `executor-server` crate.

pub mod core;
pub mod dispatch;
pub mod handlers;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Name reported by the health endpoint.
pub const AGENT_NAME: &str = "Action Executor";

/// `"<name> v<version>"`, as reported by the health endpoint.
pub fn agent_label() -> String {
    format!("{AGENT_NAME} v{}", env!("CARGO_PKG_VERSION"))
}
