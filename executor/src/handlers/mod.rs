//! Action handlers.
//!
//! Each handler owns everything it needs to run one [`ActionKind`] and turns
//! its outcome, including launch failures, into an [`ActionResponse`].

pub mod create_branch;

use crate::core::action::ActionKind;
use crate::core::types::{ActionResponse, Payload};

pub use create_branch::CreateBranch;
pub use run_tests::RunTests;

/// Common capability shared by all handlers.
pub trait ActionHandler: Send + Sync {
    fn kind(&self) -> ActionKind;

    /// Run the action to completion. Blocks on any subprocesses it starts.
    fn handle(&self, payload: &Payload) -> ActionResponse;
}
