//! `create_branch`: create a local branch, then push it upstream.

use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::core::action::ActionKind;
use crate::core::types::{ActionResponse, Payload};
use crate::handlers::ActionHandler;
use crate::io::git::Git;

pub const BRANCH_NAME_REQUIRED: &str = "branch name is required";

#[derive(Debug, Clone)]
pub struct CreateBranch {
    git: Git,
    remote: String,
}

impl CreateBranch {
    pub fn new(git: Git, remote: impl Into<String>) -> Self {
        Self {
            git,
            remote: remote.into(),
        }
    }
}

impl ActionHandler for CreateBranch {
    fn kind(&self) -> ActionKind {
        ActionKind::CreateBranch
    }

    /// Both git commands always run, even if the first one fails; the caller
    /// gets both results to reason about.
    #[instrument(skip_all, fields(workdir = %self.git.workdir().display()))]
    fn handle(&self, payload: &Payload) -> ActionResponse {
        let Some(branch) = payload
            .get("branch_name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
        else {
            warn!("create_branch called without branch_name");
            return ActionResponse::action_error(self.kind(), BRANCH_NAME_REQUIRED);
        };

        let outcome = self.git.checkout_new_branch(branch).and_then(|create| {
            let push = self.git.push_with_upstream(&self.remote, branch)?;
            Ok(vec![create, push])
        });
        let results = match outcome {
            Ok(results) => results,
            Err(err) => {
                let message = format!("{err:#}");
                error!(branch, err = %message, "git could not be run");
                return ActionResponse::action_error(self.kind(), message);
            }
        };

        info!(
            branch,
            exit_codes = ?results.iter().map(|r| r.exit_code).collect::<Vec<_>>(),
            "branch commands finished"
        );
        ActionResponse::branch_created(branch, results)
    }
}
