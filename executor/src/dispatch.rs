//! Maps action requests to their handlers.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::core::action::ActionKind;
use crate::core::types::{ActionRequest, ActionResponse};
use crate::handlers::{ActionHandler, CreateBranch, RunTests};
use crate::io::config::ExecutorConfig;
use crate::io::git::Git;

/// What the HTTP layer needs from a dispatcher.
pub trait ActionDispatch: Send + Sync {
    /// Working directory every subprocess runs in.
    fn project_path(&self) -> &Path;

    /// Run one request to completion. Blocks on subprocesses.
    fn execute(&self, request: &ActionRequest) -> ActionResponse;
}

/// Owns one handler per [`ActionKind`], all bound to a single working directory.
///
/// Immutable after construction; share it behind an `Arc`. Requests are not
/// serialized against each other, so concurrent git actions may race.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    project_path: PathBuf,
    create_branch: CreateBranch,
    run_tests: RunTests,
}

impl Dispatcher {
    pub fn new(project_path: impl Into<PathBuf>, config: &ExecutorConfig) -> Self {
        let project_path = project_path.into();
        let timeout = config.command_timeout();
        let git = Git::new(
            config.git_program.clone(),
            project_path.clone(),
            timeout,
            config.output_limit_bytes,
        );
        Self {
            create_branch: CreateBranch::new(git, config.remote.clone()),
            run_tests: RunTests::new(
                config.test_command.clone(),
                project_path.clone(),
                timeout,
                config.output_limit_bytes,
            ),
            project_path,
        }
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub fn handler(&self, kind: ActionKind) -> &dyn ActionHandler {
        match kind {
            ActionKind::CreateBranch => &self.create_branch,
            ActionKind::RunTests => &self.run_tests,
        }
    }

    /// Resolve the action and run it. Unknown actions produce an error
    /// response rather than an `Err`.
    #[instrument(skip_all, fields(action = %request.action))]
    pub fn execute(&self, request: &ActionRequest) -> ActionResponse {
        let kind = match request.action.parse::<ActionKind>() {
            Ok(kind) => kind,
            Err(err) => {
                warn!("unknown action requested");
                return ActionResponse::unknown_action(&err);
            }
        };

        info!("dispatching action");
        let response = self.handler(kind).handle(&request.payload);
        info!(success = response.is_success(), "action finished");
        response
    }
}

impl ActionDispatch for Dispatcher {
    fn project_path(&self) -> &Path {
        Dispatcher::project_path(self)
    }

    fn execute(&self, request: &ActionRequest) -> ActionResponse {
        Dispatcher::execute(self, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Payload, ResponseStatus};

    fn request(action: &str) -> ActionRequest {
        ActionRequest {
            action: action.to_string(),
            payload: Payload::new(),
        }
    }

    #[test]
    fn every_kind_has_a_matching_handler() {
        let dispatcher = Dispatcher::new("/tmp", &ExecutorConfig::default());
        for kind in ActionKind::ALL {
            assert_eq!(dispatcher.handler(kind).kind(), kind);
        }
    }

    #[test]
    fn unknown_action_lists_available_actions() {
        let dispatcher = Dispatcher::new("/tmp", &ExecutorConfig::default());
        let resp = dispatcher.execute(&request("bogus"));
        assert_eq!(resp.status, ResponseStatus::Error);
        assert_eq!(resp.action, None);
        assert_eq!(resp.message.as_deref(), Some("action 'bogus' not recognized"));
        assert_eq!(
            resp.available_actions,
            Some(vec!["create_branch".to_string(), "run_tests".to_string()])
        );
    }

    #[test]
    fn routes_to_create_branch_handler() {
        let dispatcher = Dispatcher::new("/tmp", &ExecutorConfig::default());
        let resp = dispatcher.execute(&request("create_branch"));
        assert_eq!(resp.action, Some(ActionKind::CreateBranch));
        assert_eq!(resp.message.as_deref(), Some("branch name is required"));
    }
}
