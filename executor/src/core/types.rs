//! Wire types for the action dispatch contract.
//!
//! These types define the JSON shapes exchanged with clients. They carry no
//! behavior beyond construction helpers, and serialize with a stable field
//! order so identical inputs produce byte-identical responses.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::action::{ActionKind, UnknownAction};

/// Handler-specific free-form input.
pub type Payload = Map<String, Value>;

/// A validated request: a recognized-or-not action name plus its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub action: String,
    pub payload: Payload,
}

/// Captured outcome of one external process invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    /// Space-joined argv, as the caller would type it.
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Present only when a configured timeout killed the process.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub timed_out: bool,
}

/// Top-level outcome marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// JSON body returned by the execute-action endpoint.
///
/// Only the fields relevant to a given outcome are populated; the rest are
/// omitted from the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<CommandResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timed_out: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_actions: Option<Vec<String>>,
}

impl ActionResponse {
    fn empty(status: ResponseStatus, action: Option<ActionKind>) -> Self {
        Self {
            status,
            action,
            message: None,
            branch_name: None,
            results: None,
            exit_code: None,
            stdout: None,
            stderr: None,
            timed_out: None,
            command: None,
            project_path: None,
            available_actions: None,
        }
    }

    /// Handler-level failure for a recognized action.
    pub fn action_error(action: ActionKind, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::empty(ResponseStatus::Error, Some(action))
        }
    }

    /// The requested action matched nothing; advertise what does exist.
    pub fn unknown_action(err: &UnknownAction) -> Self {
        Self {
            message: Some(err.to_string()),
            available_actions: Some(ActionKind::names()),
            ..Self::empty(ResponseStatus::Error, None)
        }
    }

    pub fn branch_created(branch_name: impl Into<String>, results: Vec<CommandResult>) -> Self {
        Self {
            branch_name: Some(branch_name.into()),
            results: Some(results),
            ..Self::empty(ResponseStatus::Success, Some(ActionKind::CreateBranch))
        }
    }

    /// The test runner ran to completion, whatever its exit code.
    pub fn tests_ran(result: CommandResult, project_path: impl Into<String>) -> Self {
        Self {
            exit_code: Some(result.exit_code),
            stdout: Some(result.stdout),
            stderr: Some(result.stderr),
            timed_out: result.timed_out.then_some(true),
            command: Some(result.command),
            project_path: Some(project_path.into()),
            ..Self::empty(ResponseStatus::Success, Some(ActionKind::RunTests))
        }
    }

    /// The test runner could not be launched.
    pub fn tests_failed(
        message: impl Into<String>,
        command: impl Into<String>,
        project_path: impl Into<String>,
    ) -> Self {
        Self {
            message: Some(message.into()),
            command: Some(command.into()),
            project_path: Some(project_path.into()),
            ..Self::empty(ResponseStatus::Error, Some(ActionKind::RunTests))
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}
