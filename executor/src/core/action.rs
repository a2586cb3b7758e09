//! The closed set of actions the dispatcher knows how to run.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Supported action identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Create a local branch and push it upstream.
    CreateBranch,
    /// Run the end-to-end test suite.
    RunTests,
}

impl ActionKind {
    /// Every action, in the order advertised to clients.
    pub const ALL: [ActionKind; 2] = [ActionKind::CreateBranch, ActionKind::RunTests];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::CreateBranch => "create_branch",
            ActionKind::RunTests => "run_tests",
        }
    }

    /// Human-readable summary used by the info endpoint.
    pub fn description(self) -> &'static str {
        match self {
            ActionKind::CreateBranch => "Create a new git branch and push it to the remote",
            ActionKind::RunTests => "Run the end-to-end test suite",
        }
    }

    /// Payload field names mapped to their expected JSON type.
    pub fn payload_schema(self) -> &'static [(&'static str, &'static str)] {
        match self {
            ActionKind::CreateBranch => &[("branch_name", "string")],
            ActionKind::RunTests => &[],
        }
    }

    /// Wire names of all actions, for `available_actions` fields.
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|kind| kind.as_str().to_string()).collect()
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an action name matches no [`ActionKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("action '{0}' not recognized")]
pub struct UnknownAction(pub String);

impl FromStr for ActionKind {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}
