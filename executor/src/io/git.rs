//! Git adapter for the branch action.
//!
//! Every call is captured as a [`CommandResult`]; a non-zero git exit is data
//! for the caller, not an error. Only a failure to run git at all is an `Err`.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::core::types::CommandResult;
use crate::io::process::{command_line, run_command};

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    program: String,
    workdir: PathBuf,
    timeout: Option<Duration>,
    output_limit_bytes: usize,
}

impl Git {
    pub fn new(
        program: impl Into<String>,
        workdir: impl Into<PathBuf>,
        timeout: Option<Duration>,
        output_limit_bytes: usize,
    ) -> Self {
        Self {
            program: program.into(),
            workdir: workdir.into(),
            timeout,
            output_limit_bytes,
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Create and checkout a new branch at current HEAD.
    #[instrument(skip_all, fields(branch))]
    pub fn checkout_new_branch(&self, branch: &str) -> Result<CommandResult> {
        debug!(branch, "creating and checking out new branch");
        self.run(&["checkout", "-b", branch])
    }

    /// Push a branch and record the remote as its upstream.
    #[instrument(skip_all, fields(remote, branch))]
    pub fn push_with_upstream(&self, remote: &str, branch: &str) -> Result<CommandResult> {
        debug!(remote, branch, "pushing branch with upstream");
        self.run(&["push", "-u", remote, branch])
    }

    fn run(&self, args: &[&str]) -> Result<CommandResult> {
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(self.program.as_str());
        argv.extend_from_slice(args);
        let line = command_line(&argv);

        let mut cmd = Command::new(&self.program);
        cmd.args(args).current_dir(&self.workdir);
        let output = run_command(cmd, self.timeout, self.output_limit_bytes)
            .with_context(|| format!("run {line}"))?;
        let result = output.into_result(line);
        debug!(exit_code = result.exit_code, "git finished");
        Ok(result)
    }
}
