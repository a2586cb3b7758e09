//! Test-only fixtures: throwaway git repositories and stub test runners.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;

use crate::io::config::ExecutorConfig;

/// A temporary git repository with one empty commit, optionally wired to a
/// bare `origin` remote that lives in its own temp directory.
pub struct TestRepo {
    dir: TempDir,
    remote: Option<TempDir>,
}

impl TestRepo {
    /// Repository without any remote; pushes will fail.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create repo tempdir")?;
        git(dir.path(), &["init", "--quiet"])?;
        git(
            dir.path(),
            &["commit", "--quiet", "--allow-empty", "-m", "initial commit"],
        )?;
        Ok(Self { dir, remote: None })
    }

    /// Repository whose `origin` is a local bare repository.
    pub fn with_origin() -> Result<Self> {
        let mut repo = Self::new()?;
        let remote = tempfile::tempdir().context("create remote tempdir")?;
        git(remote.path(), &["init", "--quiet", "--bare"])?;
        let url = remote.path().display().to_string();
        git(repo.path(), &["remote", "add", "origin", &url])?;
        repo.remote = Some(remote);
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn current_branch(&self) -> Result<String> {
        let out = git(self.path(), &["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok(out.trim().to_string())
    }

    /// Upstream configured for a local branch, e.g. `origin/feature/x`.
    pub fn upstream_of(&self, branch: &str) -> Result<String> {
        let rev = format!("{branch}@{{upstream}}");
        let out = git(self.path(), &["rev-parse", "--abbrev-ref", &rev])?;
        Ok(out.trim().to_string())
    }

    /// True if the bare remote has a head named `branch`.
    pub fn remote_has_branch(&self, branch: &str) -> Result<bool> {
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| anyhow!("repo has no origin"))?;
        let refname = format!("refs/heads/{branch}");
        let out = git(remote.path(), &["for-each-ref", &refname])?;
        Ok(!out.trim().is_empty())
    }
}

/// Config whose test runner is `sh -c <script>`.
pub fn stub_runner_config(script: &str) -> ExecutorConfig {
    ExecutorConfig {
        test_command: vec!["sh".to_string(), "-c".to_string(), script.to_string()],
        ..ExecutorConfig::default()
    }
}

fn git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=Executor Tests",
            "-c",
            "user.email=executor-tests@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .with_context(|| format!("spawn git {}", args.join(" ")))?;
    if !output.status.success() {
        return Err(anyhow!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
