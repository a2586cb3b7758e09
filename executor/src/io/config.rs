//! Executor configuration loaded from an optional TOML file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default file name looked up inside the project directory.
pub const CONFIG_FILE_NAME: &str = ".executor.toml";

/// External tool settings (TOML).
///
/// Missing fields default to the stock git + Playwright setup, so an absent
/// file is equivalent to an empty one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Program used for version-control commands.
    pub git_program: String,

    /// Remote that new branches are pushed to.
    pub remote: String,

    /// Test-runner argv (e.g. `["npx","playwright","test"]`).
    pub test_command: Vec<String>,

    /// Kill subprocesses after this many seconds. Unset means wait forever.
    pub command_timeout_secs: Option<u64>,

    /// Keep at most this many bytes of stdout and of stderr per command.
    pub output_limit_bytes: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            git_program: "git".to_string(),
            remote: "origin".to_string(),
            test_command: vec![
                "npx".to_string(),
                "playwright".to_string(),
                "test".to_string(),
            ],
            command_timeout_secs: None,
            output_limit_bytes: 10_000_000,
        }
    }
}

impl ExecutorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.git_program.trim().is_empty() {
            return Err(anyhow!("git_program must be non-empty"));
        }
        if self.remote.trim().is_empty() {
            return Err(anyhow!("remote must be non-empty"));
        }
        if self.test_command.is_empty() || self.test_command[0].trim().is_empty() {
            return Err(anyhow!("test_command must be a non-empty array"));
        }
        if self.command_timeout_secs == Some(0) {
            return Err(anyhow!("command_timeout_secs must be > 0 when set"));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output_limit_bytes must be > 0"));
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ExecutorConfig::default()`.
pub fn load_config(path: &Path) -> Result<ExecutorConfig> {
    if !path.exists() {
        let cfg = ExecutorConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ExecutorConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, ExecutorConfig::default());
        assert_eq!(cfg.command_timeout(), None);
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "test_command = [\"sh\", \"-c\", \"exit 0\"]\ncommand_timeout_secs = 30\n",
        )
        .expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.test_command, vec!["sh", "-c", "exit 0"]);
        assert_eq!(cfg.command_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.remote, "origin");
        assert_eq!(cfg.git_program, "git");
    }

    #[test]
    fn rejects_empty_test_command() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "test_command = []\n").expect("write");
        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("test_command"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let cfg = ExecutorConfig {
            command_timeout_secs: Some(0),
            ..ExecutorConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_malformed_toml() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "remote = [").expect("write");
        assert!(load_config(&path).is_err());
    }
}
