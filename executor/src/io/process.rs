//! Helpers for running child processes and capturing bounded output.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

use crate::core::types::CommandResult;

/// Exit code reported when the OS gives neither a code nor a signal.
const UNKNOWN_EXIT_CODE: i32 = -1;

/// Captured child process output.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_truncated: usize,
    pub stderr_truncated: usize,
    pub timed_out: bool,
}

impl CommandOutput {
    /// Numeric exit status. A signal-terminated process reports the negated
    /// signal number.
    pub fn exit_code(&self) -> i32 {
        if let Some(code) = self.status.code() {
            return code;
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = self.status.signal() {
                return -signal;
            }
        }
        UNKNOWN_EXIT_CODE
    }

    /// Convert into the wire-level result, decoding output lossily and
    /// appending a notice for any discarded bytes.
    pub fn into_result(self, command: impl Into<String>) -> CommandResult {
        let exit_code = self.exit_code();
        let mut stdout = String::from_utf8_lossy(&self.stdout).into_owned();
        stdout.push_str(&truncated_notice("stdout", self.stdout_truncated));
        let mut stderr = String::from_utf8_lossy(&self.stderr).into_owned();
        stderr.push_str(&truncated_notice("stderr", self.stderr_truncated));
        CommandResult {
            command: command.into(),
            exit_code,
            stdout,
            stderr,
            timed_out: self.timed_out,
        }
    }
}

fn truncated_notice(stream: &str, bytes: usize) -> String {
    if bytes > 0 {
        format!("\n[{stream} truncated {bytes} bytes]\n")
    } else {
        String::new()
    }
}

/// Render argv the way a user would type it.
pub fn command_line<S: AsRef<str>>(argv: &[S]) -> String {
    argv.iter()
        .map(|arg| arg.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a command to completion and capture stdout/stderr without risking pipe deadlocks.
///
/// With `timeout: None` this blocks until the child exits, however long that
/// takes. With a timeout, the child leads its own process group and the whole
/// group is killed when the limit is hit, so grandchildren holding the output
/// pipes cannot keep the call alive. Output is read concurrently while the
/// child runs; `output_limit_bytes` bounds what is kept per stream (the rest is
/// drained and discarded).
#[instrument(skip_all, fields(timeout_secs = timeout.map(|t| t.as_secs()), output_limit_bytes))]
pub fn run_command(
    mut cmd: Command,
    timeout: Option<Duration>,
    output_limit_bytes: usize,
) -> Result<CommandOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(unix)]
    if timeout.is_some() {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    debug!("spawning child process");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(e).context("spawn command");
        }
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let stdout_handle = thread::spawn(move || read_stream_limited(stdout, output_limit_bytes));
    let stderr_handle = thread::spawn(move || read_stream_limited(stderr, output_limit_bytes));

    let mut timed_out = false;
    let status = match timeout {
        None => child.wait().context("wait for command")?,
        Some(limit) => match child.wait_timeout(limit).context("wait for command")? {
            Some(status) => status,
            None => {
                warn!(timeout_secs = limit.as_secs(), "command timed out, killing");
                timed_out = true;
                kill_process_group(&mut child).context("kill command")?;
                child.wait().context("wait command after kill")?
            }
        },
    };

    let (stdout, stdout_truncated) = join_output(stdout_handle).context("join stdout")?;
    let (stderr, stderr_truncated) = join_output(stderr_handle).context("join stderr")?;

    if stdout_truncated > 0 || stderr_truncated > 0 {
        warn!(stdout_truncated, stderr_truncated, "output truncated");
    }

    debug!(exit_code = ?status.code(), timed_out, "command finished");
    Ok(CommandOutput {
        status,
        stdout,
        stderr,
        stdout_truncated,
        stderr_truncated,
        timed_out,
    })
}

/// Kill the child and everything in its process group.
#[cfg(unix)]
fn kill_process_group(child: &mut Child) -> Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let pgid = i32::try_from(child.id()).context("child pid out of range")?;
    match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(e).context("signal process group"),
    }
}

#[cfg(not(unix))]
fn kill_process_group(child: &mut Child) -> Result<()> {
    child.kill().context("kill child")
}

fn join_output(handle: thread::JoinHandle<Result<(Vec<u8>, usize)>>) -> Result<(Vec<u8>, usize)> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

fn read_stream_limited<R: Read>(mut reader: R, limit: usize) -> Result<(Vec<u8>, usize)> {
    let mut buf = Vec::new();
    let mut truncated = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk).context("read output")?;
        if n == 0 {
            break;
        }
        let remaining = limit.saturating_sub(buf.len());
        if remaining > 0 {
            let keep = n.min(remaining);
            buf.extend_from_slice(&chunk[..keep]);
            truncated += n.saturating_sub(keep);
        } else {
            truncated += n;
        }
    }

    Ok((buf, truncated))
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Instant;

    use super::*;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[test]
    fn captures_exit_code_and_streams() {
        let out = run_command(sh("echo out; echo err >&2; exit 3"), None, 1024).expect("run");
        assert_eq!(out.exit_code(), 3);
        assert_eq!(out.stdout, b"out\n");
        assert_eq!(out.stderr, b"err\n");
        assert!(!out.timed_out);
    }

    #[test]
    fn truncates_beyond_limit_and_reports_notice() {
        let out = run_command(sh("printf 'abcdefghij'"), None, 4).expect("run");
        assert_eq!(out.stdout, b"abcd");
        assert_eq!(out.stdout_truncated, 6);
        let result = out.into_result("printf");
        assert_eq!(result.stdout, "abcd\n[stdout truncated 6 bytes]\n");
        assert_eq!(result.stderr, "");
    }

    #[test]
    fn kills_on_timeout() {
        let out = run_command(sh("exec sleep 5"), Some(Duration::from_millis(100)), 1024)
            .expect("run");
        assert!(out.timed_out);
        assert_ne!(out.exit_code(), 0);
    }

    #[test]
    fn timeout_also_kills_grandchildren() {
        let started = Instant::now();
        let out = run_command(
            sh("sleep 4; echo done"),
            Some(Duration::from_millis(200)),
            1024,
        )
        .expect("run");
        let elapsed = started.elapsed();
        assert!(out.timed_out);
        assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
        assert!(!String::from_utf8_lossy(&out.stdout).contains("done"));
    }

    #[test]
    fn missing_program_is_an_error() {
        let err = run_command(Command::new("definitely-not-a-real-binary-xyz"), None, 1024)
            .unwrap_err();
        assert!(format!("{err:#}").contains("spawn command"));
    }

    #[test]
    fn command_line_joins_with_spaces() {
        assert_eq!(
            command_line(&["npx", "playwright", "test"]),
            "npx playwright test"
        );
    }
}
