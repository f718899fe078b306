//! Helpers for running child processes with timeouts and bounded output.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

/// Result of a bounded child process invocation.
#[derive(Debug)]
pub struct ExecOutcome {
    pub status: ExitStatus,
    pub stderr: Vec<u8>,
    pub stderr_truncated: usize,
    pub timed_out: bool,
}

impl ExecOutcome {
    /// True when the child ran to completion and exited zero.
    pub fn success(&self) -> bool {
        !self.timed_out && self.status.success()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }
}

/// Run a command with a timeout, discarding stdout.
///
/// stderr is drained concurrently while the child runs; `output_limit_bytes`
/// bounds the amount kept in memory (bytes beyond the limit are discarded
/// while still draining the pipe). A spawn failure propagates as an error;
/// a timeout kills the child and is reported via [`ExecOutcome::timed_out`].
#[instrument(skip_all, fields(timeout_secs = timeout.as_secs()))]
pub fn run_command(cmd: Command, timeout: Duration, output_limit_bytes: usize) -> Result<ExecOutcome> {
    run_inner(cmd, Stdio::null(), timeout, output_limit_bytes)
}

/// Run a command with a timeout, redirecting stdout to `stdout_path`.
///
/// The file is created (truncated) before the child spawns, so the child
/// writes its stdout directly to disk without any intermediate buffering in
/// this process.
#[instrument(skip_all, fields(timeout_secs = timeout.as_secs(), stdout_path = %stdout_path.display()))]
pub fn run_command_to_file(
    cmd: Command,
    stdout_path: &Path,
    timeout: Duration,
    output_limit_bytes: usize,
) -> Result<ExecOutcome> {
    let file = File::create(stdout_path)
        .with_context(|| format!("create stdout file {}", stdout_path.display()))?;
    run_inner(cmd, Stdio::from(file), timeout, output_limit_bytes)
}

fn run_inner(
    mut cmd: Command,
    stdout: Stdio,
    timeout: Duration,
    output_limit_bytes: usize,
) -> Result<ExecOutcome> {
    cmd.stdin(Stdio::null()).stdout(stdout).stderr(Stdio::piped());

    debug!("spawning child process");
    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            error!(err = %err, "failed to spawn command");
            return Err(err).with_context(|| format!("spawn {:?}", cmd.get_program()));
        }
    };

    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;
    let stderr_handle = thread::spawn(move || read_stream_limited(stderr, output_limit_bytes));

    let mut timed_out = false;
    let status = match child.wait_timeout(timeout).context("wait for command")? {
        Some(status) => status,
        None => {
            warn!(timeout_secs = timeout.as_secs(), "command timed out, killing");
            timed_out = true;
            child.kill().context("kill command")?;
            child.wait().context("wait command after kill")?
        }
    };

    let (stderr, stderr_truncated) = match stderr_handle.join() {
        Ok(result) => result.context("read stderr")?,
        Err(_) => return Err(anyhow!("stderr reader thread panicked")),
    };
    if stderr_truncated > 0 {
        warn!(stderr_truncated, "stderr truncated");
    }

    debug!(exit_code = ?status.code(), timed_out, "command finished");
    Ok(ExecOutcome {
        status,
        stderr,
        stderr_truncated,
        timed_out,
    })
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
