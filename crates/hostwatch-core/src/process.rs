//! Run an external command under a wall-clock budget.
//!
//! The command leads its own process group. Both output pipes are drained
//! concurrently while it runs, so a chatty process never blocks on a full
//! pipe. The captured bytes are only handed back once the child has been
//! observed to exit. When the budget elapses first, every process in the group
//! is killed and the child is reaped before the call returns.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::Instant;

#[derive(Debug)]
pub struct BoundedOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub elapsed: Duration,
}

impl BoundedOutput {
    /// Exit code, or the negated signal number when the process was killed by a signal.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        exit_code(self.status)
    }
}

#[derive(Debug, Error)]
pub enum BoundedRunError {
    #[error("failed to spawn process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to wait for process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("process exceeded its {budget:?} budget and was killed")]
    TimedOut { budget: Duration, pid: Option<u32> },
}

/// Spawn `command` and wait at most `budget` for it to finish.
///
/// Dropping the returned future before it resolves kills the process group too.
pub async fn run_bounded(
    mut command: Command,
    budget: Duration,
) -> Result<BoundedOutput, BoundedRunError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    command.process_group(0);

    let started = Instant::now();
    let mut child = command.spawn().map_err(BoundedRunError::Spawn)?;
    let pid = child.id();
    let mut group = ProcessGroup { leader: pid };

    let stdout_task = tokio::spawn(drain(child.stdout.take()));
    let stderr_task = tokio::spawn(drain(child.stderr.take()));
    let drains = [stdout_task.abort_handle(), stderr_task.abort_handle()];

    let status = match tokio::time::timeout(budget, child.wait()).await {
        Ok(status) => status.map_err(BoundedRunError::Wait)?,
        Err(_) => {
            group.kill();
            // Child::kill sends SIGKILL and then waits, so the pid is reaped here.
            if let Err(err) = child.kill().await {
                tracing::warn!(?pid, error = %err, "failed to kill timed out process");
            }
            drains.iter().for_each(AbortHandle::abort);
            return Err(BoundedRunError::TimedOut { budget, pid });
        }
    };

    // A background process can keep the pipes open after the direct child
    // exits; the drains share what is left of the budget.
    let remaining = budget.saturating_sub(started.elapsed());
    let drained = tokio::time::timeout(remaining, async {
        (join_drain(stdout_task).await, join_drain(stderr_task).await)
    })
    .await;

    match drained {
        Ok((stdout, stderr)) => {
            group.release();
            Ok(BoundedOutput {
                status,
                stdout,
                stderr,
                elapsed: started.elapsed(),
            })
        }
        Err(_) => {
            group.kill();
            drains.iter().for_each(AbortHandle::abort);
            Err(BoundedRunError::TimedOut { budget, pid })
        }
    }
}

/// Process group led by a spawned child. Every member is killed on drop unless released.
struct ProcessGroup {
    leader: Option<u32>,
}

impl ProcessGroup {
    fn kill(&mut self) {
        if let Some(leader) = self.leader.take() {
            kill_group(leader);
        }
    }

    fn release(&mut self) {
        self.leader = None;
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(unix)]
fn kill_group(leader: u32) {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(leader) else {
        return;
    };
    match killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(err) => tracing::warn!(pgid = leader, error = %err, "failed to kill process group"),
    }
}

#[cfg(not(unix))]
fn kill_group(_leader: u32) {}

async fn drain<R>(reader: Option<R>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut reader) = reader {
        reader.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

async fn join_drain(task: JoinHandle<std::io::Result<Vec<u8>>>) -> Vec<u8> {
    match task.await {
        Ok(Ok(buf)) => buf,
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "failed to read process output");
            Vec::new()
        }
        Err(err) => {
            tracing::warn!(error = %err, "process output reader did not complete");
            Vec::new()
        }
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| -signal))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
