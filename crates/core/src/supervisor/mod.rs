//! Subprocess supervision.
//!
//! The supervisor owns every live stage subprocess: it spawns them in
//! their own process group, streams their stdout line by line to the
//! caller, keeps a bounded stderr tail for diagnostics, and can tear
//! down a job's whole process tree on cancellation.

mod tree;

use std::collections::{HashMap, VecDeque};
use std::process::Stdio;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use uuid::Uuid;

use crate::stages::Invocation;

/// Number of trailing stderr lines retained per stage run.
const STDERR_TAIL_LINES: usize = 50;

#[derive(Error, Debug)]
pub enum SupervisorError {
    /// The stage program could not be started.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// Reading the subprocess's output or waiting on it failed.
    #[error("subprocess i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a finished stage subprocess left behind.
#[derive(Debug)]
pub struct StageOutput {
    /// Exit code, or `None` when the process was killed by a signal.
    pub code: Option<i32>,

    /// The last lines the subprocess wrote to stderr.
    pub stderr_tail: Vec<String>,
}

impl StageOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Tracks live stage subprocesses by owning job.
///
/// At most one subprocess is registered per job at a time; stages of a
/// job run strictly in sequence.
#[derive(Default)]
pub struct ProcessSupervisor {
    live: Mutex<HashMap<Uuid, u32>>,
}

impl ProcessSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one stage invocation to completion.
    ///
    /// Each line of the subprocess's stdout is passed to `on_line` as it
    /// arrives. The process is registered under `job_id` for the duration
    /// of the run so [`terminate`](Self::terminate) can reach it.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::Spawn`] when the program cannot be
    /// started. A non-zero exit is not an error here; the caller inspects
    /// the returned [`StageOutput`].
    pub async fn run(
        &self,
        job_id: Uuid,
        invocation: &Invocation,
        on_line: impl FnMut(&str),
    ) -> Result<StageOutput, SupervisorError> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &invocation.cwd {
            command.current_dir(cwd);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Own process group, so cancellation can signal the stage and
            // any helpers it forks in one killpg.
            command.as_std_mut().process_group(0);
        }

        let mut child = command.spawn().map_err(|source| SupervisorError::Spawn {
            program: invocation.program.display().to_string(),
            source,
        })?;

        if let Some(pid) = child.id() {
            self.live.lock().insert(job_id, pid);
        }

        let result = drive(&mut child, on_line).await;
        self.live.lock().remove(&job_id);
        result
    }

    /// Kills the process tree of the job's current stage, if one is live.
    ///
    /// Safe to call for jobs with no running subprocess; that is a no-op.
    /// Returns whether a process was found and signalled.
    pub async fn terminate(&self, job_id: Uuid) -> bool {
        let pid = { self.live.lock().get(&job_id).copied() };
        match pid {
            Some(pid) => {
                tracing::info!(%job_id, pid, "terminating stage process tree");
                tree::kill_tree(pid).await;
                true
            }
            None => false,
        }
    }

    /// Whether a subprocess is currently registered for the job.
    pub fn is_live(&self, job_id: Uuid) -> bool {
        self.live.lock().contains_key(&job_id)
    }
}

async fn drive(
    child: &mut tokio::process::Child,
    mut on_line: impl FnMut(&str),
) -> Result<StageOutput, SupervisorError> {
    // stdout/stderr were set to piped above, so take() cannot miss.
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let stderr_task = tokio::spawn(async move {
        let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
        if let Some(stderr) = stderr {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
        }
        tail.into_iter().collect::<Vec<_>>()
    });

    if let Some(stdout) = stdout {
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            on_line(&line);
        }
    }

    let status = child.wait().await?;
    let stderr_tail = stderr_task.await.unwrap_or_default();

    Ok(StageOutput {
        code: status.code(),
        stderr_tail,
    })
}
