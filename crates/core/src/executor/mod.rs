//! Pipeline executor.
//!
//! Drives one job through its stages in order. The executor owns every
//! status transition out of Running: it marks the job Completed, Failed,
//! or Cancelled on the store and never leaves a dequeued job live.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use vox_protocol::JobStatus;

use crate::config::OrchestratorConfig;
use crate::stager::JobWorkspace;
use crate::stages::{StageContext, StageRegistry, StageRunner};
use crate::store::JobStore;
use crate::supervisor::{ProcessSupervisor, StageOutput, SupervisorError};

/// Longest failure diagnostic surfaced to clients, in characters.
const MAX_DIAGNOSTIC_CHARS: usize = 200;

enum StageVerdict {
    Cancelled,
    TimedOut,
    Finished(Result<StageOutput, SupervisorError>),
}

pub struct JobExecutor {
    store: Arc<JobStore>,
    supervisor: Arc<ProcessSupervisor>,
    registry: Arc<StageRegistry>,
    workspace_root: PathBuf,
    stage_timeout: Option<Duration>,
}

impl JobExecutor {
    pub fn new(
        store: Arc<JobStore>,
        supervisor: Arc<ProcessSupervisor>,
        registry: Arc<StageRegistry>,
        config: &OrchestratorConfig,
    ) -> Self {
        Self {
            store,
            supervisor,
            registry,
            workspace_root: config.workspace_root.clone(),
            stage_timeout: config.stage_timeout(),
        }
    }

    /// Runs the job to a terminal status.
    ///
    /// `cancel` is the job's cancellation token; once it fires, the current
    /// stage's process tree is torn down and the job is marked Cancelled.
    pub async fn execute(&self, job_id: Uuid, cancel: CancellationToken) {
        let Some(record) = self.store.get(job_id) else {
            tracing::warn!(%job_id, "dequeued job has no record");
            return;
        };
        if record.status != JobStatus::Running {
            // cancelled between dequeue and pickup
            return;
        }

        let workspace = JobWorkspace::new(
            &self.workspace_root,
            &record.user_id,
            job_id,
            &record.config.video_path,
        );
        let ctx = StageContext {
            job_id,
            config: record.config.clone(),
            workspace,
        };
        let total = self.registry.len();

        for (index, runner) in self.registry.runners().iter().enumerate() {
            if cancel.is_cancelled() {
                self.store.mark_cancelled(job_id);
                return;
            }

            let stage = runner.name();
            tracing::info!(%job_id, stage, "starting stage");
            self.store
                .set_stage_progress(job_id, index, stage, overall_progress(index, total, 0));

            let invocation = match runner.build_invocation(&ctx) {
                Ok(invocation) => invocation,
                Err(error) => {
                    // full paths go to the log; the record gets the
                    // sanitized rendering
                    tracing::warn!(%job_id, stage, ?error, "failed to build stage invocation");
                    self.store.mark_failed(job_id, error.to_string());
                    return;
                }
            };

            let verdict = self
                .run_stage(job_id, runner.as_ref(), &invocation, index, total, &cancel)
                .await;
            match verdict {
                StageVerdict::Cancelled => {
                    self.store.mark_cancelled(job_id);
                    return;
                }
                StageVerdict::TimedOut => {
                    let secs = self.stage_timeout.map(|d| d.as_secs()).unwrap_or_default();
                    self.store.mark_failed(
                        job_id,
                        format!("{stage} stage timed out after {secs}s"),
                    );
                    return;
                }
                StageVerdict::Finished(Err(error)) => {
                    self.store
                        .mark_failed(job_id, format!("{stage} stage failed: {error}"));
                    return;
                }
                StageVerdict::Finished(Ok(output)) if !output.success() => {
                    if cancel.is_cancelled() {
                        // the non-zero exit is our own kill
                        self.store.mark_cancelled(job_id);
                    } else {
                        self.store
                            .mark_failed(job_id, failure_diagnostic(stage, &output));
                    }
                    return;
                }
                StageVerdict::Finished(Ok(_)) => {}
            }

            if let Err(error) = runner.validate_outputs(&ctx) {
                self.store.mark_failed(job_id, error.to_string());
                return;
            }
            self.store.set_stage_progress(
                job_id,
                index,
                stage,
                overall_progress(index + 1, total, 0),
            );
            tracing::info!(%job_id, stage, "stage completed");
        }

        self.store.mark_completed(job_id, final_artifacts(&self.registry, &ctx));
        tracing::info!(%job_id, "job completed");
    }

    async fn run_stage(
        &self,
        job_id: Uuid,
        runner: &dyn StageRunner,
        invocation: &crate::stages::Invocation,
        index: usize,
        total: usize,
        cancel: &CancellationToken,
    ) -> StageVerdict {
        let store = &self.store;
        let stage = runner.name();
        let on_line = |line: &str| {
            if let Some(intra) = runner.parse_progress(line) {
                store.set_stage_progress(
                    job_id,
                    index,
                    stage,
                    overall_progress(index, total, intra),
                );
            }
        };

        let run = self.supervisor.run(job_id, invocation, on_line);
        tokio::pin!(run);
        let deadline = async {
            match self.stage_timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(deadline);

        // Biased so the run future is polled first: the subprocess must be
        // spawned and registered before terminate() can reach it.
        tokio::select! {
            biased;
            result = &mut run => StageVerdict::Finished(result),
            _ = cancel.cancelled() => {
                self.supervisor.terminate(job_id).await;
                let _ = run.await;
                StageVerdict::Cancelled
            }
            _ = &mut deadline => {
                tracing::warn!(%job_id, stage, "stage deadline exceeded");
                self.supervisor.terminate(job_id).await;
                let _ = run.await;
                StageVerdict::TimedOut
            }
        }
    }
}

/// Overall job progress, weighting every stage equally.
fn overall_progress(completed_stages: usize, total_stages: usize, intra: u8) -> u8 {
    if total_stages == 0 {
        return 100;
    }
    let fraction =
        (completed_stages as f64 + f64::from(intra.min(100)) / 100.0) / total_stages as f64;
    (fraction * 100.0).min(100.0) as u8
}

/// Artifact paths reported on completion: the final stage's outputs.
fn final_artifacts(registry: &StageRegistry, ctx: &StageContext) -> HashMap<String, PathBuf> {
    registry
        .runners()
        .last()
        .map(|runner| {
            runner
                .expected_outputs(ctx)
                .into_iter()
                .map(|artifact| (artifact.name.to_string(), artifact.path))
                .collect()
        })
        .unwrap_or_default()
}

/// Condenses a failed stage's output into a short client-safe message.
///
/// Uses the last non-empty stderr line, truncated; falls back to the exit
/// status when the tool wrote nothing useful.
fn failure_diagnostic(stage: &str, output: &StageOutput) -> String {
    let detail = output
        .stderr_tail
        .iter()
        .rev()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .map(|line| truncate_chars(line, MAX_DIAGNOSTIC_CHARS))
        .unwrap_or_else(|| match output.code {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        });
    format!("{stage} stage failed: {detail}")
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut truncated: String = text.chars().take(max).collect();
        truncated.push_str("...");
        truncated
    }
}
