//! Job scheduler and admission control.
//!
//! Single owner of the FIFO queue and the running set. Everything the
//! outside world does to jobs (submit, cancel, delete, inspect) goes
//! through this facade; the scheduling loop dequeues strictly in FIFO
//! order whenever a global concurrency slot is free.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use vox_protocol::{JobConfig, JobRecord, JobStatus};

use crate::config::OrchestratorConfig;
use crate::executor::JobExecutor;
use crate::stager;
use crate::stages::StageRegistry;
use crate::store::{DeleteError, JobStore};
use crate::supervisor::ProcessSupervisor;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AdmissionError {
    /// The user already has a Queued or Running job.
    #[error("user already has an active job")]
    UserAlreadyActive,

    /// The queue has reached its configured capacity.
    #[error("job queue is full")]
    QueueFull,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CancelError {
    #[error("job not found")]
    NotFound,

    #[error("job belongs to another user")]
    Unauthorized,
}

/// Queue and running set. Only ever touched under the scheduler mutex.
#[derive(Default)]
struct SchedulerState {
    queue: VecDeque<Uuid>,
    running: HashMap<Uuid, CancellationToken>,
}

pub struct JobScheduler {
    state: Mutex<SchedulerState>,
    store: Arc<JobStore>,
    registry: Arc<StageRegistry>,
    executor: Arc<JobExecutor>,
    config: OrchestratorConfig,
    shutdown: CancellationToken,
}

impl JobScheduler {
    pub fn new(
        config: OrchestratorConfig,
        store: Arc<JobStore>,
        supervisor: Arc<ProcessSupervisor>,
        registry: Arc<StageRegistry>,
    ) -> Self {
        let executor = Arc::new(JobExecutor::new(
            store.clone(),
            supervisor,
            registry.clone(),
            &config,
        ));
        Self {
            state: Mutex::new(SchedulerState::default()),
            store,
            registry,
            executor,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Admits a new job for `user_id`.
    ///
    /// The job is created Queued and picked up by the scheduling loop; this
    /// returns as soon as the record exists.
    ///
    /// # Errors
    ///
    /// [`AdmissionError::UserAlreadyActive`] when the user has a live job,
    /// [`AdmissionError::QueueFull`] when the configured queue cap is
    /// reached. Neither creates a record.
    pub async fn submit(
        &self,
        user_id: &str,
        config: JobConfig,
    ) -> Result<Uuid, AdmissionError> {
        let mut state = self.state.lock().await;
        if self.store.user_active(user_id) {
            return Err(AdmissionError::UserAlreadyActive);
        }
        if let Some(cap) = self.config.max_queue_len {
            if state.queue.len() >= cap {
                return Err(AdmissionError::QueueFull);
            }
        }

        let record = JobRecord::new(user_id, self.registry.stage_names(), config);
        let job_id = record.job_id;
        self.store.insert(record);
        state.queue.push_back(job_id);
        tracing::info!(%job_id, user_id, queued = state.queue.len(), "job admitted");
        Ok(job_id)
    }

    /// Snapshot of one job's record.
    pub fn status(&self, job_id: Uuid) -> Option<JobRecord> {
        self.store.get(job_id)
    }

    /// The user's finished jobs, newest first.
    pub fn history(&self, user_id: &str) -> Vec<JobRecord> {
        self.store.history(user_id)
    }

    /// Cancels a job on behalf of its owner.
    ///
    /// Queued jobs are pulled out of the queue and marked Cancelled without
    /// ever running. Running jobs get their token cancelled, which tears
    /// down the current stage's process tree; the record is marked
    /// Cancelled here rather than waiting for the executor to unwind.
    /// Cancelling an already-finished job is an Ok no-op.
    ///
    /// # Errors
    ///
    /// [`CancelError::NotFound`] for unknown ids,
    /// [`CancelError::Unauthorized`] when `user_id` does not own the job.
    pub async fn cancel(&self, job_id: Uuid, user_id: &str) -> Result<(), CancelError> {
        let mut state = self.state.lock().await;
        let record = self.store.get(job_id).ok_or(CancelError::NotFound)?;
        if record.user_id != user_id {
            return Err(CancelError::Unauthorized);
        }

        match record.status {
            JobStatus::Queued => {
                state.queue.retain(|queued| *queued != job_id);
                self.store.mark_cancelled(job_id);
                tracing::info!(%job_id, "cancelled queued job");
            }
            JobStatus::Running => {
                if let Some(token) = state.running.get(&job_id) {
                    token.cancel();
                }
                self.store.mark_cancelled(job_id);
                tracing::info!(%job_id, "cancelled running job");
            }
            _ => {
                tracing::debug!(%job_id, status = ?record.status, "cancel of finished job ignored");
            }
        }
        Ok(())
    }

    /// Removes a finished job from the store, optionally purging its
    /// workspace directory from disk.
    ///
    /// # Errors
    ///
    /// See [`DeleteError`]; active jobs must be cancelled first.
    pub async fn delete(
        &self,
        job_id: Uuid,
        user_id: &str,
        purge: bool,
    ) -> Result<(), DeleteError> {
        let record = self.store.delete(job_id, user_id)?;
        if purge {
            let dir = stager::job_dir(&self.config.workspace_root, &record.user_id, job_id);
            match tokio::fs::remove_dir_all(&dir).await {
                Ok(()) => tracing::info!(%job_id, dir = %dir.display(), "purged workspace"),
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
                Err(error) => {
                    tracing::warn!(%job_id, dir = %dir.display(), %error, "workspace purge failed");
                }
            }
        }
        Ok(())
    }

    /// Starts the scheduling loop. Returns its task handle.
    pub fn spawn_loop(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.config.poll_interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        tracing::info!("scheduling loop stopped");
                        break;
                    }
                    _ = interval.tick() => Self::tick(&self).await,
                }
            }
        })
    }

    /// One scheduling pass: fill free slots from the queue head.
    async fn tick(scheduler: &Arc<Self>) {
        let mut state = scheduler.state.lock().await;
        while state.running.len() < scheduler.config.max_global_concurrency {
            let Some(job_id) = state.queue.pop_front() else {
                break;
            };
            // records can disappear or finish between passes only through
            // cancel/delete, which also dequeue; this is belt and braces
            match scheduler.store.get(job_id) {
                Some(record) if record.status == JobStatus::Queued => {}
                _ => continue,
            }

            scheduler.store.mark_running(job_id);
            let token = scheduler.shutdown.child_token();
            state.running.insert(job_id, token.clone());

            let scheduler = scheduler.clone();
            tokio::spawn(async move {
                scheduler.executor.execute(job_id, token).await;
                scheduler.on_finished(job_id).await;
            });
            tracing::info!(%job_id, "job dispatched");
        }
    }

    async fn on_finished(&self, job_id: Uuid) {
        self.state.lock().await.running.remove(&job_id);
    }

    /// Stops the scheduling loop and cancels every running job's token,
    /// which tears down any live stage process trees.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Number of jobs currently waiting in the queue.
    pub async fn queue_len(&self) -> usize {
        self.state.lock().await.queue.len()
    }
}
