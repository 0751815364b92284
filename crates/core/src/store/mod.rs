//! In-memory job store.
//!
//! Single source of truth for job records. All status transitions go
//! through the store so its invariants hold everywhere:
//!
//! - a record in a terminal status is never mutated again
//! - `progress` never decreases while a job is live
//!
//! The store is synchronous; callers clone records out rather than
//! holding the lock across awaits.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::RwLock;
use thiserror::Error;
use uuid::Uuid;
use vox_protocol::{JobRecord, JobStatus};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DeleteError {
    #[error("job not found")]
    NotFound,

    #[error("job belongs to another user")]
    Unauthorized,

    /// Queued or Running jobs must be cancelled before deletion.
    #[error("job is still active")]
    StillActive,
}

#[derive(Default)]
pub struct JobStore {
    records: RwLock<HashMap<Uuid, JobRecord>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: JobRecord) {
        self.records.write().insert(record.job_id, record);
    }

    /// Snapshot of one record.
    pub fn get(&self, job_id: Uuid) -> Option<JobRecord> {
        self.records.read().get(&job_id).cloned()
    }

    /// Whether the user already has a Queued or Running job.
    pub fn user_active(&self, user_id: &str) -> bool {
        self.records
            .read()
            .values()
            .any(|record| record.user_id == user_id && record.status.is_active())
    }

    /// The user's finished jobs, newest first.
    pub fn history(&self, user_id: &str) -> Vec<JobRecord> {
        let mut records: Vec<JobRecord> = self
            .records
            .read()
            .values()
            .filter(|record| record.user_id == user_id && record.status.is_terminal())
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    /// Marks a Queued job as Running. No-op for terminal records.
    pub fn mark_running(&self, job_id: Uuid) {
        self.update_live(job_id, |record| {
            record.status = JobStatus::Running;
            record.message = "running".to_string();
        });
    }

    /// Records which stage the job is on and its overall progress.
    ///
    /// Progress is clamped so it never moves backwards; a stage whose
    /// output markers jitter cannot make the reported value regress.
    pub fn set_stage_progress(
        &self,
        job_id: Uuid,
        stage_index: usize,
        stage_name: &str,
        progress: u8,
    ) {
        self.update_live(job_id, |record| {
            record.current_stage_index = stage_index;
            record.current_stage = Some(stage_name.to_string());
            record.progress = record.progress.max(progress.min(100));
            record.message = format!(
                "running {} stage ({}/{})",
                stage_name,
                stage_index + 1,
                record.stages.len()
            );
        });
    }

    pub fn mark_completed(&self, job_id: Uuid, result: HashMap<String, PathBuf>) {
        self.update_live(job_id, |record| {
            record.status = JobStatus::Completed;
            record.progress = 100;
            record.current_stage = None;
            record.message = "completed".to_string();
            record.result = Some(result);
        });
    }

    pub fn mark_failed(&self, job_id: Uuid, error: String) {
        self.update_live(job_id, |record| {
            record.status = JobStatus::Failed;
            record.current_stage = None;
            record.message = "failed".to_string();
            record.error = Some(error);
        });
    }

    pub fn mark_cancelled(&self, job_id: Uuid) {
        self.update_live(job_id, |record| {
            record.status = JobStatus::Cancelled;
            record.current_stage = None;
            record.message = "cancelled".to_string();
        });
    }

    /// Removes a finished job owned by `user_id`, returning the removed
    /// record so the caller can purge its workspace.
    ///
    /// # Errors
    ///
    /// [`DeleteError::StillActive`] when the job is Queued or Running;
    /// it must be cancelled first.
    pub fn delete(&self, job_id: Uuid, user_id: &str) -> Result<JobRecord, DeleteError> {
        let mut records = self.records.write();
        let record = records.get(&job_id).ok_or(DeleteError::NotFound)?;
        if record.user_id != user_id {
            return Err(DeleteError::Unauthorized);
        }
        if record.status.is_active() {
            return Err(DeleteError::StillActive);
        }
        // checks passed; the entry is present
        records.remove(&job_id).ok_or(DeleteError::NotFound)
    }

    fn update_live(&self, job_id: Uuid, apply: impl FnOnce(&mut JobRecord)) {
        let mut records = self.records.write();
        if let Some(record) = records.get_mut(&job_id) {
            if record.status.is_terminal() {
                tracing::debug!(%job_id, status = ?record.status, "ignoring update to terminal job");
                return;
            }
            apply(record);
        }
    }
}
