//! Job records and lifecycle status.
//!
//! This module defines the structures the scheduler uses to track one
//! end-to-end dubbing job from submission to its terminal state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use ts_rs::TS;
use uuid::Uuid;

/// Lifecycle status of a submitted job.
///
/// Normal progression: Queued -> Running -> Completed.
///
/// Terminal states:
/// - Completed: every stage finished and its outputs validated
/// - Failed: a stage failed; `error` on the record carries the diagnostic
/// - Cancelled: the submitting user cancelled the job
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Job is waiting in the FIFO queue.
    Queued,

    /// Job has been dequeued and its pipeline is executing.
    Running,

    /// All stages completed successfully.
    Completed,

    /// A stage failed; remaining stages were skipped.
    Failed,

    /// The job was cancelled by its owner.
    Cancelled,
}

impl JobStatus {
    /// Whether this status is terminal (the record is immutable from here on).
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    /// Whether a job in this status counts against the per-user active limit.
    pub fn is_active(self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Running)
    }
}

/// How subtitles are delivered in the final output.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleMode {
    /// Burn/embed subtitles into the muxed video.
    Embed,
    /// Produce a sidecar subtitle file next to the video.
    External,
    /// No subtitles in the final output.
    None,
}

impl Default for SubtitleMode {
    fn default() -> Self {
        SubtitleMode::Embed
    }
}

/// Per-job options carried through the pipeline.
///
/// Opaque to the scheduler: only the stage runners interpret these fields
/// when building their external invocations.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct JobConfig {
    /// Path to the source media file.
    pub video_path: PathBuf,

    /// Source language hint, or `auto` for detection.
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language for translation and synthesis.
    pub target_language: String,

    /// Which speech synthesis engine to use (e.g. `indextts`, `gptsovits`).
    pub synthesis_engine: String,

    /// Subtitle delivery mode for the mux stage.
    #[serde(default)]
    pub subtitle_mode: SubtitleMode,
}

fn default_source_language() -> String {
    "auto".to_string()
}

/// The runtime record of a single job.
///
/// Created by admission control on submission, mutated only by the executor
/// that owns it while Running, and immutable once a terminal status is set.
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct JobRecord {
    /// Unique identifier for this job. Never reused.
    #[ts(type = "string")]
    pub job_id: Uuid,

    /// Owner of the job. At most one active job per user.
    pub user_id: String,

    /// Ordered names of the stages this job will execute.
    pub stages: Vec<String>,

    /// Submission options, interpreted only by the stage runners.
    pub config: JobConfig,

    /// Current lifecycle status.
    pub status: JobStatus,

    /// Zero-based index of the stage currently executing (or next to execute).
    pub current_stage_index: usize,

    /// Name of the stage currently executing, if any.
    pub current_stage: Option<String>,

    /// Overall progress, 0-100. Monotonically non-decreasing until terminal.
    pub progress: u8,

    /// Short human-readable description of the current step.
    pub message: String,

    /// Submission time.
    pub created_at: DateTime<Utc>,

    /// Final artifact paths, keyed by artifact name. Only set on Completed.
    pub result: Option<HashMap<String, PathBuf>>,

    /// Sanitized failure diagnostic. Only set on Failed.
    pub error: Option<String>,
}

impl JobRecord {
    /// Create a fresh Queued record for a new submission.
    pub fn new(user_id: impl Into<String>, stages: Vec<String>, config: JobConfig) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            user_id: user_id.into(),
            stages,
            config,
            status: JobStatus::Queued,
            current_stage_index: 0,
            current_stage: None,
            progress: 0,
            message: "queued".to_string(),
            created_at: Utc::now(),
            result: None,
            error: None,
        }
    }
}
