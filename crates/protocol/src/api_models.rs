//! Request/response DTOs for the public job API.
//!
//! These mirror [`crate::job_models::JobRecord`] but expose only the fields
//! that belong to the polling contract. Internal details (workspace paths,
//! raw diagnostics) never appear here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use ts_rs::TS;
use uuid::Uuid;

use crate::job_models::{JobRecord, JobStatus, SubtitleMode};

/// Body of a job submission.
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct SubmitRequest {
    /// Identity of the submitting user.
    pub user_id: String,

    /// Path to the source media file, visible to the server.
    pub video_path: PathBuf,

    /// Source language hint, or `auto`.
    #[serde(default = "default_auto")]
    pub source_language: String,

    /// Target language for translation and dubbing.
    pub target_language: String,

    /// Speech synthesis engine selection.
    #[serde(default = "default_engine")]
    pub synthesis_engine: String,

    /// Subtitle delivery mode.
    #[serde(default)]
    pub subtitle_mode: SubtitleMode,
}

fn default_auto() -> String {
    "auto".to_string()
}

fn default_engine() -> String {
    "indextts".to_string()
}

/// Successful submission response.
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct SubmitResponse {
    #[ts(type = "string")]
    pub job_id: Uuid,
}

/// Pollable view of one job, derived from its record.
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct StatusResponse {
    #[ts(type = "string")]
    pub job_id: Uuid,

    pub status: JobStatus,

    /// Overall progress, 0-100.
    pub progress: u8,

    /// Name of the stage currently executing, if any.
    pub current_stage: Option<String>,

    /// Short human-readable description of the current step.
    pub message: String,

    /// Final artifact paths. Only present on Completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<HashMap<String, PathBuf>>,

    /// Sanitized failure diagnostic. Only present on Failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&JobRecord> for StatusResponse {
    fn from(record: &JobRecord) -> Self {
        Self {
            job_id: record.job_id,
            status: record.status,
            progress: record.progress,
            current_stage: record.current_stage.clone(),
            message: record.message.clone(),
            result: record.result.clone(),
            error: record.error.clone(),
        }
    }
}

/// One entry of a user's history listing (terminal jobs only).
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct JobSummary {
    #[ts(type = "string")]
    pub job_id: Uuid,

    pub status: JobStatus,

    /// Base name of the submitted media.
    pub video_name: String,

    pub target_language: String,

    pub created_at: DateTime<Utc>,
}

impl From<&JobRecord> for JobSummary {
    fn from(record: &JobRecord) -> Self {
        let video_name = record
            .config
            .video_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            job_id: record.job_id,
            status: record.status,
            video_name,
            target_language: record.config.target_language.clone(),
            created_at: record.created_at,
        }
    }
}

/// Generic acknowledgement body for cancel/delete.
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}
