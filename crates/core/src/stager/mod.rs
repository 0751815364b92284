//! Per-job artifact staging.
//!
//! Each job owns a filesystem workspace rooted at a deterministic path
//! derived from the submitting user and the job id:
//!
//! ```text
//! <workspace_root>/<user_id>/<job_id>/<media_stem>/
//!     separation/<stem>.vocals.wav
//!     separation/<stem>.accompaniment.wav
//!     transcription/<stem>.srt
//!     translation/<stem>.translated.srt
//!     synthesis/<stem>.dubbed.wav
//!     mux/<stem>.dubbed.mp4
//!     mux/<stem>.translated.srt        (subtitle_mode = external only)
//! ```
//!
//! Stage-to-stage handoff is purely by naming convention: every stage writes
//! under its own stage-named subdirectory keyed by the media's base name, so
//! the next stage locates its inputs without any bookkeeping. Workspaces are
//! never garbage collected automatically; they persist until deleted through
//! the history interface.

use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Handle to one job's workspace.
#[derive(Debug, Clone)]
pub struct JobWorkspace {
    root: PathBuf,
    stem: String,
}

impl JobWorkspace {
    /// Create a workspace handle for a job. Does not touch the filesystem.
    pub fn new(workspace_root: &Path, user_id: &str, job_id: Uuid, source_media: &Path) -> Self {
        let stem = source_media
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "media".to_string());
        let root = job_dir(workspace_root, user_id, job_id).join(&stem);
        Self { root, stem }
    }

    /// Base name of the source media, without extension.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Root of this job's workspace (the per-media directory).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Output directory for the named stage.
    pub fn stage_dir(&self, stage: &str) -> PathBuf {
        self.root.join(stage)
    }

    /// Create (if needed) and return the output directory for a stage.
    pub fn ensure_stage_dir(&self, stage: &str) -> io::Result<PathBuf> {
        let dir = self.stage_dir(stage);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    // Stage handoff conventions. Each path is both the declared output of
    // one stage and the input of the next.

    pub fn vocals_wav(&self) -> PathBuf {
        self.stage_dir("separation").join(format!("{}.vocals.wav", self.stem))
    }

    pub fn accompaniment_wav(&self) -> PathBuf {
        self.stage_dir("separation")
            .join(format!("{}.accompaniment.wav", self.stem))
    }

    pub fn transcript_srt(&self) -> PathBuf {
        self.stage_dir("transcription").join(format!("{}.srt", self.stem))
    }

    pub fn translated_srt(&self) -> PathBuf {
        self.stage_dir("translation")
            .join(format!("{}.translated.srt", self.stem))
    }

    pub fn dubbed_wav(&self) -> PathBuf {
        self.stage_dir("synthesis").join(format!("{}.dubbed.wav", self.stem))
    }

    pub fn dubbed_video(&self) -> PathBuf {
        self.stage_dir("mux").join(format!("{}.dubbed.mp4", self.stem))
    }

    pub fn sidecar_subtitle(&self) -> PathBuf {
        self.stage_dir("mux").join(format!("{}.translated.srt", self.stem))
    }
}

/// Directory holding everything belonging to one job (all media stems).
///
/// This is the unit removed when a job's history entry is purged.
pub fn job_dir(workspace_root: &Path, user_id: &str, job_id: Uuid) -> PathBuf {
    workspace_root.join(user_id).join(job_id.to_string())
}
