//! Base StageRunner trait and supporting types.

use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;
use vox_protocol::JobConfig;

use crate::stager::JobWorkspace;

/// Per-job context handed to a stage runner.
#[derive(Debug, Clone)]
pub struct StageContext {
    /// The owning job.
    pub job_id: Uuid,

    /// Submission options interpreted by the runners.
    pub config: JobConfig,

    /// The job's filesystem workspace.
    pub workspace: JobWorkspace,
}

/// A fully built external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to execute (bare name resolved via PATH, or absolute path).
    pub program: PathBuf,

    /// Arguments, in order.
    pub args: Vec<String>,

    /// Working directory, if the stage needs one.
    pub cwd: Option<PathBuf>,
}

/// One declared output of a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageArtifact {
    /// Stable artifact name used in the job's `result` map.
    pub name: &'static str,

    /// Where the stage must write it.
    pub path: PathBuf,
}

impl StageArtifact {
    pub fn new(name: &'static str, path: PathBuf) -> Self {
        Self { name, path }
    }
}

#[derive(Error, Debug)]
pub enum StageError {
    /// A required input artifact from an earlier stage is missing.
    ///
    /// Displays only the file name; full workspace paths never appear in
    /// client-facing messages.
    #[error("missing input for {stage} stage: {}", file_name_of(.path))]
    MissingInput { stage: &'static str, path: PathBuf },

    /// The stage's output directory could not be created.
    #[error("failed to prepare {stage} stage output directory: {source}")]
    OutputDir {
        stage: &'static str,
        source: std::io::Error,
    },

    /// A declared output is missing or empty after the subprocess exited 0.
    #[error("{stage} stage produced no {artifact} output")]
    MissingOutput {
        stage: &'static str,
        artifact: &'static str,
    },
}

/// One step of the dubbing pipeline.
///
/// Implementations are stateless aside from their configured tool path and
/// are shared across all jobs. The executor drives them in registry order.
pub trait StageRunner: Send + Sync {
    /// Stable stage name, used for workspace subdirectories, status
    /// reporting, and diagnostics.
    fn name(&self) -> &'static str;

    /// Build the external invocation for this stage.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::MissingInput`] when a handoff artifact from an
    /// earlier stage is absent, or [`StageError::OutputDir`] when the output
    /// directory cannot be created.
    fn build_invocation(&self, ctx: &StageContext) -> Result<Invocation, StageError>;

    /// The artifacts this stage must produce.
    fn expected_outputs(&self, ctx: &StageContext) -> Vec<StageArtifact>;

    /// Interpret one line of the subprocess's stdout as an intra-stage
    /// progress fraction (0-100).
    ///
    /// The default recognizes the `progress:<n>` marker. Stages are free to
    /// override this for tool-specific output; absence of any recognizable
    /// signal is never an error.
    fn parse_progress(&self, line: &str) -> Option<u8> {
        parse_progress_marker(line)
    }

    /// Verify every declared output exists and is non-empty.
    fn validate_outputs(&self, ctx: &StageContext) -> Result<(), StageError> {
        for artifact in self.expected_outputs(ctx) {
            if !is_non_empty_file(&artifact.path) {
                return Err(StageError::MissingOutput {
                    stage: self.name(),
                    artifact: artifact.name,
                });
            }
        }
        Ok(())
    }
}

/// Parse the machine-readable progress marker stages may emit on stdout.
///
/// Recognized shape: `progress:<0-100>` (surrounding whitespace ignored,
/// values above 100 clamped). Anything else yields `None`.
pub fn parse_progress_marker(line: &str) -> Option<u8> {
    let rest = line.trim().strip_prefix("progress:")?;
    let value: u32 = rest.trim().parse().ok()?;
    Some(value.min(100) as u8)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn is_non_empty_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

/// Render a path as a command-line argument.
pub(crate) fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

/// Require that `path` exists, as the handoff input for `stage`.
pub(crate) fn require_input(stage: &'static str, path: PathBuf) -> Result<PathBuf, StageError> {
    if path.exists() {
        Ok(path)
    } else {
        Err(StageError::MissingInput { stage, path })
    }
}
