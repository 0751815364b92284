//! Configuration models for the orchestrator TOML file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// External programs invoked for each pipeline stage.
///
/// Values may be bare program names (resolved through `PATH`) or absolute
/// paths. Each program follows the stage subprocess contract: it receives
/// its input artifact(s), `-o <output_dir>`, and stage-specific options,
/// and signals success with exit code 0.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ToolPaths {
    pub separation: PathBuf,
    pub transcription: PathBuf,
    pub translation: PathBuf,
    pub synthesis: PathBuf,
    pub mux: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            separation: PathBuf::from("transvox-separate"),
            transcription: PathBuf::from("transvox-transcribe"),
            translation: PathBuf::from("transvox-translate"),
            synthesis: PathBuf::from("transvox-synthesize"),
            mux: PathBuf::from("transvox-mux"),
        }
    }
}

/// Top-level orchestrator settings.
///
/// # Example
///
/// ```toml
/// max_global_concurrency = 1
/// max_queue_len = 16
/// poll_interval_ms = 300
/// workspace_root = "output"
///
/// [tools]
/// translation = "/opt/transvox/bin/transvox-translate"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Maximum number of jobs Running at the same time.
    pub max_global_concurrency: usize,

    /// Optional cap on the number of Queued jobs. `None` means unbounded.
    pub max_queue_len: Option<usize>,

    /// Scheduling loop poll interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Root directory for per-job workspaces.
    pub workspace_root: PathBuf,

    /// Optional per-stage deadline in seconds. Exceeding it is a stage
    /// failure. `None` disables the deadline.
    pub stage_timeout_secs: Option<u64>,

    /// External stage programs.
    pub tools: ToolPaths,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_global_concurrency: 1,
            max_queue_len: None,
            poll_interval_ms: 300,
            workspace_root: PathBuf::from("output"),
            stage_timeout_secs: None,
            tools: ToolPaths::default(),
        }
    }
}

impl OrchestratorConfig {
    /// The scheduling loop poll interval as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// The per-stage deadline, if configured.
    pub fn stage_timeout(&self) -> Option<Duration> {
        self.stage_timeout_secs.map(Duration::from_secs)
    }
}
