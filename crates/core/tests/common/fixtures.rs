//! Test fixtures: fake stage tools and a running scheduler harness.
//!
//! The fake tools are POSIX shell scripts honoring the stage subprocess
//! contract (`<inputs...> -o <outdir> --stem <stem> [options]`), so these
//! tests only run on unix.
#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use uuid::Uuid;
use vox_core::config::{OrchestratorConfig, ToolPaths};
use vox_core::scheduler::JobScheduler;
use vox_core::stager::JobWorkspace;
use vox_core::stages::StageRegistry;
use vox_core::store::JobStore;
use vox_core::supervisor::ProcessSupervisor;
use vox_protocol::{JobConfig, SubtitleMode};

/// Shared argument-parsing prelude for every fake tool.
const SCRIPT_PRELUDE: &str = r#"#!/bin/sh
out=""
stem=""
while [ "$#" -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    --stem) stem="$2"; shift 2 ;;
    *) shift ;;
  esac
done
"#;

/// Script bodies for the five stage tools. Defaults succeed instantly and
/// produce every expected artifact.
pub struct ToolScripts {
    pub separation: String,
    pub transcription: String,
    pub translation: String,
    pub synthesis: String,
    pub mux: String,
}

impl Default for ToolScripts {
    fn default() -> Self {
        Self {
            separation: [
                r#"echo "progress:50""#,
                r#"printf wav > "$out/$stem.vocals.wav""#,
                r#"printf wav > "$out/$stem.accompaniment.wav""#,
            ]
            .join("\n"),
            transcription: r#"printf srt > "$out/$stem.srt""#.to_string(),
            translation: r#"printf srt > "$out/$stem.translated.srt""#.to_string(),
            synthesis: r#"printf wav > "$out/$stem.dubbed.wav""#.to_string(),
            mux: r#"printf mp4 > "$out/$stem.dubbed.mp4""#.to_string(),
        }
    }
}

/// A script body that records its shell pid then blocks for a long time.
/// Used to test cancellation of a live stage.
pub fn blocking_script(pid_file_name: &str) -> String {
    format!(
        r#"echo "$$" > "$out/{pid_file_name}"
sleep 30"#
    )
}

/// A script body that fails with a diagnostic on stderr.
pub fn failing_script(stderr_line: &str, code: i32) -> String {
    format!(
        r#"echo "{stderr_line}" >&2
exit {code}"#
    )
}

/// A fully wired scheduler running against fake tools in a tempdir.
pub struct Harness {
    pub scheduler: Arc<JobScheduler>,
    pub video: PathBuf,
    root: TempDir,
    loop_handle: tokio::task::JoinHandle<()>,
}

impl Harness {
    /// Stands up store, supervisor, registry, and the scheduling loop
    /// with a fast poll interval.
    pub fn start(scripts: ToolScripts) -> Self {
        Self::start_with(scripts, 1, None, None)
    }

    /// Like [`start`](Self::start), but with a per-stage deadline.
    pub fn start_with_timeout(scripts: ToolScripts, stage_timeout_secs: u64) -> Self {
        Self::start_with(scripts, 1, None, Some(stage_timeout_secs))
    }

    pub fn start_with(
        scripts: ToolScripts,
        max_global_concurrency: usize,
        max_queue_len: Option<usize>,
        stage_timeout_secs: Option<u64>,
    ) -> Self {
        let root = TempDir::new().expect("tempdir");
        let tools_dir = root.path().join("tools");
        std::fs::create_dir_all(&tools_dir).expect("mkdir tools");

        let tools = ToolPaths {
            separation: write_tool(&tools_dir, "fake-separate", &scripts.separation),
            transcription: write_tool(&tools_dir, "fake-transcribe", &scripts.transcription),
            translation: write_tool(&tools_dir, "fake-translate", &scripts.translation),
            synthesis: write_tool(&tools_dir, "fake-synthesize", &scripts.synthesis),
            mux: write_tool(&tools_dir, "fake-mux", &scripts.mux),
        };

        let video = root.path().join("input").join("talk.mp4");
        std::fs::create_dir_all(video.parent().expect("parent")).expect("mkdir input");
        std::fs::write(&video, b"fake mp4 bytes").expect("write video");

        let config = OrchestratorConfig {
            max_global_concurrency,
            max_queue_len,
            poll_interval_ms: 20,
            workspace_root: root.path().join("output"),
            stage_timeout_secs,
            tools,
        };

        let registry = Arc::new(StageRegistry::standard(&config.tools));
        let scheduler = Arc::new(JobScheduler::new(
            config,
            Arc::new(JobStore::new()),
            Arc::new(ProcessSupervisor::new()),
            registry,
        ));
        let loop_handle = scheduler.clone().spawn_loop();

        Self {
            scheduler,
            video,
            root,
            loop_handle,
        }
    }

    /// A submission config pointing at the harness's input video.
    pub fn job_config(&self) -> JobConfig {
        JobConfig {
            video_path: self.video.clone(),
            source_language: "auto".to_string(),
            target_language: "en".to_string(),
            synthesis_engine: "indextts".to_string(),
            subtitle_mode: SubtitleMode::Embed,
        }
    }

    /// The workspace handle a job's executor will use.
    pub fn workspace(&self, user_id: &str, job_id: Uuid) -> JobWorkspace {
        JobWorkspace::new(&self.root.path().join("output"), user_id, job_id, &self.video)
    }

    pub fn stop(&self) {
        self.scheduler.shutdown();
        self.loop_handle.abort();
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.stop();
    }
}

fn write_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("{SCRIPT_PRELUDE}{body}\n")).expect("write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("chmod script");
    path
}
