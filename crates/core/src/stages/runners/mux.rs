//! Mux stage.
//!
//! Combines the source video, accompaniment track, and dubbed audio into
//! the final video, embedding or emitting subtitles per the job's
//! subtitle mode.

use std::path::PathBuf;
use vox_protocol::SubtitleMode;

use crate::stages::base::{
    path_arg, require_input, Invocation, StageArtifact, StageContext, StageError, StageRunner,
};

pub struct MuxStage {
    program: PathBuf,
}

impl MuxStage {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    fn subtitle_flag(mode: SubtitleMode) -> &'static str {
        match mode {
            SubtitleMode::Embed => "embed",
            SubtitleMode::External => "external",
            SubtitleMode::None => "none",
        }
    }
}

impl StageRunner for MuxStage {
    fn name(&self) -> &'static str {
        "mux"
    }

    fn build_invocation(&self, ctx: &StageContext) -> Result<Invocation, StageError> {
        let video = require_input(self.name(), ctx.config.video_path.clone())?;
        let dubbed = require_input(self.name(), ctx.workspace.dubbed_wav())?;
        let accompaniment = require_input(self.name(), ctx.workspace.accompaniment_wav())?;
        let out_dir = ctx
            .workspace
            .ensure_stage_dir(self.name())
            .map_err(|source| StageError::OutputDir {
                stage: self.name(),
                source,
            })?;

        let mut args = vec![
            path_arg(&video),
            path_arg(&dubbed),
            path_arg(&accompaniment),
            "-o".to_string(),
            path_arg(&out_dir),
            "--stem".to_string(),
            ctx.workspace.stem().to_string(),
            "--subtitles".to_string(),
            Self::subtitle_flag(ctx.config.subtitle_mode).to_string(),
        ];
        if ctx.config.subtitle_mode != SubtitleMode::None {
            let translated = require_input(self.name(), ctx.workspace.translated_srt())?;
            args.push("--subtitle-file".to_string());
            args.push(path_arg(&translated));
        }

        Ok(Invocation {
            program: self.program.clone(),
            args,
            cwd: None,
        })
    }

    fn expected_outputs(&self, ctx: &StageContext) -> Vec<StageArtifact> {
        let mut outputs = vec![StageArtifact::new("final_video", ctx.workspace.dubbed_video())];
        if ctx.config.subtitle_mode == SubtitleMode::External {
            outputs.push(StageArtifact::new(
                "subtitle_file",
                ctx.workspace.sidecar_subtitle(),
            ));
        }
        outputs
    }
}
