//! Speech synthesis (dubbing) stage.
//!
//! Generates a dubbed audio track from the translated subtitles, using the
//! separated vocals as the voice reference. The engine is selected per job;
//! the orchestrator treats it as an opaque option.

use std::path::PathBuf;

use crate::stages::base::{
    path_arg, require_input, Invocation, StageArtifact, StageContext, StageError, StageRunner,
};

pub struct SynthesisStage {
    program: PathBuf,
}

impl SynthesisStage {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

impl StageRunner for SynthesisStage {
    fn name(&self) -> &'static str {
        "synthesis"
    }

    fn build_invocation(&self, ctx: &StageContext) -> Result<Invocation, StageError> {
        let translated = require_input(self.name(), ctx.workspace.translated_srt())?;
        let vocals = require_input(self.name(), ctx.workspace.vocals_wav())?;
        let out_dir = ctx
            .workspace
            .ensure_stage_dir(self.name())
            .map_err(|source| StageError::OutputDir {
                stage: self.name(),
                source,
            })?;

        Ok(Invocation {
            program: self.program.clone(),
            args: vec![
                path_arg(&translated),
                path_arg(&vocals),
                "-o".to_string(),
                path_arg(&out_dir),
                "--stem".to_string(),
                ctx.workspace.stem().to_string(),
                "--engine".to_string(),
                ctx.config.synthesis_engine.clone(),
                "--target-lang".to_string(),
                ctx.config.target_language.clone(),
            ],
            cwd: None,
        })
    }

    fn expected_outputs(&self, ctx: &StageContext) -> Vec<StageArtifact> {
        vec![StageArtifact::new("dubbed_audio", ctx.workspace.dubbed_wav())]
    }
}
