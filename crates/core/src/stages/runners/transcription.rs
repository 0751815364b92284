//! Transcription stage.
//!
//! Transcribes the separated vocals track into a timed subtitle file.

use std::path::PathBuf;

use crate::stages::base::{
    path_arg, require_input, Invocation, StageArtifact, StageContext, StageError, StageRunner,
};

pub struct TranscriptionStage {
    program: PathBuf,
}

impl TranscriptionStage {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

impl StageRunner for TranscriptionStage {
    fn name(&self) -> &'static str {
        "transcription"
    }

    fn build_invocation(&self, ctx: &StageContext) -> Result<Invocation, StageError> {
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
                path_arg(&vocals),
                "-o".to_string(),
                path_arg(&out_dir),
                "--stem".to_string(),
                ctx.workspace.stem().to_string(),
                "--language".to_string(),
                ctx.config.source_language.clone(),
            ],
            cwd: None,
        })
    }

    fn expected_outputs(&self, ctx: &StageContext) -> Vec<StageArtifact> {
        vec![StageArtifact::new("transcript", ctx.workspace.transcript_srt())]
    }
}
