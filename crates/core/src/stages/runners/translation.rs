//! Subtitle translation stage.

use std::path::PathBuf;

use crate::stages::base::{
    path_arg, require_input, Invocation, StageArtifact, StageContext, StageError, StageRunner,
};

pub struct TranslationStage {
    program: PathBuf,
}

impl TranslationStage {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

impl StageRunner for TranslationStage {
    fn name(&self) -> &'static str {
        "translation"
    }

    fn build_invocation(&self, ctx: &StageContext) -> Result<Invocation, StageError> {
        let transcript = require_input(self.name(), ctx.workspace.transcript_srt())?;
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
                path_arg(&transcript),
                "-o".to_string(),
                path_arg(&out_dir),
                "--stem".to_string(),
                ctx.workspace.stem().to_string(),
                "--target-lang".to_string(),
                ctx.config.target_language.clone(),
            ],
            cwd: None,
        })
    }

    fn expected_outputs(&self, ctx: &StageContext) -> Vec<StageArtifact> {
        vec![StageArtifact::new(
            "translated_subtitles",
            ctx.workspace.translated_srt(),
        )]
    }
}
