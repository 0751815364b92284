//! Vocal separation stage.
//!
//! Splits the source media's audio into a vocals track (used for
//! transcription and as the synthesis voice reference) and an
//! accompaniment track (remixed into the final video by the mux stage).

use std::path::PathBuf;

use crate::stages::base::{
    path_arg, require_input, Invocation, StageArtifact, StageContext, StageError, StageRunner,
};

pub struct SeparationStage {
    program: PathBuf,
}

impl SeparationStage {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

impl StageRunner for SeparationStage {
    fn name(&self) -> &'static str {
        "separation"
    }

    fn build_invocation(&self, ctx: &StageContext) -> Result<Invocation, StageError> {
        let video = require_input(self.name(), ctx.config.video_path.clone())?;
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
                path_arg(&video),
                "-o".to_string(),
                path_arg(&out_dir),
                "--stem".to_string(),
                ctx.workspace.stem().to_string(),
            ],
            cwd: None,
        })
    }

    fn expected_outputs(&self, ctx: &StageContext) -> Vec<StageArtifact> {
        vec![
            StageArtifact::new("vocals", ctx.workspace.vocals_wav()),
            StageArtifact::new("accompaniment", ctx.workspace.accompaniment_wav()),
        ]
    }
}
