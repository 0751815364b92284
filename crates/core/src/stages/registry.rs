//! Registry of stage runners in pipeline order.

use std::sync::Arc;

use crate::config::ToolPaths;
use crate::stages::base::StageRunner;
use crate::stages::runners::{
    MuxStage, SeparationStage, SynthesisStage, TranscriptionStage, TranslationStage,
};

/// An ordered, immutable collection of stage runners.
///
/// Built once at startup and shared across all jobs. Order is the
/// execution order: each runner consumes the artifacts its predecessors
/// left in the job workspace.
pub struct StageRegistry {
    runners: Vec<Arc<dyn StageRunner>>,
}

impl StageRegistry {
    /// Builds the standard five-stage dubbing pipeline from configured
    /// tool paths.
    pub fn standard(tools: &ToolPaths) -> Self {
        Self {
            runners: vec![
                Arc::new(SeparationStage::new(tools.separation.clone())),
                Arc::new(TranscriptionStage::new(tools.transcription.clone())),
                Arc::new(TranslationStage::new(tools.translation.clone())),
                Arc::new(SynthesisStage::new(tools.synthesis.clone())),
                Arc::new(MuxStage::new(tools.mux.clone())),
            ],
        }
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<String> {
        self.runners.iter().map(|r| r.name().to_string()).collect()
    }

    /// The runners in execution order.
    pub fn runners(&self) -> &[Arc<dyn StageRunner>] {
        &self.runners
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }
}
