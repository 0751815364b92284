//! Concrete stage runners for the standard dubbing pipeline.
//!
//! Pipeline order: separation -> transcription -> translation -> synthesis
//! -> mux. Each runner owns only its configured tool path; everything else
//! comes from the [`StageContext`](crate::stages::StageContext).

mod mux;
mod separation;
mod synthesis;
mod transcription;
mod translation;

pub use mux::MuxStage;
pub use separation::SeparationStage;
pub use synthesis::SynthesisStage;
pub use transcription::TranscriptionStage;
pub use translation::TranslationStage;
