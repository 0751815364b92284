//! Stage runner abstraction and the standard dubbing pipeline.
//!
//! A stage is a static, stateless description of one external processing
//! step: how to build its command line from a job's context, and which
//! output artifacts it must leave behind. Stages are shared across jobs;
//! all per-job state lives in [`base::StageContext`].

pub mod base;
pub mod registry;
pub mod runners;

pub use base::{
    parse_progress_marker, Invocation, StageArtifact, StageContext, StageError, StageRunner,
};
pub use registry::StageRegistry;
