//! Orchestrator configuration.
//!
//! Configuration is read from a single TOML file; every field has a default
//! so the orchestrator can run without one.

pub mod error;
pub mod loader;
pub mod models;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_or_default};
pub use models::{OrchestratorConfig, ToolPaths};
