//! # vox-protocol
//!
//! Core protocol definitions and data models for the TransVox orchestrator.
//!
//! This crate defines all shared data structures used for:
//! - Job records and lifecycle status tracked by the scheduler
//! - Request/response shapes of the public job API
//!
//! ## Modules
//!
//! - [`job_models`]: Job records, configuration, and lifecycle status
//! - [`api_models`]: Request/response DTOs for the job API
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, ts-rs, uuid, and chrono
//! - TypeScript generation: All types derive `TS` for client compatibility
//! - Independent compilation: No dependencies on other workspace crates

pub mod api_models;
pub mod job_models;

// Re-export all public types for convenience
pub use api_models::*;
pub use job_models::*;
