//! # vox-core
//!
//! Core scheduling and pipeline execution engine for TransVox.
//!
//! This crate provides:
//! - Configuration loading for the orchestrator
//! - Per-job artifact staging on the filesystem
//! - Stage runner abstraction for the external pipeline tools
//! - Process supervision with whole-tree termination
//! - Sequential pipeline execution with live progress
//! - FIFO job scheduling with per-user and global admission control
//!
//! ## Modules
//!
//! - [`config`]: Orchestrator configuration
//! - [`stager`]: Per-job workspace and stage-to-stage file handoff
//! - [`stages`]: Stage runner trait and the standard pipeline registry
//! - [`supervisor`]: Subprocess spawning, capture, and tree termination
//! - [`executor`]: Per-job pipeline state machine
//! - [`scheduler`]: Admission control and the scheduling loop
//! - [`store`]: Atomic job record store backing the status reporter

pub mod config;
pub mod executor;
pub mod scheduler;
pub mod stager;
pub mod stages;
pub mod store;
pub mod supervisor;
