//! # vox-api
//!
//! HTTP binding for the TransVox job orchestrator. The API is a thin
//! translation layer: every operation delegates to
//! [`vox_core::scheduler::JobScheduler`] and maps its typed errors onto
//! HTTP statuses.

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use vox_core::scheduler::JobScheduler;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<JobScheduler>,
}

/// Builds the full application router around a scheduler.
pub fn router(scheduler: Arc<JobScheduler>) -> Router {
    routes::router().with_state(AppState { scheduler })
}
