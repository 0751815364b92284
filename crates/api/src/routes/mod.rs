//! Route assembly.

pub mod health;
pub mod jobs;

use axum::{routing::get, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/api/jobs", jobs::router())
        .route("/health", get(health::health_check))
}
