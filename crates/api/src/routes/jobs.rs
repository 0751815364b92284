//! Job lifecycle routes.
//!
//! Thin handlers over the scheduler facade:
//!
//! - `POST   /api/jobs`              submit
//! - `GET    /api/jobs?user_id=`     history (terminal jobs, newest first)
//! - `GET    /api/jobs/{id}`         poll status
//! - `POST   /api/jobs/{id}/cancel`  cancel
//! - `DELETE /api/jobs/{id}?purge=`  delete history entry

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use vox_core::scheduler::{AdmissionError, CancelError};
use vox_core::store::DeleteError;
use vox_protocol::{
    JobConfig, JobSummary, OkResponse, StatusResponse, SubmitRequest, SubmitResponse,
};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit).get(history))
        .route("/{job_id}", get(status).delete(delete))
        .route("/{job_id}/cancel", post(cancel))
}

async fn submit(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> ApiResult<Json<SubmitResponse>> {
    let config = JobConfig {
        video_path: request.video_path,
        source_language: request.source_language,
        target_language: request.target_language,
        synthesis_engine: request.synthesis_engine,
        subtitle_mode: request.subtitle_mode,
    };

    let job_id = state
        .scheduler
        .submit(&request.user_id, config)
        .await
        .map_err(|error| match error {
            AdmissionError::UserAlreadyActive => ApiError::conflict(error.to_string()),
            AdmissionError::QueueFull => ApiError::service_unavailable(error.to_string()),
        })?;

    Ok(Json(SubmitResponse { job_id }))
}

async fn status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> ApiResult<Json<StatusResponse>> {
    let record = state
        .scheduler
        .status(job_id)
        .ok_or_else(|| ApiError::not_found("job not found"))?;
    Ok(Json(StatusResponse::from(&record)))
}

#[derive(Debug, Deserialize)]
struct CancelRequest {
    user_id: String,
}

async fn cancel(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(request): Json<CancelRequest>,
) -> ApiResult<Json<OkResponse>> {
    state
        .scheduler
        .cancel(job_id, &request.user_id)
        .await
        .map_err(|error| match error {
            CancelError::NotFound => ApiError::not_found(error.to_string()),
            CancelError::Unauthorized => ApiError::forbidden(error.to_string()),
        })?;
    Ok(Json(OkResponse::ok()))
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    user_id: String,
}

async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<JobSummary>> {
    let summaries = state
        .scheduler
        .history(&query.user_id)
        .iter()
        .map(JobSummary::from)
        .collect();
    Json(summaries)
}

#[derive(Debug, Deserialize)]
struct DeleteQuery {
    user_id: String,
    #[serde(default)]
    purge: bool,
}

async fn delete(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult<Json<OkResponse>> {
    state
        .scheduler
        .delete(job_id, &query.user_id, query.purge)
        .await
        .map_err(|error| match error {
            DeleteError::NotFound => ApiError::not_found(error.to_string()),
            DeleteError::Unauthorized => ApiError::forbidden(error.to_string()),
            DeleteError::StillActive => ApiError::conflict(error.to_string()),
        })?;
    Ok(Json(OkResponse::ok()))
}
