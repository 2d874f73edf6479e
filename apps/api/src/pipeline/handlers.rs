use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::models::activity::ActivityEntry;
use crate::models::job::Job;
use crate::pipeline::stages;
use crate::pipeline::stages::AppliedRequest;
use crate::scrape::{self, DiscoverReport};
use crate::state::AppState;

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Json<Vec<Job>> {
    Json(state.store.load().jobs_table)
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, AppError> {
    state
        .store
        .load()
        .jobs_table
        .into_iter()
        .find(|job| job.id == id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

/// POST /api/v1/jobs/discover
/// Always 200 — fetch and schema failures ride in the report body.
pub async fn handle_discover(State(state): State<AppState>) -> Json<DiscoverReport> {
    Json(scrape::discover_jobs(&state.store, state.source.as_ref()).await)
}

/// POST /api/v1/jobs/:id/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, AppError> {
    stages::analyze_job(&state, &id).await.map(Json)
}

/// POST /api/v1/jobs/:id/tailor
pub async fn handle_tailor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, AppError> {
    stages::tailor_job(&state, &id).await.map(Json)
}

/// POST /api/v1/jobs/:id/compile
pub async fn handle_compile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, AppError> {
    stages::compile_job(&state, &id).await.map(Json)
}

/// POST /api/v1/jobs/:id/applied
pub async fn handle_applied(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AppliedRequest>,
) -> Result<Json<Job>, AppError> {
    stages::mark_applied(&state, &id, request).map(Json)
}

/// POST /api/v1/jobs/:id/skip
pub async fn handle_skip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, AppError> {
    stages::skip_job(&state, &id).map(Json)
}

/// GET /api/v1/activity
pub async fn handle_activity(State(state): State<AppState>) -> Json<Vec<ActivityEntry>> {
    Json(state.store.load().activity_log)
}
