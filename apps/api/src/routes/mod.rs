pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers as jobs;
use crate::state::AppState;
use crate::store::handlers as admin;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route("/api/v1/jobs", get(jobs::handle_list_jobs))
        .route("/api/v1/jobs/discover", post(jobs::handle_discover))
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .route("/api/v1/jobs/:id/analyze", post(jobs::handle_analyze))
        .route("/api/v1/jobs/:id/tailor", post(jobs::handle_tailor))
        .route("/api/v1/jobs/:id/compile", post(jobs::handle_compile))
        .route("/api/v1/jobs/:id/applied", post(jobs::handle_applied))
        .route("/api/v1/jobs/:id/skip", post(jobs::handle_skip))
        .route("/api/v1/activity", get(jobs::handle_activity))
        // Settings, profile, master resume
        .route(
            "/api/v1/settings",
            get(admin::handle_get_settings).put(admin::handle_put_settings),
        )
        .route(
            "/api/v1/profile",
            get(admin::handle_get_profile).put(admin::handle_put_profile),
        )
        .route(
            "/api/v1/resume",
            get(admin::handle_get_resume).put(admin::handle_put_resume),
        )
        // Snapshot / restore
        .route("/api/v1/state/export", get(admin::handle_export))
        .route("/api/v1/state/import", post(admin::handle_import))
        .route("/api/v1/state/reset", post(admin::handle_reset))
        .with_state(state)
}
