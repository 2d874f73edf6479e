//! Pipeline stages — the user-triggered actions that move a job through the
//! workflow.
//!
//! Every stage writes through the store's keyed update, bumps `updated_at`,
//! and records an activity entry. A collaborator failure (missing
//! credential, upstream error, malformed reply) marks the job
//! `status = failed` with the message in `error`, then surfaces to the
//! handler so the UI can show the banner and relabel the action "Retry".

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::models::activity::{ActivityAction, ActivityStatus};
use crate::models::job::{ApplicationData, Job, JobStatus};
use crate::models::settings::Settings;
use crate::state::AppState;
use crate::store::ListKey;

/// Body of the mark-applied action.
#[derive(Debug, Default, Deserialize)]
pub struct AppliedRequest {
    #[serde(default)]
    pub portal_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Fetches the posting body and extracts the analysis payload onto the job.
pub async fn analyze_job(state: &AppState, job_id: &str) -> Result<Job, AppError> {
    let data = state.store.load();
    let job = data
        .jobs_table
        .iter()
        .find(|job| job.id == job_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    state.store.update_list_item(
        ListKey::JobsTable,
        job_id,
        &json!({"status": JobStatus::Analyzing, "error": null, "updated_at": Utc::now()}),
    );

    match run_analysis(state, &job, &data.settings).await {
        Ok(analysis) => {
            state.store.update_list_item(
                ListKey::JobsTable,
                job_id,
                &json!({
                    "status": JobStatus::AnalysisComplete,
                    "analysis": analysis,
                    "updated_at": Utc::now(),
                }),
            );
            state.store.log_activity(
                ActivityAction::JobAnalyzed,
                Some(job_id.to_string()),
                format!("Analyzed {} - {}", job.company, job.role),
                ActivityStatus::Success,
            );
            info!("job {job_id} analyzed");
            current(state, job_id)
        }
        Err(e) => {
            fail_job(state, job_id, &e);
            Err(e)
        }
    }
}

async fn run_analysis(
    state: &AppState,
    job: &Job,
    settings: &Settings,
) -> Result<Value, AppError> {
    let api_key = require_api_key(settings)?;
    let body = state
        .postings
        .fetch(settings.rate_limit_delay, &job.url)
        .await?;
    state.extractor.extract(&api_key, &body).await
}

/// Rewrites the master résumé against the job's analysis and drafts a cover
/// letter. Requires a completed analysis and a non-empty master résumé.
pub async fn tailor_job(state: &AppState, job_id: &str) -> Result<Job, AppError> {
    let data = state.store.load();
    let job = data
        .jobs_table
        .iter()
        .find(|job| job.id == job_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let analysis = job
        .analysis
        .clone()
        .ok_or_else(|| AppError::Validation("Job has not been analyzed yet".to_string()))?;
    if data.master_resume.latex_source.trim().is_empty() {
        return Err(AppError::Validation(
            "Master resume LaTeX source is empty".to_string(),
        ));
    }

    match run_tailoring(state, &analysis, &data, &job).await {
        Ok((resume_latex, cover_letter)) => {
            state.store.update_list_item(
                ListKey::JobsTable,
                job_id,
                &json!({
                    "status": JobStatus::ResumeGenerated,
                    "resume_latex": resume_latex,
                    "cover_letter": cover_letter,
                    "error": null,
                    "updated_at": Utc::now(),
                }),
            );
            state.store.log_activity(
                ActivityAction::ResumeGenerated,
                Some(job_id.to_string()),
                format!("Generated tailored resume for {}", job.company),
                ActivityStatus::Success,
            );
            info!("job {job_id} tailored");
            current(state, job_id)
        }
        Err(e) => {
            fail_job(state, job_id, &e);
            Err(e)
        }
    }
}

async fn run_tailoring(
    state: &AppState,
    analysis: &Value,
    data: &crate::models::AppData,
    job: &Job,
) -> Result<(String, String), AppError> {
    let api_key = require_api_key(&data.settings)?;
    let resume_latex = state
        .tailor
        .tailor_resume(&api_key, analysis, &data.master_resume)
        .await?;
    let cover_letter = state
        .tailor
        .draft_cover_letter(&api_key, analysis, &data.user_profile, job)
        .await?;
    Ok((resume_latex, cover_letter))
}

/// Compiles the tailored LaTeX to a PDF and stores it base64-encoded.
pub async fn compile_job(state: &AppState, job_id: &str) -> Result<Job, AppError> {
    let job = current(state, job_id)?;
    let latex = job
        .resume_latex
        .clone()
        .ok_or_else(|| AppError::Validation("No tailored resume to compile".to_string()))?;

    match state.compiler.compile(&latex).await {
        Ok(pdf) => {
            state.store.update_list_item(
                ListKey::JobsTable,
                job_id,
                &json!({
                    "resume_pdf_blob": BASE64.encode(&pdf),
                    "error": null,
                    "updated_at": Utc::now(),
                }),
            );
            state.store.log_activity(
                ActivityAction::UserAction,
                Some(job_id.to_string()),
                format!("Compiled resume PDF for {}", job.company),
                ActivityStatus::Success,
            );
            info!("job {job_id} compiled ({} bytes)", pdf.len());
            current(state, job_id)
        }
        Err(e) => {
            fail_job(state, job_id, &e);
            Err(e)
        }
    }
}

/// Records the submission and moves the job to `applied`.
pub fn mark_applied(
    state: &AppState,
    job_id: &str,
    request: AppliedRequest,
) -> Result<Job, AppError> {
    let job = current(state, job_id)?;
    let application = ApplicationData {
        submitted_at: Some(Utc::now()),
        portal_url: request.portal_url,
        notes: request.notes,
    };
    state.store.update_list_item(
        ListKey::JobsTable,
        job_id,
        &json!({
            "status": JobStatus::Applied,
            "application_data": application,
            "updated_at": Utc::now(),
        }),
    );
    state.store.log_activity(
        ActivityAction::ApplicationSubmitted,
        Some(job_id.to_string()),
        format!("Marked {} - {} applied", job.company, job.role),
        ActivityStatus::Success,
    );
    current(state, job_id)
}

/// Takes the job out of the working set without deleting it.
pub fn skip_job(state: &AppState, job_id: &str) -> Result<Job, AppError> {
    let job = current(state, job_id)?;
    state.store.update_list_item(
        ListKey::JobsTable,
        job_id,
        &json!({"status": JobStatus::Skipped, "updated_at": Utc::now()}),
    );
    state.store.log_activity(
        ActivityAction::UserAction,
        Some(job_id.to_string()),
        format!("Skipped {} - {}", job.company, job.role),
        ActivityStatus::Success,
    );
    current(state, job_id)
}

fn require_api_key(settings: &Settings) -> Result<String, AppError> {
    settings
        .anthropic_api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            AppError::Validation("Anthropic API key is missing in Settings".to_string())
        })
}

fn current(state: &AppState, job_id: &str) -> Result<Job, AppError> {
    state
        .store
        .load()
        .jobs_table
        .into_iter()
        .find(|job| job.id == job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

fn fail_job(state: &AppState, job_id: &str, error: &AppError) {
    state.store.update_list_item(
        ListKey::JobsTable,
        job_id,
        &json!({
            "status": JobStatus::Failed,
            "error": error.to_string(),
            "updated_at": Utc::now(),
        }),
    );
    state.store.log_activity(
        ActivityAction::Error,
        Some(job_id.to_string()),
        error.to_string(),
        ActivityStatus::Failed,
    );
}
