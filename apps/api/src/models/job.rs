use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Keyed;

/// Where a job sits in the application workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    New,
    Analyzing,
    AnalysisComplete,
    ResumeGenerated,
    Applied,
    Failed,
    Skipped,
}

/// Ledger entry recording that a job identity has been observed.
/// Immutable once written — re-ingestion never touches existing rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeenJob {
    /// Content hash of lowercased `company-role-location`.
    pub id: String,
    pub company: String,
    pub role: String,
    pub location: String,
    /// Free text from the source table cell, or a timestamp when absent.
    pub date_posted: String,
    pub url: String,
    /// Revision of the source document (GitHub file sha) that produced it.
    pub sha: String,
    pub date_discovered: DateTime<Utc>,
}

/// Submission metadata recorded when the user marks a job applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Working record tracking one job through the application lifecycle.
/// Created in lock-step with its `SeenJob` (same id), then mutated
/// field-by-field by the pipeline stages. Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub company: String,
    pub role: String,
    pub location: String,
    pub date_posted: String,
    pub url: String,
    pub status: JobStatus,
    /// Structured extraction result from the analysis collaborator.
    /// Opaque to the core — the schema belongs to the collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_latex: Option<String>,
    /// Base64-encoded compiled PDF.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_pdf_blob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_data: Option<ApplicationData>,
    /// Last failure message; cleared when a stage is retried.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Keyed for SeenJob {
    fn key(&self) -> String {
        self.id.clone()
    }
}

impl Keyed for Job {
    fn key(&self) -> String {
        self.id.clone()
    }
}
