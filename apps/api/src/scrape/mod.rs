//! Extraction Engine — turns the remote markdown listing into new,
//! previously-unseen job candidates with stable content-addressed ids.
//!
//! Flow: fetch source document → line-scan the jobs table → per row,
//! compute the identity hash → drop ids already in the seen ledger →
//! append the remainder as `SeenJob` + `Job` pairs and log the batch.
//!
//! Re-ingesting the same document is a no-op; a superset document yields
//! exactly the appended rows.

pub mod source;
pub mod table;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::activity::{ActivityAction, ActivityEntry, ActivityStatus};
use crate::models::job::{Job, JobStatus, SeenJob};
use crate::scrape::source::SourceFetcher;
use crate::scrape::table::{classify_header, is_separator_row, parse_row, split_cells, HeaderMatch};
use crate::store::JsonStore;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("unrecognized table schema: expected Company | Role | Location, found {found}")]
    UnrecognizedSchema { found: String },

    #[error("GitHub API rate limit exceeded")]
    RateLimited,

    #[error("source fetch failed: {0}")]
    Source(String),

    #[error("source document could not be decoded: {0}")]
    Decode(String),
}

/// Newly discovered rows from one ingestion pass.
#[derive(Debug, Default)]
pub struct Extraction {
    pub seen: Vec<SeenJob>,
    pub jobs: Vec<Job>,
    pub discovered_count: usize,
}

/// What a discovery run reports back to the UI. Failures land in `error`
/// instead of being raised — the caller decides whether to alert the user.
#[derive(Debug, Serialize)]
pub struct DiscoverReport {
    pub new_jobs_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DiscoverReport {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            new_jobs_count: 0,
            error: Some(error.into()),
        }
    }
}

/// Stable identity for a posting: sha256 over the lowercased
/// `company-role-location` concatenation. The concatenation format is a
/// compatibility contract — persisted ids must survive re-ingestion.
pub fn job_identity(company: &str, role: &str, location: &str) -> String {
    let normalized = format!("{company}-{role}-{location}").to_lowercase();
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// Parses the markdown document and emits one `SeenJob` + `Job` pair per
/// table row whose identity is not already in `existing_ids`.
///
/// The scan keeps a single "inside table" flag: it turns on at the
/// validated header row and never turns off — the engine assumes one
/// contiguous table and lets per-line row validation reject everything
/// else. A document with no recognizable table yields zero rows, which is
/// success, not an error.
pub fn extract_jobs(
    markdown: &str,
    existing_ids: &HashSet<String>,
    source_sha: &str,
    now: DateTime<Utc>,
) -> Result<Extraction, ScrapeError> {
    let mut in_table = false;
    let mut known = existing_ids.clone();
    let mut extraction = Extraction::default();

    for line in markdown.lines() {
        let cells = split_cells(line);
        if cells.is_empty() {
            continue;
        }

        if !in_table {
            match classify_header(&cells) {
                HeaderMatch::Jobs => in_table = true,
                HeaderMatch::Reordered => {
                    return Err(ScrapeError::UnrecognizedSchema {
                        found: cells.join(" | "),
                    });
                }
                HeaderMatch::Other => {}
            }
            continue;
        }

        if is_separator_row(&cells) {
            continue;
        }
        let Some(row) = parse_row(&cells) else {
            continue;
        };

        let id = job_identity(&row.company, &row.role, &row.location);
        if !known.insert(id.clone()) {
            // Already tracked — do not re-emit, do not touch timestamps.
            continue;
        }

        let date_posted = row.date_posted.unwrap_or_else(|| now.to_rfc3339());
        extraction.seen.push(SeenJob {
            id: id.clone(),
            company: row.company.clone(),
            role: row.role.clone(),
            location: row.location.clone(),
            date_posted: date_posted.clone(),
            url: row.url.clone(),
            sha: source_sha.to_string(),
            date_discovered: now,
        });
        extraction.jobs.push(Job {
            id,
            company: row.company,
            role: row.role,
            location: row.location,
            date_posted,
            url: row.url,
            status: JobStatus::New,
            analysis: None,
            resume_latex: None,
            resume_pdf_blob: None,
            cover_letter: None,
            application_data: None,
            error: None,
            created_at: now,
            updated_at: now,
        });
    }

    extraction.discovered_count = extraction.seen.len();
    Ok(extraction)
}

/// Fetches the source document and ingests it against the store.
pub async fn discover_jobs(store: &JsonStore, fetcher: &dyn SourceFetcher) -> DiscoverReport {
    let settings = store.load().settings;
    match fetcher.fetch(settings.github_token.as_deref()).await {
        Ok(document) => ingest_document(store, &document.markdown, &document.sha),
        Err(e) => {
            warn!("source fetch failed: {e}");
            DiscoverReport::failed(e.to_string())
        }
    }
}

/// Runs extraction against the store's seen ledger and appends whatever is
/// new, recording the batch in the activity log.
pub fn ingest_document(store: &JsonStore, markdown: &str, sha: &str) -> DiscoverReport {
    let data = store.load();
    let existing: HashSet<String> = data.jobs_seen.iter().map(|row| row.id.clone()).collect();

    let extraction = match extract_jobs(markdown, &existing, sha, Utc::now()) {
        Ok(extraction) => extraction,
        Err(e) => {
            warn!("ingestion rejected: {e}");
            return DiscoverReport::failed(e.to_string());
        }
    };

    let count = extraction.discovered_count;
    if count == 0 {
        debug!("source document contained no new jobs");
        return DiscoverReport {
            new_jobs_count: 0,
            error: None,
        };
    }

    store.update(|data| {
        data.jobs_seen.extend(extraction.seen);
        data.jobs_table.extend(extraction.jobs);
        data.activity_log.insert(
            0,
            ActivityEntry::new(
                ActivityAction::JobDiscovered,
                None,
                format!("Found {count} new jobs"),
                ActivityStatus::Success,
            ),
        );
    });

    info!("discovered {count} new jobs");
    DiscoverReport {
        new_jobs_count: count,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    const LISTING: &str = "\
# Summer Internships

Some introductory prose.

| Company | Role | Location |
| --- |
| [Acme](https://acme.com) | SWE Intern | NYC | https://acme.com/apply | 2025-01-01 |
| Globex | Data Intern | Austin, TX | [Apply](https://globex.com/apply) |
| Initech | PM Intern | Remote |
";

    #[test]
    fn test_identity_hash_matches_known_vector() {
        // sha256("acme-swe intern-nyc")
        assert_eq!(
            job_identity("Acme", "SWE Intern", "NYC"),
            "8814beb22c0adcc44c83e9704902d47f97dfe29213865cd3074f06fb48c03a87"
        );
    }

    #[test]
    fn test_identity_is_case_insensitive() {
        assert_eq!(
            job_identity("ACME", "SWE INTERN", "nyc"),
            job_identity("Acme", "SWE Intern", "NYC")
        );
    }

    #[test]
    fn test_identity_ignores_url_and_date() {
        let empty = HashSet::new();
        let now = Utc::now();
        let a = extract_jobs(
            "| Company | Role | Location |\n| --- |\n| Acme | SWE Intern | NYC | https://a.com/x | 2025-01-01 |",
            &empty,
            "sha-a",
            now,
        )
        .unwrap();
        let b = extract_jobs(
            "| Company | Role | Location |\n| --- |\n| Acme | SWE Intern | NYC | https://b.com/y | 2024-06-30 |",
            &empty,
            "sha-b",
            now,
        )
        .unwrap();
        assert_eq!(a.jobs[0].id, b.jobs[0].id);
    }

    #[test]
    fn test_identity_changes_with_core_fields() {
        let base = job_identity("Acme", "SWE Intern", "NYC");
        assert_ne!(job_identity("Acme Inc", "SWE Intern", "NYC"), base);
        assert_ne!(job_identity("Acme", "ML Intern", "NYC"), base);
        assert_ne!(job_identity("Acme", "SWE Intern", "SF"), base);
    }

    #[test]
    fn test_extract_end_to_end_listing() {
        let extraction = extract_jobs(LISTING, &HashSet::new(), "rev1", Utc::now()).unwrap();

        // Initech has no application link and is dropped silently.
        assert_eq!(extraction.discovered_count, 2);
        assert_eq!(extraction.seen.len(), 2);
        assert_eq!(extraction.jobs.len(), 2);

        let acme = &extraction.jobs[0];
        assert_eq!(acme.company, "Acme");
        assert_eq!(acme.role, "SWE Intern");
        assert_eq!(acme.location, "NYC");
        assert_eq!(acme.url, "https://acme.com/apply");
        assert_eq!(acme.date_posted, "2025-01-01");
        assert_eq!(acme.status, JobStatus::New);
        assert_eq!(acme.created_at, acme.updated_at);

        let globex = &extraction.jobs[1];
        assert_eq!(globex.url, "https://globex.com/apply");
        assert_eq!(extraction.seen[1].sha, "rev1");
    }

    #[test]
    fn test_seen_and_job_share_identity() {
        let extraction = extract_jobs(LISTING, &HashSet::new(), "rev1", Utc::now()).unwrap();
        for (seen, job) in extraction.seen.iter().zip(&extraction.jobs) {
            assert_eq!(seen.id, job.id);
        }
    }

    #[test]
    fn test_extract_is_idempotent() {
        let first = extract_jobs(LISTING, &HashSet::new(), "rev1", Utc::now()).unwrap();
        let ids: HashSet<String> = first.seen.iter().map(|row| row.id.clone()).collect();

        let second = extract_jobs(LISTING, &ids, "rev2", Utc::now()).unwrap();
        assert_eq!(second.discovered_count, 0);
        assert!(second.jobs.is_empty());
    }

    #[test]
    fn test_superset_document_yields_exactly_new_rows() {
        let first = extract_jobs(LISTING, &HashSet::new(), "rev1", Utc::now()).unwrap();
        let ids: HashSet<String> = first.seen.iter().map(|row| row.id.clone()).collect();

        let superset = format!(
            "{LISTING}| Hooli | Infra Intern | SF | https://hooli.com/apply |\n"
        );
        let second = extract_jobs(&superset, &ids, "rev2", Utc::now()).unwrap();
        assert_eq!(second.discovered_count, 1);
        assert_eq!(second.jobs[0].company, "Hooli");
    }

    #[test]
    fn test_duplicate_rows_within_document_collapse() {
        let doc = "\
| Company | Role | Location |
| --- |
| Acme | SWE Intern | NYC | https://acme.com/apply |
| Acme | SWE Intern | NYC | https://acme.com/other |
";
        let extraction = extract_jobs(doc, &HashSet::new(), "rev1", Utc::now()).unwrap();
        assert_eq!(extraction.discovered_count, 1);
    }

    #[test]
    fn test_document_without_table_is_zero_rows_success() {
        let extraction =
            extract_jobs("# Nothing here\nJust prose.\n", &HashSet::new(), "rev1", Utc::now())
                .unwrap();
        assert_eq!(extraction.discovered_count, 0);
    }

    #[test]
    fn test_reordered_header_fails_whole_ingestion() {
        let doc = "\
| Role | Company | Location |
| --- |
| SWE Intern | Acme | NYC | https://acme.com/apply |
";
        let err = extract_jobs(doc, &HashSet::new(), "rev1", Utc::now()).unwrap_err();
        assert!(matches!(err, ScrapeError::UnrecognizedSchema { .. }));
    }

    #[test]
    fn test_missing_date_defaults_to_discovery_time() {
        let now = Utc::now();
        let doc = "\
| Company | Role | Location |
| --- |
| Acme | SWE Intern | NYC | https://acme.com/apply |
";
        let extraction = extract_jobs(doc, &HashSet::new(), "rev1", now).unwrap();
        assert_eq!(extraction.jobs[0].date_posted, now.to_rfc3339());
    }

    #[test]
    fn test_ingest_document_appends_and_logs() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("db.json"));

        let report = ingest_document(&store, LISTING, "rev1");
        assert_eq!(report.new_jobs_count, 2);
        assert!(report.error.is_none());

        let data = store.load();
        assert_eq!(data.jobs_seen.len(), 2);
        assert_eq!(data.jobs_table.len(), 2);
        assert_eq!(data.activity_log.len(), 1);
        assert_eq!(data.activity_log[0].action, ActivityAction::JobDiscovered);
        assert_eq!(data.activity_log[0].details, "Found 2 new jobs");
    }

    #[test]
    fn test_ingest_document_twice_adds_nothing() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("db.json"));

        ingest_document(&store, LISTING, "rev1");
        let report = ingest_document(&store, LISTING, "rev2");
        assert_eq!(report.new_jobs_count, 0);

        let data = store.load();
        assert_eq!(data.jobs_table.len(), 2);
        // No batch entry for an empty run.
        assert_eq!(data.activity_log.len(), 1);
    }

    #[test]
    fn test_ingest_reports_schema_error_without_raising() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("db.json"));

        let report = ingest_document(
            &store,
            "| Role | Company | Location |\n| --- |\n",
            "rev1",
        );
        assert_eq!(report.new_jobs_count, 0);
        assert!(report.error.unwrap().contains("unrecognized table schema"));
        assert!(store.load().jobs_table.is_empty());
    }
}
