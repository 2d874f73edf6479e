//! Persisted Store — one JSON document on disk holding the entire `AppData`
//! aggregate.
//!
//! Every read loads the whole document and every mutation writes it back
//! wholesale; the only finer-grained primitive is `update_list_item`, a keyed
//! shallow merge onto a single list row. Loading degrades to defaults when
//! the document is missing or unreadable, and a failed write drops that one
//! update without corrupting prior state — neither path ever raises into a
//! handler.
//!
//! The store is an explicit handle carried in `AppState`, not a global:
//! tests construct one on a temp path and inject it.

pub mod handlers;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::activity::{ActivityAction, ActivityEntry, ActivityStatus};
use crate::models::{AppData, Keyed};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("snapshot is not a JSON object")]
    NotAnObject,

    #[error("snapshot is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("snapshot field has the wrong shape: {0}")]
    Shape(String),
}

/// The three list sequences addressable by keyed updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKey {
    JobsSeen,
    JobsTable,
    ActivityLog,
}

/// File-backed store for the `AppData` aggregate. Cheap to clone; clones
/// share the write lock.
#[derive(Clone)]
pub struct JsonStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process. Same-item
    // races across cycles remain last-write-wins.
    lock: Arc<Mutex<()>>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the default aggregate if no document exists yet.
    pub fn init(&self) {
        if !self.path.exists() {
            self.save(&AppData::default());
        }
    }

    /// Reads the persisted document. A missing or unreadable document yields
    /// the default aggregate; a parse failure is logged, never raised.
    /// Present documents are shallow-merged over the defaults at the top
    /// level via the `#[serde(default)]` attributes on `AppData`.
    pub fn load(&self) -> AppData {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return AppData::default(),
            Err(e) => {
                warn!("failed to read state document {}: {e}", self.path.display());
                return AppData::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(e) => {
                warn!("state document is unreadable, falling back to defaults: {e}");
                AppData::default()
            }
        }
    }

    /// Serializes and persists the whole aggregate. The write goes through a
    /// temp file + rename so no torn document is ever observable. A write
    /// failure loses only this update, so it is logged and swallowed.
    pub fn save(&self, data: &AppData) {
        let serialized = match serde_json::to_string_pretty(data) {
            Ok(s) => s,
            Err(e) => {
                warn!("failed to serialize state document: {e}");
                return;
            }
        };
        if let Err(e) = self.write_atomic(&serialized) {
            warn!("failed to write state document {}: {e}", self.path.display());
        }
    }

    /// Load, apply the caller's mutation to the whole aggregate, save.
    /// Whole-field replacement goes through here.
    pub fn update<F: FnOnce(&mut AppData)>(&self, apply: F) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut data = self.load();
        apply(&mut data);
        self.save(&data);
    }

    /// Shallow-merges `patch` onto the first element of the named list whose
    /// id equals `item_id`, then writes the aggregate back. No matching
    /// element is a silent no-op that leaves the persisted bytes unchanged —
    /// callers must not assume the target still exists.
    pub fn update_list_item(&self, list: ListKey, item_id: &str, patch: &Value) {
        let Some(fields) = patch.as_object() else {
            warn!("list patch for {item_id} is not a JSON object, ignoring");
            return;
        };
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut data = self.load();
        let changed = match list {
            ListKey::JobsSeen => apply_patch(&mut data.jobs_seen, item_id, fields),
            ListKey::JobsTable => apply_patch(&mut data.jobs_table, item_id, fields),
            ListKey::ActivityLog => apply_patch(&mut data.activity_log, item_id, fields),
        };
        if changed {
            self.save(&data);
        }
    }

    /// Prepends an audit entry (newest first).
    pub fn log_activity(
        &self,
        action: ActivityAction,
        job_id: Option<String>,
        details: impl Into<String>,
        status: ActivityStatus,
    ) {
        let entry = ActivityEntry::new(action, job_id, details, status);
        self.update(|data| data.activity_log.insert(0, entry));
    }

    /// Full-aggregate snapshot as pretty-printed JSON.
    pub fn export(&self) -> String {
        serde_json::to_string_pretty(&self.load()).unwrap_or_else(|e| {
            warn!("failed to serialize snapshot: {e}");
            String::from("{}")
        })
    }

    /// Restores a snapshot produced by `export`. The document must parse
    /// and match the aggregate shape — anything else is rejected with a
    /// specific validation error instead of being accepted silently.
    pub fn import(&self, raw: &str) -> Result<(), ImportError> {
        let value: Value = serde_json::from_str(raw)?;
        let data = validate_snapshot(value)?;
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.save(&data);
        Ok(())
    }

    /// Discards persisted state and rewrites the default aggregate.
    pub fn reset(&self) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.save(&AppData::default());
    }

    fn write_atomic(&self, serialized: &str) -> std::io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(serialized.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Checks a parsed snapshot against the aggregate schema before accepting
/// it: all top-level keys must be present and every present field must fit
/// the declared row shapes.
pub fn validate_snapshot(value: Value) -> Result<AppData, ImportError> {
    let map = value.as_object().ok_or(ImportError::NotAnObject)?;
    for key in AppData::REQUIRED_KEYS {
        if !map.contains_key(key) {
            return Err(ImportError::MissingField(key));
        }
    }
    serde_json::from_value(value).map_err(|e| ImportError::Shape(e.to_string()))
}

fn apply_patch<T>(list: &mut [T], item_id: &str, fields: &serde_json::Map<String, Value>) -> bool
where
    T: Serialize + DeserializeOwned + Keyed,
{
    let Some(slot) = list.iter_mut().find(|item| item.key() == item_id) else {
        debug!("no list item with id {item_id}, skipping update");
        return false;
    };
    let mut value = match serde_json::to_value(&*slot) {
        Ok(v) => v,
        Err(e) => {
            warn!("failed to serialize list item {item_id}: {e}");
            return false;
        }
    };
    if let Some(target) = value.as_object_mut() {
        for (k, v) in fields {
            target.insert(k.clone(), v.clone());
        }
    }
    match serde_json::from_value(value) {
        Ok(updated) => {
            *slot = updated;
            true
        }
        Err(e) => {
            warn!("patch for {item_id} does not fit the row shape, ignoring: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;
    use tempfile::tempdir;

    use super::*;
    use crate::models::job::{Job, JobStatus};

    fn store_in(dir: &tempfile::TempDir) -> JsonStore {
        JsonStore::new(dir.path().join("autoapply_db_v1.json"))
    }

    fn seeded_job(id: &str) -> Job {
        let now = Utc::now();
        Job {
            id: id.to_string(),
            company: "Acme".into(),
            role: "SWE Intern".into(),
            location: "NYC".into(),
            date_posted: "2025-01-01".into(),
            url: "https://acme.com/apply".into(),
            status: JobStatus::New,
            analysis: None,
            resume_latex: None,
            resume_pdf_blob: None,
            cover_letter: None,
            application_data: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_load_missing_document_returns_defaults() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let data = store.load();
        assert!(data.jobs_seen.is_empty());
        assert!(data.jobs_table.is_empty());
        assert_eq!(data.settings.rate_limit_delay, 3000);
    }

    #[test]
    fn test_load_corrupt_document_returns_defaults() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{ this is not json").unwrap();
        let data = store.load();
        assert!(data.jobs_table.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.update(|data| {
            data.jobs_table.push(seeded_job("j1"));
            data.settings.rate_limit_delay = 1234;
        });
        let data = store.load();
        assert_eq!(data.jobs_table.len(), 1);
        assert_eq!(data.jobs_table[0].id, "j1");
        assert_eq!(data.settings.rate_limit_delay, 1234);
    }

    #[test]
    fn test_load_merges_defaults_into_partial_document() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        // A document from an older build: only one top-level field present.
        let partial = json!({
            "jobs_table": [serde_json::to_value(seeded_job("j1")).unwrap()]
        });
        std::fs::write(store.path(), serde_json::to_string(&partial).unwrap()).unwrap();

        let data = store.load();
        assert_eq!(data.jobs_table.len(), 1);
        assert_eq!(data.jobs_table[0].company, "Acme");
        // Missing fields come back at their defaults.
        assert_eq!(data.settings.auto_check_time, "09:00");
        assert!(data.activity_log.is_empty());
        assert_eq!(data.user_profile.personal_info.full_name, "");
    }

    #[test]
    fn test_update_list_item_merges_patch_fields() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.update(|data| data.jobs_table.push(seeded_job("j1")));

        store.update_list_item(
            ListKey::JobsTable,
            "j1",
            &json!({"status": "analyzing", "error": "boom"}),
        );

        let job = &store.load().jobs_table[0];
        assert_eq!(job.status, JobStatus::Analyzing);
        assert_eq!(job.error.as_deref(), Some("boom"));
        // Untouched fields survive the merge.
        assert_eq!(job.company, "Acme");
        assert_eq!(job.url, "https://acme.com/apply");
    }

    #[test]
    fn test_update_list_item_missing_id_is_byte_for_byte_noop() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.update(|data| data.jobs_table.push(seeded_job("j1")));

        let before = std::fs::read_to_string(store.path()).unwrap();
        store.update_list_item(ListKey::JobsTable, "nonexistent-id", &json!({"status": "failed"}));
        let after = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_update_list_item_rejects_patch_that_breaks_row_shape() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.update(|data| data.jobs_table.push(seeded_job("j1")));

        let before = std::fs::read_to_string(store.path()).unwrap();
        store.update_list_item(ListKey::JobsTable, "j1", &json!({"status": 42}));
        let after = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_export_import_round_trips() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.update(|data| {
            data.jobs_table.push(seeded_job("j1"));
            data.settings.preferred_locations = vec!["NYC".into(), "Remote".into()];
        });

        let snapshot = store.export();
        let restored = JsonStore::new(dir.path().join("restored.json"));
        restored.import(&snapshot).unwrap();

        assert_eq!(store.export(), restored.export());
    }

    #[test]
    fn test_import_rejects_non_object() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let err = store.import("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, ImportError::NotAnObject));
    }

    #[test]
    fn test_import_rejects_missing_top_level_field() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let err = store.import("{}").unwrap_err();
        assert!(matches!(err, ImportError::MissingField("jobs_seen")));
    }

    #[test]
    fn test_import_rejects_wrong_field_shape() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let mut snapshot: Value = serde_json::from_str(&store.export()).unwrap();
        snapshot["jobs_seen"] = json!("not a list");
        let err = store.import(&snapshot.to_string()).unwrap_err();
        assert!(matches!(err, ImportError::Shape(_)));
    }

    #[test]
    fn test_import_rejects_unparsable_text() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let err = store.import("not json at all").unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.update(|data| data.jobs_table.push(seeded_job("j1")));
        store.reset();
        assert!(store.load().jobs_table.is_empty());
    }

    #[test]
    fn test_log_activity_prepends_newest_first() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.log_activity(ActivityAction::UserAction, None, "first", ActivityStatus::Success);
        store.log_activity(
            ActivityAction::JobDiscovered,
            None,
            "second",
            ActivityStatus::Success,
        );

        let log = store.load().activity_log;
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].details, "second");
        assert_eq!(log[1].details, "first");
    }
}
