use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Keyed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    JobDiscovered,
    JobAnalyzed,
    ResumeGenerated,
    ApplicationSubmitted,
    Error,
    UserAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Success,
    Failed,
    Pending,
}

/// Append-only audit record. Prepended to the log (newest first) and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub action: ActivityAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub details: String,
    pub status: ActivityStatus,
}

impl ActivityEntry {
    pub fn new(
        action: ActivityAction,
        job_id: Option<String>,
        details: impl Into<String>,
        status: ActivityStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            action,
            job_id,
            details: details.into(),
            status,
        }
    }
}

impl Keyed for ActivityEntry {
    fn key(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ActivityAction::JobDiscovered).unwrap(),
            r#""job_discovered""#
        );
        assert_eq!(
            serde_json::to_string(&ActivityAction::ApplicationSubmitted).unwrap(),
            r#""application_submitted""#
        );
    }

    #[test]
    fn test_entries_get_unique_ids() {
        let a = ActivityEntry::new(ActivityAction::UserAction, None, "x", ActivityStatus::Success);
        let b = ActivityEntry::new(ActivityAction::UserAction, None, "x", ActivityStatus::Success);
        assert_ne!(a.id, b.id);
    }
}
