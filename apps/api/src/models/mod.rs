// Persisted data model. Everything in this module serializes into the single
// JSON aggregate the store owns — field names are a compatibility contract
// with previously persisted documents.

pub mod activity;
pub mod job;
pub mod profile;
pub mod settings;

use serde::{Deserialize, Serialize};

use crate::models::activity::ActivityEntry;
use crate::models::job::{Job, SeenJob};
use crate::models::profile::{MasterResume, UserProfile};
use crate::models::settings::Settings;

/// The root aggregate: one instance per installation, read on every page
/// load, read-modify-written on every mutation.
///
/// Every top-level field carries `#[serde(default)]` so that documents
/// persisted by an older build load with newly introduced fields populated
/// from their defaults, while fields the document already has are taken
/// verbatim. There is no deep merge below the top level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default)]
    pub jobs_seen: Vec<SeenJob>,
    #[serde(default)]
    pub jobs_table: Vec<Job>,
    #[serde(default)]
    pub user_profile: UserProfile,
    #[serde(default)]
    pub master_resume: MasterResume,
    /// Newest first.
    #[serde(default)]
    pub activity_log: Vec<ActivityEntry>,
    #[serde(default)]
    pub settings: Settings,
}

impl AppData {
    /// Top-level keys a snapshot must carry to be accepted by import.
    pub const REQUIRED_KEYS: [&'static str; 6] = [
        "jobs_seen",
        "jobs_table",
        "user_profile",
        "master_resume",
        "activity_log",
        "settings",
    ];
}

/// Identity accessor for list rows addressed by the store's keyed updates.
pub trait Keyed {
    fn key(&self) -> String;
}
