use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub university: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub graduation_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkAuthorization {
    #[serde(default)]
    pub us_citizen: bool,
    #[serde(default)]
    pub require_sponsorship: bool,
}

/// Voluntary self-identification answers some application portals ask for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Demographics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethnicity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub veteran_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disability_status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub education: Education,
    #[serde(default)]
    pub work_authorization: WorkAuthorization,
    #[serde(default)]
    pub demographics: Demographics,
    /// Saved answers to recurring free-form portal questions, keyed by the
    /// question text.
    #[serde(default)]
    pub custom_responses: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeSections {
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub projects: String,
    #[serde(default)]
    pub skills: String,
}

/// The master LaTeX résumé every tailored variant is derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterResume {
    #[serde(default)]
    pub latex_source: String,
    #[serde(default)]
    pub sections: ResumeSections,
    #[serde(default = "Utc::now")]
    pub last_modified: DateTime<Utc>,
}

impl Default for MasterResume {
    fn default() -> Self {
        Self {
            latex_source: String::new(),
            sections: ResumeSections::default(),
            last_modified: Utc::now(),
        }
    }
}
