use serde::{Deserialize, Serialize};

fn default_rate_limit_delay() -> u64 {
    3000
}

fn default_auto_check_time() -> String {
    "09:00".to_string()
}

fn default_notification_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base politeness delay in milliseconds before fetching a posting.
    /// The actual delay adds a random jitter of up to the same amount.
    #[serde(default = "default_rate_limit_delay")]
    pub rate_limit_delay: u64,
    /// Stored for the settings UI. Nothing consumes these two fields —
    /// there is no background scheduler.
    #[serde(default)]
    pub auto_check_enabled: bool,
    #[serde(default = "default_auto_check_time")]
    pub auto_check_time: String,
    #[serde(default = "default_notification_enabled")]
    pub notification_enabled: bool,
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    /// Credential for the analysis/tailoring collaborator. Lives in the
    /// persisted document, not in process environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic_api_key: Option<String>,
    /// Optional token raising the GitHub API rate limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rate_limit_delay: default_rate_limit_delay(),
            auto_check_enabled: false,
            auto_check_time: default_auto_check_time(),
            notification_enabled: default_notification_enabled(),
            preferred_locations: Vec::new(),
            anthropic_api_key: None,
            github_token: None,
        }
    }
}
