use std::path::PathBuf;

use anyhow::{Context, Result};

/// Server configuration loaded from environment variables.
///
/// Collaborator credentials are deliberately not here: the Anthropic key and
/// GitHub token live in the persisted settings document and are supplied per
/// request to the services that need them.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            data_path: std::env::var("DATA_PATH")
                .unwrap_or_else(|_| "autoapply_db_v1.json".to_string())
                .into(),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
