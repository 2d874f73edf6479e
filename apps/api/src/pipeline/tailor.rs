//! Tailoring collaborator — rewrites the master LaTeX résumé against an
//! analysis payload and drafts a cover letter.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AppError;
use crate::llm_client::{strip_fences, LlmClient};
use crate::models::job::Job;
use crate::models::profile::{MasterResume, UserProfile};
use crate::pipeline::prompts::{
    COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM, TAILOR_PROMPT_TEMPLATE, TAILOR_SYSTEM,
};

#[async_trait]
pub trait DocumentTailor: Send + Sync {
    /// Returns the complete tailored LaTeX source.
    async fn tailor_resume(
        &self,
        api_key: &str,
        analysis: &Value,
        resume: &MasterResume,
    ) -> Result<String, AppError>;

    /// Returns plain cover-letter text.
    async fn draft_cover_letter(
        &self,
        api_key: &str,
        analysis: &Value,
        profile: &UserProfile,
        job: &Job,
    ) -> Result<String, AppError>;
}

pub struct AnthropicTailor {
    llm: LlmClient,
}

impl AnthropicTailor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl DocumentTailor for AnthropicTailor {
    async fn tailor_resume(
        &self,
        api_key: &str,
        analysis: &Value,
        resume: &MasterResume,
    ) -> Result<String, AppError> {
        let analysis_json = serde_json::to_string_pretty(analysis)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to serialize analysis: {e}")))?;
        let prompt = TAILOR_PROMPT_TEMPLATE
            .replace("{latex_source}", &resume.latex_source)
            .replace("{analysis_json}", &analysis_json)
            .replace("{skills}", &technical_skills(analysis));

        let response = self
            .llm
            .call(api_key, &prompt, TAILOR_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Resume tailoring failed: {e}")))?;
        let text = response
            .text()
            .ok_or_else(|| AppError::Llm("LLM returned empty content".to_string()))?;

        // The model sometimes wraps the file in a code fence anyway.
        Ok(strip_fences(text, "latex").to_string())
    }

    async fn draft_cover_letter(
        &self,
        api_key: &str,
        analysis: &Value,
        profile: &UserProfile,
        job: &Job,
    ) -> Result<String, AppError> {
        let analysis_json = serde_json::to_string_pretty(analysis)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to serialize analysis: {e}")))?;
        let profile_json = serde_json::to_string_pretty(profile)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to serialize profile: {e}")))?;
        let prompt = COVER_LETTER_PROMPT_TEMPLATE
            .replace("{company}", &job.company)
            .replace("{role}", &job.role)
            .replace("{full_name}", &profile.personal_info.full_name)
            .replace("{analysis_json}", &analysis_json)
            .replace("{profile_json}", &profile_json);

        let response = self
            .llm
            .call(api_key, &prompt, COVER_LETTER_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Cover letter drafting failed: {e}")))?;
        let text = response
            .text()
            .ok_or_else(|| AppError::Llm("LLM returned empty content".to_string()))?;
        Ok(text.trim().to_string())
    }
}

/// Flattens `technical_skills` out of the analysis payload for the prompt.
/// The payload is opaque to the core, so a missing or oddly shaped field
/// just yields an empty list.
fn technical_skills(analysis: &Value) -> String {
    analysis
        .get("technical_skills")
        .and_then(|v| v.as_array())
        .map(|skills| {
            skills
                .iter()
                .filter_map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_technical_skills_joined() {
        let analysis = json!({"technical_skills": ["Rust", "Python", "AWS"]});
        assert_eq!(technical_skills(&analysis), "Rust, Python, AWS");
    }

    #[test]
    fn test_technical_skills_missing_field_is_empty() {
        assert_eq!(technical_skills(&json!({})), "");
    }

    #[test]
    fn test_technical_skills_ignores_non_string_entries() {
        let analysis = json!({"technical_skills": ["Rust", 42, null, "Go"]});
        assert_eq!(technical_skills(&analysis), "Rust, Go");
    }

    #[test]
    fn test_tailor_prompt_placeholders_resolve() {
        let prompt = TAILOR_PROMPT_TEMPLATE
            .replace("{latex_source}", "\\documentclass{article}")
            .replace("{analysis_json}", "{}")
            .replace("{skills}", "Rust");
        assert!(prompt.contains("\\documentclass{article}"));
        assert!(!prompt.contains("{latex_source}"));
        assert!(!prompt.contains("{analysis_json}"));
        assert!(!prompt.contains("{skills}"));
    }
}
