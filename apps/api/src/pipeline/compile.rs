//! Compilation collaborator — LaTeX source to PDF bytes via LaTeX.Online.

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::AppError;

const COMPILE_URL: &str = "https://latexonline.cc/compile";

#[async_trait]
pub trait DocumentCompiler: Send + Sync {
    async fn compile(&self, latex_source: &str) -> Result<Bytes, AppError>;
}

pub struct LatexOnlineCompiler {
    client: reqwest::Client,
}

impl LatexOnlineCompiler {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for LatexOnlineCompiler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentCompiler for LatexOnlineCompiler {
    async fn compile(&self, latex_source: &str) -> Result<Bytes, AppError> {
        let response = self
            .client
            .post(COMPILE_URL)
            .form(&[("text", latex_source), ("command", "pdflatex")])
            .send()
            .await
            .map_err(|e| AppError::Compile(format!("compilation request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Compile(format!(
                "LaTeX compilation failed: {}",
                response.status()
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| AppError::Compile(format!("compiled artifact unreadable: {e}")))
    }
}
