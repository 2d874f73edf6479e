mod config;
mod errors;
mod llm_client;
mod models;
mod pipeline;
mod routes;
mod scrape;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::pipeline::analyze::{AnthropicExtractor, HttpPostingFetcher};
use crate::pipeline::compile::LatexOnlineCompiler;
use crate::pipeline::tailor::AnthropicTailor;
use crate::routes::build_router;
use crate::scrape::source::GitHubSource;
use crate::state::AppState;
use crate::store::JsonStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AutoApply API v{}", env!("CARGO_PKG_VERSION"));

    // The whole aggregate lives in one JSON document on disk.
    let store = JsonStore::new(&config.data_path);
    store.init();
    info!("State document at {}", config.data_path.display());

    let llm = LlmClient::new();
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        store,
        source: Arc::new(GitHubSource::new()),
        postings: Arc::new(HttpPostingFetcher::new()),
        extractor: Arc::new(AnthropicExtractor::new(llm.clone())),
        tailor: Arc::new(AnthropicTailor::new(llm)),
        compiler: Arc::new(LatexOnlineCompiler::new()),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // the browser UI's origin is not fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
