use std::sync::Arc;

use crate::pipeline::analyze::{ContentExtractor, PostingFetcher};
use crate::pipeline::compile::DocumentCompiler;
use crate::pipeline::tailor::DocumentTailor;
use crate::scrape::source::SourceFetcher;
use crate::store::JsonStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. The store and every collaborator are explicit handles —
/// tests build an `AppState` around a temp-file store and canned
/// collaborators.
#[derive(Clone)]
pub struct AppState {
    pub store: JsonStore,
    pub source: Arc<dyn SourceFetcher>,
    pub postings: Arc<dyn PostingFetcher>,
    pub extractor: Arc<dyn ContentExtractor>,
    pub tailor: Arc<dyn DocumentTailor>,
    pub compiler: Arc<dyn DocumentCompiler>,
}
