use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::review::extract::DocumentExtractor;
use crate::review::parser::FeedbackParser;
use crate::review::prompts::FeedbackTemplate;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Production: `LlmClient`. Built once at startup.
    pub generator: Arc<dyn TextGenerator>,
    /// Production: `PdfExtractor`.
    pub extractor: Arc<dyn DocumentExtractor>,
    /// Paired with `template`; both come from the same revision unless a
    /// section spec file overrides the parser side.
    pub parser: FeedbackParser,
    pub template: FeedbackTemplate,
    pub config: Config,
}
