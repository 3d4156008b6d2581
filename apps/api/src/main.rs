mod config;
mod errors;
mod llm_client;
mod review;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::review::extract::PdfExtractor;
use crate::review::parser::FeedbackParser;
use crate::review::sections::SectionSpec;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Review API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client (one instance shared by every request)
    let llm = LlmClient::new(config.llm_settings())?;
    info!(
        "LLM client initialized (model: {}, max concurrency: {})",
        llm.model(),
        config.llm_max_concurrency
    );

    // Section spec: template default unless a spec file overrides it
    let template = config.feedback_template;
    let spec = match &config.section_spec_path {
        Some(path) => {
            info!("Loading section spec from {}", path.display());
            SectionSpec::from_json_file(path)?
        }
        None => template.section_spec(),
    };
    info!(
        "Feedback template '{}' with {} recognized sections",
        template.name(),
        spec.sections.len()
    );

    let state = AppState {
        generator: Arc::new(llm),
        extractor: Arc::new(PdfExtractor::new()),
        parser: FeedbackParser::new(Arc::new(spec)),
        template,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
