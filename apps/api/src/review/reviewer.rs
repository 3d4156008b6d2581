//! Review pipeline: extract text → render template → generate → parse.

use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::llm_client::CompletionRequest;
use crate::review::parser::FeedbackRecord;
use crate::review::prompts::REVIEW_SYSTEM;
use crate::state::AppState;

/// Runs the full review for one uploaded document.
///
/// Extraction and generation failures propagate; a reply the parser cannot
/// make sense of still produces a (possibly all-empty) record.
pub async fn review_resume(state: &AppState, document: &[u8]) -> Result<FeedbackRecord, AppError> {
    let resume_text = state.extractor.extract(document).await?;
    if resume_text.trim().is_empty() {
        warn!("Uploaded document has no extractable text");
    }

    let prompt = state.template.render(&resume_text);
    debug!(
        "Requesting feedback with template '{}' ({} prompt chars)",
        state.template.name(),
        prompt.chars().count()
    );

    let reply = state
        .generator
        .complete(CompletionRequest {
            system: REVIEW_SYSTEM,
            prompt: &prompt,
        })
        .await?;

    let record = state.parser.parse(&reply);
    info!(
        "Parsed feedback: {}/8 fields populated, {} strengths, {} weaknesses",
        record.populated_fields(),
        record.strengths.len(),
        record.weaknesses.len()
    );

    Ok(record)
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Stub collaborators shared by the reviewer and handler tests.

    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::config::Config;
    use crate::llm_client::{CompletionRequest, LlmError, SamplingConfig, TextGenerator};
    use crate::review::extract::{DocumentExtractor, ExtractionError};
    use crate::review::parser::FeedbackParser;
    use crate::review::prompts::FeedbackTemplate;
    use crate::state::AppState;

    /// Returns the upload bytes as UTF-8 text.
    pub struct EchoExtractor;

    #[async_trait]
    impl DocumentExtractor for EchoExtractor {
        async fn extract(&self, document: &[u8]) -> Result<String, ExtractionError> {
            Ok(String::from_utf8_lossy(document).into_owned())
        }
    }

    /// Replies with a canned completion and records the prompts it saw.
    pub struct CannedGenerator {
        pub reply: Result<String, fn() -> LlmError>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl CannedGenerator {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(error: fn() -> LlmError) -> Self {
            Self {
                reply: Err(error),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
            self.prompts
                .lock()
                .unwrap()
                .push(request.prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    pub fn test_config() -> Config {
        Config {
            openai_api_key: "test-key".to_string(),
            openai_base_url: "http://localhost:0/v1".to_string(),
            openai_model: "gpt-3.5-turbo".to_string(),
            sampling: SamplingConfig::default(),
            llm_timeout: Duration::from_secs(5),
            llm_max_concurrency: 1,
            feedback_template: FeedbackTemplate::Classic,
            section_spec_path: None,
            max_upload_bytes: 64 * 1024,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }

    pub fn test_state(generator: Arc<CannedGenerator>) -> AppState {
        let template = FeedbackTemplate::Classic;
        AppState {
            generator,
            extractor: Arc::new(EchoExtractor),
            parser: FeedbackParser::new(Arc::new(template.section_spec())),
            template,
            config: test_config(),
        }
    }
}
