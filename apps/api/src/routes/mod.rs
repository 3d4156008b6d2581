pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::review::handlers;
use crate::state::AppState;

/// Slack on top of the file limit for multipart boundaries and headers.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(handlers::handle_home))
        .route("/health", get(health::health_handler))
        .route("/analyze_resume", post(handlers::handle_analyze_resume))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::llm_client::LlmError;
    use crate::review::reviewer::test_support::{test_state, CannedGenerator};

    const BOUNDARY: &str = "X-RESUME-REVIEW-BOUNDARY";

    const REPLY: &str = "\
**Overall Rating:** 78/100
**Summary:** Solid experience, weak formatting.
**Strengths:**
1. Clear work history
2. Strong action verbs
**Weaknesses:**
- Inconsistent dates
**ATS Compatibility Analysis:** Score 60%, missing keywords.
";

    fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> String {
        let mut body = String::new();
        for (name, file_name, content) in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match file_name {
                Some(f) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                     Content-Type: application/pdf\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    fn upload(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze_resume")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_home() {
        let router = build_router(test_state(Arc::new(CannedGenerator::replying(""))));
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Resume Analyzer API Running"}));
    }

    #[tokio::test]
    async fn test_health() {
        let router = build_router(test_state(Arc::new(CannedGenerator::replying(""))));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_analyze_returns_structured_feedback() {
        let generator = Arc::new(CannedGenerator::replying(REPLY));
        let router = build_router(test_state(generator.clone()));
        let body = multipart_body(&[("resume", Some("cv.pdf"), "Jane Doe resume text")]);

        let (status, body) = send(router, upload(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "overall_rating": "78/100",
                "summary": "Solid experience, weak formatting.",
                "strengths": ["Clear work history", "Strong action verbs"],
                "weaknesses": ["Inconsistent dates"],
                "ats_analysis": "Score 60%, missing keywords.",
                "formatting_notes": "",
                "content_notes": "",
                "grammar_notes": ""
            })
        );
        assert!(generator.prompts.lock().unwrap()[0].contains("Jane Doe resume text"));
    }

    #[tokio::test]
    async fn test_analyze_ignores_other_parts() {
        let router = build_router(test_state(Arc::new(CannedGenerator::replying(REPLY))));
        let body = multipart_body(&[
            ("note", None, "hello"),
            ("resume", Some("cv.pdf"), "text"),
        ]);
        let (status, body) = send(router, upload(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overall_rating"], "78/100");
    }

    #[tokio::test]
    async fn test_missing_resume_part_is_400() {
        let generator = Arc::new(CannedGenerator::replying(REPLY));
        let router = build_router(test_state(generator.clone()));
        let body = multipart_body(&[("document", Some("cv.pdf"), "text")]);

        let (status, body) = send(router, upload(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "No file part in the request"}));
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_filename_is_400() {
        let router = build_router(test_state(Arc::new(CannedGenerator::replying(REPLY))));
        let body = multipart_body(&[("resume", Some(""), "text")]);
        let (status, body) = send(router, upload(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "No selected file"}));
    }

    #[tokio::test]
    async fn test_empty_file_is_400() {
        let generator = Arc::new(CannedGenerator::replying(REPLY));
        let router = build_router(test_state(generator.clone()));
        let body = multipart_body(&[("resume", Some("cv.pdf"), "")]);

        let (status, body) = send(router, upload(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Uploaded file is empty"}));
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_upload_is_413() {
        let router = build_router(test_state(Arc::new(CannedGenerator::replying(REPLY))));
        let big = "a".repeat(65 * 1024);
        let body = multipart_body(&[("resume", Some("cv.pdf"), big.as_str())]);
        let (status, body) = send(router, upload(body)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500() {
        let generator = Arc::new(CannedGenerator::failing(|| LlmError::Api {
            status: 503,
            message: "overloaded".to_string(),
        }));
        let router = build_router(test_state(generator));
        let body = multipart_body(&[("resume", Some("cv.pdf"), "text")]);
        let (status, body) = send(router, upload(body)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "An AI processing error occurred"}));
    }

    #[tokio::test]
    async fn test_unparseable_reply_returns_empty_record() {
        let router = build_router(test_state(Arc::new(CannedGenerator::replying(
            "Sorry, I can't help with that.",
        ))));
        let body = multipart_body(&[("resume", Some("cv.pdf"), "text")]);
        let (status, body) = send(router, upload(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "");
        assert_eq!(body["strengths"], json!([]));
    }
}
