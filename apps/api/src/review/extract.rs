//! Document text extraction.
//!
//! Uploads are written to a uniquely named temp file for the duration of one
//! extraction; the file is removed when the guard drops, on success or failure.

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to stage upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unreadable document: {0}")]
    Unreadable(String),

    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Turns an uploaded document into plain text. An empty string means the
/// document had no extractable text, which is not an error.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, document: &[u8]) -> Result<String, ExtractionError>;
}

/// PDF extractor backed by `pdf-extract`.
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    staging_dir: PathBuf,
}

impl PdfExtractor {
    /// Stages uploads in the system temp directory.
    pub fn new() -> Self {
        Self::with_staging_dir(std::env::temp_dir())
    }

    pub fn with_staging_dir(staging_dir: PathBuf) -> Self {
        Self { staging_dir }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract(&self, document: &[u8]) -> Result<String, ExtractionError> {
        let mut staged = tempfile::Builder::new()
            .prefix("resume-review-")
            .suffix(".pdf")
            .tempfile_in(&self.staging_dir)?;
        staged.write_all(document)?;
        staged.flush()?;

        // pdf-extract is synchronous and CPU-bound.
        let text = tokio::task::spawn_blocking(move || {
            let result = pdf_extract::extract_text(staged.path())
                .map_err(|e| ExtractionError::Unreadable(e.to_string()));
            drop(staged);
            result
        })
        .await??;

        debug!(
            "Extracted {} chars from {} byte document",
            text.chars().count(),
            document.len()
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    /// Single-page PDF showing "Hello Resume" in Helvetica.
    fn one_line_pdf() -> Vec<u8> {
        let content = "BT /F1 12 Tf 72 712 Td (Hello Resume) Tj ET";
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
             /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
        }
        let xref = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
        pdf.push_str("0000000000 65535 f \n");
        for offset in offsets {
            pdf.push_str(&format!("{offset:010} 00000 n \n"));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%EOF\n",
            objects.len() + 1
        ));
        pdf.into_bytes()
    }

    fn staged_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }

    #[tokio::test]
    async fn test_non_pdf_bytes_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = PdfExtractor::with_staging_dir(dir.path().to_path_buf());

        let result = extractor
            .extract(b"plain text, definitely not a PDF")
            .await;

        assert!(result.is_err());
        assert!(staged_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_staged_file_removed_after_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = PdfExtractor::with_staging_dir(dir.path().to_path_buf());

        let text = extractor.extract(&one_line_pdf()).await.unwrap();

        assert!(text.contains("Hello"), "extracted: {text:?}");
        assert!(staged_files(dir.path()).is_empty());
    }

    #[test]
    fn test_default_stages_in_system_temp_dir() {
        assert_eq!(PdfExtractor::default().staging_dir, std::env::temp_dir());
    }
}
