//! Analysis service
//!
//! Turns a document into a pyramid document through the language model.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::application::document::{load_document, DocumentSource};
use crate::application::ingest::parse_analysis;
use crate::application::prompt::build_prompt;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::PyramidDocument;
use crate::infrastructure::traits::{FileSystem, LanguageModel, PdfTextExtractor};

/// Readiness of the analysis backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub has_api_key: bool,
    pub message: String,
}

/// Service running document → prompt → model → validated pyramid.
pub struct AnalysisService {
    fs: Arc<dyn FileSystem>,
    model: Arc<dyn LanguageModel>,
    pdf: Arc<dyn PdfTextExtractor>,
    max_upload_bytes: u64,
}

impl AnalysisService {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        model: Arc<dyn LanguageModel>,
        pdf: Arc<dyn PdfTextExtractor>,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            fs,
            model,
            pdf,
            max_upload_bytes,
        }
    }

    /// Analyse a document.
    ///
    /// Input errors are reported before the model is contacted; model
    /// failures become [`ApplicationError::Analysis`] and unusable answers
    /// [`ApplicationError::MalformedResponse`].
    #[instrument(level = "debug", skip(self))]
    pub fn analyze(&self, source: &DocumentSource) -> ApplicationResult<PyramidDocument> {
        let document = load_document(
            self.fs.as_ref(),
            self.pdf.as_ref(),
            source,
            self.max_upload_bytes,
        )?;
        info!(
            "Analyzing document: {} ({} chars)",
            document.title,
            document.content.chars().count()
        );

        let answer = self
            .model
            .generate(&build_prompt(&document.content))
            .map_err(|source| ApplicationError::Analysis { source })?;
        debug!("model answer: {} bytes", answer.len());

        parse_analysis(&answer, &document.title)
    }

    pub fn health(&self) -> HealthStatus {
        let has_api_key = self.model.is_configured();
        HealthStatus {
            status: "ok".to_string(),
            has_api_key,
            message: if has_api_key {
                "Ready".to_string()
            } else {
                "Missing GEMINI_API_KEY environment variable".to_string()
            },
        }
    }
}
