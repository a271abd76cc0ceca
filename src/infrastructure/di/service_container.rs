//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{AnalysisService, DocumentService};
use crate::config::Settings;
use crate::infrastructure::gemini::GeminiClient;
use crate::infrastructure::pdf::LopdfExtractor;
use crate::infrastructure::traits::{FileSystem, LanguageModel, PdfTextExtractor, RealFileSystem};

/// Container holding the I/O implementations services are built from.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Language model used for document analysis
    pub model: Arc<dyn LanguageModel>,

    /// PDF text extraction
    pub pdf: Arc<dyn PdfTextExtractor>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let model = Arc::new(GeminiClient::new(&settings));
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            model,
            Arc::new(LopdfExtractor),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        model: Arc<dyn LanguageModel>,
        pdf: Arc<dyn PdfTextExtractor>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            model,
            pdf,
        }
    }

    pub fn analysis_service(&self) -> AnalysisService {
        AnalysisService::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.model),
            Arc::clone(&self.pdf),
            self.settings.max_upload_bytes,
        )
    }

    pub fn document_service(&self) -> DocumentService {
        DocumentService::new(Arc::clone(&self.fs))
    }
}
