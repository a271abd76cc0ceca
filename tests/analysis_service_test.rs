//! Tests for AnalysisService and the upload → pyramid session flow
//!
//! The language model is replaced by a canned responder so that no network
//! access is needed.

use std::error::Error as _;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;

use pyramid::application::document::{sample_source, DocumentSource, SAMPLE_TITLE};
use pyramid::application::error::SERVICE_HINT;
use pyramid::application::services::AnalysisService;
use pyramid::application::{ApplicationError, Session, Stage};
use pyramid::domain::{LayoutConfig, Level, ROOT_ID};
use pyramid::infrastructure::pdf::LopdfExtractor;
use pyramid::infrastructure::traits::{
    FileSystem, LanguageModel, ModelError, PdfError, PdfTextExtractor, RealFileSystem,
};

const VALID_RESPONSE: &str = r#"```json
{
  "title": "Mobile Strategy",
  "pyramid": {
    "id": "main",
    "level": 0,
    "label": "Main Message",
    "content": "Adopt mobile-first strategy",
    "children": [
      {
        "id": "arg-1",
        "level": 1,
        "label": "Usage",
        "content": "Users moved to mobile",
        "children": [
          { "id": "ev-1", "level": 2, "label": "Evidence", "content": "68% mobile" }
        ]
      },
      { "id": "arg-1", "level": 1, "label": "Market", "content": "Competitors moved" }
    ]
  }
}
```"#;

/// Language model answering every prompt with the same text.
struct CannedModel {
    answer: Result<String, String>,
    calls: AtomicUsize,
}

impl CannedModel {
    fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(answer.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }
}

impl LanguageModel for CannedModel {
    fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        assert!(prompt.contains("Minto Pyramid"));
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone().map_err(|message| ModelError::Status {
            status: 429,
            message,
        })
    }

    fn is_configured(&self) -> bool {
        self.answer.is_ok()
    }
}

struct FixedPdf(&'static str);

impl PdfTextExtractor for FixedPdf {
    fn extract_text(&self, _bytes: &[u8]) -> Result<String, PdfError> {
        Ok(self.0.to_string())
    }
}

fn service(model: Arc<CannedModel>) -> AnalysisService {
    AnalysisService::new(
        Arc::new(RealFileSystem),
        model,
        Arc::new(FixedPdf("Quarterly report text")),
        1024,
    )
}

// ============================================================
// AnalysisService::analyze()
// ============================================================

#[test]
fn given_valid_answer_when_analyzing_then_pyramid_is_sanitized() {
    // Arrange
    let model = CannedModel::answering(VALID_RESPONSE);
    let service = service(model.clone());

    // Act
    let document = service.analyze(&sample_source()).unwrap();

    // Assert
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    assert_eq!(document.title, "Mobile Strategy");
    let root = &document.pyramid;
    assert_eq!(root.id, ROOT_ID);
    assert_eq!(root.level, Level::MainMessage);
    assert_eq!(root.children.len(), 2);
    assert_ne!(root.children[0].id, root.children[1].id);
    assert_eq!(root.children[0].children[0].level, Level::Evidence);
}

#[test]
fn given_pdf_file_when_analyzing_then_title_from_file_stem() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("board-memo.pdf");
    std::fs::write(&path, b"%PDF-1.4 fake").unwrap();
    let answer = r#"{"pyramid": {"id": "x", "content": "Main"}}"#;

    let document = service(CannedModel::answering(answer))
        .analyze(&DocumentSource::File(path))
        .unwrap();

    assert_eq!(document.title, "board-memo");
    assert_eq!(document.pyramid.label, "Main Message");
}

#[test]
fn given_unreadable_pdf_when_analyzing_then_pdf_error_kept_as_source() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.pdf");
    std::fs::write(&path, b"not a pdf at all").unwrap();
    let model = CannedModel::answering(VALID_RESPONSE);
    let service = AnalysisService::new(
        Arc::new(RealFileSystem),
        model.clone(),
        Arc::new(LopdfExtractor),
        1024,
    );

    let err = service.analyze(&DocumentSource::File(path)).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(err
        .source()
        .and_then(|s| s.downcast_ref::<PdfError>())
        .is_some());
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[rstest]
#[case(DocumentSource::Text { title: None, content: "   \n ".into() })]
#[case(DocumentSource::File(PathBuf::from("/nonexistent/pyramid/input.txt")))]
fn given_unusable_input_when_analyzing_then_model_not_called(#[case] source: DocumentSource) {
    let model = CannedModel::answering(VALID_RESPONSE);

    let result = service(model.clone()).analyze(&source);

    assert!(matches!(
        result,
        Err(ApplicationError::EmptyDocument) | Err(ApplicationError::NoDocument)
    ));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn given_oversized_file_when_analyzing_then_too_large() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("big.txt");
    RealFileSystem.write(&path, &"x".repeat(2048)).unwrap();

    let result =
        service(CannedModel::answering(VALID_RESPONSE)).analyze(&DocumentSource::File(path));

    assert!(matches!(
        result,
        Err(ApplicationError::DocumentTooLarge { size: 2048, limit: 1024, .. })
    ));
}

#[test]
fn given_model_failure_when_analyzing_then_analysis_error_with_hint() {
    let err = service(CannedModel::failing("quota exceeded"))
        .analyze(&sample_source())
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("quota exceeded"));
    assert!(message.contains(SERVICE_HINT));
    let source = err.source().expect("model error kept as source");
    assert_eq!(source.to_string(), "model request failed (429): quota exceeded");
}

#[test]
fn given_non_json_answer_when_analyzing_then_malformed_with_raw_text() {
    let err = service(CannedModel::answering("Sorry, I cannot help with that."))
        .analyze(&sample_source())
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("Sorry, I cannot help with that."));
    assert!(message.contains(SERVICE_HINT));
    match err {
        ApplicationError::MalformedResponse { raw, .. } => {
            assert_eq!(raw, "Sorry, I cannot help with that.")
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================
// health()
// ============================================================

#[rstest]
#[case(CannedModel::answering("{}"), true, "Ready")]
#[case(
    CannedModel::failing("no key"),
    false,
    "Missing GEMINI_API_KEY environment variable"
)]
fn given_model_when_checking_health_then_reports_key_status(
    #[case] model: Arc<CannedModel>,
    #[case] has_key: bool,
    #[case] message: &str,
) {
    let health = service(model).health();
    assert_eq!(health.has_api_key, has_key);
    assert_eq!(health.message, message);
}

// ============================================================
// Session
// ============================================================

#[test]
fn given_successful_analysis_when_running_session_then_moves_to_mind_map() {
    let mut session = Session::new(LayoutConfig::default());
    assert_eq!(session.stage(), Stage::Upload);

    session
        .analyze(&service(CannedModel::answering(VALID_RESPONSE)), &sample_source())
        .unwrap();

    assert_eq!(session.stage(), Stage::MindMap);
    assert_eq!(session.title(), "Mobile Strategy");
    assert!(session.editor().layout().is_some());

    assert_eq!(session.show_slides().len(), 5);
    assert_eq!(session.stage(), Stage::Slides);
    assert!(session.select_slide(4));
    assert!(!session.select_slide(5));
    assert_eq!(session.current_slide().map(|s| s.title()), Some("Summary"));

    session.back_to_map();
    assert_eq!(session.stage(), Stage::MindMap);
}

#[test]
fn given_malformed_answer_when_running_session_then_store_stays_unloaded() {
    let mut session = Session::new(LayoutConfig::default());

    let err = session
        .analyze(&service(CannedModel::answering("not json")), &sample_source())
        .unwrap_err();

    assert!(err.to_string().contains("not json"));
    assert!(!session.editor().store().is_loaded());
    assert_eq!(session.stage(), Stage::Upload);
}

#[test]
fn given_loaded_pyramid_when_next_analysis_fails_then_previous_pyramid_kept() {
    let mut session = Session::new(LayoutConfig::default());
    session
        .analyze(&service(CannedModel::answering(VALID_RESPONSE)), &sample_source())
        .unwrap();
    let before = session.editor().tree().unwrap().to_node();

    let result = session.analyze(&service(CannedModel::failing("timeout")), &sample_source());

    assert!(result.is_err());
    assert_eq!(session.editor().tree().unwrap().to_node(), before);
    assert_eq!(session.title(), "Mobile Strategy");
}

#[test]
fn given_sample_source_when_inspecting_then_titled_sample() {
    match sample_source() {
        DocumentSource::Text { title, content } => {
            assert_eq!(title.as_deref(), Some(SAMPLE_TITLE));
            assert!(content.contains("mobile-first"));
        }
        other => panic!("unexpected source: {other:?}"),
    }
}
