//! Three-stage session: upload → edit pyramid → preview slides.

use tracing::{info, instrument};

use crate::application::controller::EditorController;
use crate::application::document::DocumentSource;
use crate::application::services::AnalysisService;
use crate::application::ApplicationResult;
use crate::domain::{generate_slides, LayoutConfig, PyramidDocument, PyramidTree, Slide};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Upload,
    MindMap,
    Slides,
}

/// Application state owned by one user session.
#[derive(Debug, Clone)]
pub struct Session {
    stage: Stage,
    title: String,
    editor: EditorController,
    slides: Vec<Slide>,
    current_slide: usize,
}

impl Session {
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            stage: Stage::Upload,
            title: String::new(),
            editor: EditorController::new(layout),
            slides: Vec::new(),
            current_slide: 0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn editor(&self) -> &EditorController {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorController {
        &mut self.editor
    }

    /// Run the analysis and load its result. On any failure the session,
    /// including a previously loaded pyramid, is left untouched.
    #[instrument(level = "debug", skip(self, service))]
    pub fn analyze(
        &mut self,
        service: &AnalysisService,
        source: &DocumentSource,
    ) -> ApplicationResult<()> {
        let document = service.analyze(source)?;
        self.load_document(document)
    }

    /// Load an analysis result or a saved document and open the editor.
    pub fn load_document(&mut self, document: PyramidDocument) -> ApplicationResult<()> {
        let tree = PyramidTree::from_node(&document.pyramid)?;
        self.open(document.title, tree);
        Ok(())
    }

    pub fn open(&mut self, title: String, tree: PyramidTree) {
        info!("opening pyramid '{}' ({} nodes)", title, tree.len());
        self.title = title;
        self.editor.load(tree);
        self.slides.clear();
        self.current_slide = 0;
        self.stage = Stage::MindMap;
    }

    /// Derive the slides from the current tree and switch to the preview.
    pub fn show_slides(&mut self) -> &[Slide] {
        if let Some(tree) = self.editor.tree() {
            self.slides = generate_slides(&self.title, tree);
            self.current_slide = 0;
            self.stage = Stage::Slides;
        }
        &self.slides
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.slides.get(self.current_slide)
    }

    /// Select a slide in the preview; out-of-range indices are ignored.
    pub fn select_slide(&mut self, index: usize) -> bool {
        if index < self.slides.len() {
            self.current_slide = index;
            true
        } else {
            false
        }
    }

    pub fn back_to_map(&mut self) {
        if self.editor.tree().is_some() {
            self.stage = Stage::MindMap;
        }
    }

    pub fn back_to_upload(&mut self) {
        self.stage = Stage::Upload;
    }
}
