//! Pyramid document files
//!
//! Loads and saves `{ "title", "pyramid" }` JSON files between CLI runs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::export::slug;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{PyramidDocument, PyramidTree};
use crate::infrastructure::traits::FileSystem;

pub const DOCUMENT_EXTENSION: &str = "pyramid.json";

pub struct DocumentService {
    fs: Arc<dyn FileSystem>,
}

impl DocumentService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Default location for a freshly analysed document.
    pub fn default_path(dir: &Path, title: &str) -> PathBuf {
        dir.join(format!("{}.{}", slug(title), DOCUMENT_EXTENSION))
    }

    /// Read a document and check its tree structure.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<(String, PyramidTree)> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read pyramid document", path)?;
        let document: PyramidDocument =
            serde_json::from_str(&content).map_err(|e| ApplicationError::OperationFailed {
                context: format!("parse pyramid document: {}", path.display()),
                source: Box::new(e),
            })?;
        let tree = PyramidTree::from_node(&document.pyramid)?;
        debug!("loaded '{}' ({} nodes)", document.title, tree.len());
        Ok((document.title, tree))
    }

    #[instrument(level = "debug", skip(self, document))]
    pub fn save(&self, path: &Path, document: &PyramidDocument) -> ApplicationResult<()> {
        let json =
            serde_json::to_string_pretty(document).map_err(|e| ApplicationError::OperationFailed {
                context: format!("serialize pyramid document: {}", path.display()),
                source: Box::new(e),
            })?;
        self.fs
            .ensure_parent(path)
            .with_path_context("create directory", path)?;
        self.fs
            .write(path, &json)
            .with_path_context("write pyramid document", path)
    }

    pub fn save_tree(&self, path: &Path, title: &str, tree: &PyramidTree) -> ApplicationResult<()> {
        self.save(
            path,
            &PyramidDocument {
                title: title.to_string(),
                pyramid: tree.to_node(),
            },
        )
    }
}
