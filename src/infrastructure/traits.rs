//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::Path;

use thiserror::Error;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents as raw bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Size of a file in bytes.
    fn file_size(&self, path: &Path) -> io::Result<u64>;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

/// Failure of a language model call.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Missing GEMINI_API_KEY environment variable")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Request(String),

    #[error("model request failed ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("unexpected model response: {0}")]
    InvalidResponse(String),

    #[error("model returned no text")]
    EmptyAnswer,
}

/// Failure to read text out of a PDF.
#[derive(Error, Debug)]
#[error("invalid PDF: {0}")]
pub struct PdfError(pub String);

/// Large language model that answers a single prompt with text.
pub trait LanguageModel: Send + Sync {
    /// Send the prompt and return the model's raw text answer.
    fn generate(&self, prompt: &str) -> Result<String, ModelError>;

    /// Whether credentials are configured at all.
    fn is_configured(&self) -> bool;
}

/// Plain text extraction from PDF bytes.
pub trait PdfTextExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, PdfError>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        std::fs::metadata(path).map(|m| m.len())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_nested_target_when_ensuring_parent_then_creates_directories() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a/b/deck.html");
        let fs = RealFileSystem;
        fs.ensure_parent(&target).unwrap();
        fs.write(&target, "x").unwrap();
        assert_eq!(fs.file_size(&target).unwrap(), 1);
    }
}
