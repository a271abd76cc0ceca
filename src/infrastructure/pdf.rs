//! PDF text extraction using lopdf

use tracing::{debug, instrument};

use crate::infrastructure::traits::{PdfError, PdfTextExtractor};

/// Extracts the text of every page, in page order, one page per paragraph.
#[derive(Debug, Default)]
pub struct LopdfExtractor;

impl PdfTextExtractor for LopdfExtractor {
    #[instrument(level = "debug", skip_all, fields(bytes = bytes.len()))]
    fn extract_text(&self, bytes: &[u8]) -> Result<String, PdfError> {
        let doc = lopdf::Document::load_mem(bytes).map_err(|e| PdfError(e.to_string()))?;

        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        debug!("extracting text from {} pages", pages.len());

        let mut text = String::new();
        for page in pages {
            match doc.extract_text(&[page]) {
                Ok(content) => {
                    text.push_str(content.trim_end());
                    text.push_str("\n\n");
                }
                Err(e) => debug!("page {}: no extractable text: {}", page, e),
            }
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_garbage_bytes_when_extracting_then_error() {
        let result = LopdfExtractor.extract_text(b"not a pdf");
        assert!(result.unwrap_err().to_string().starts_with("invalid PDF"));
    }
}
