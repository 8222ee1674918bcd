use std::path::Path;

use crate::errors::AppResult;

/// Per-page text of a PDF, in page order. Pages without extractable text
/// come back as empty strings.
pub trait PdfTextExtractor: Send + Sync {
    fn extract_pages(&self, path: &Path) -> AppResult<Vec<String>>;
}

pub struct LopdfExtractor;

impl PdfTextExtractor for LopdfExtractor {
    fn extract_pages(&self, path: &Path) -> AppResult<Vec<String>> {
        let document = lopdf::Document::load(path)?;

        let pages = document
            .get_pages()
            .into_keys()
            .map(|page_number| match document.extract_text(&[page_number]) {
                Ok(text) => text,
                Err(err) => {
                    log::warn!(
                        "No extractable text on page {} of {}: {}",
                        page_number,
                        path.display(),
                        err
                    );
                    String::new()
                }
            })
            .collect();

        Ok(pages)
    }
}
