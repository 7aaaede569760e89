//! PDF page text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{PageTextSource, Result};
use crate::error::DocumentError;

/// Page text source for text-layer PDFs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextSource;

/// A PDF loaded and, when needed, decrypted.
struct LoadedPdf {
    document: Document,
    raw_data: Vec<u8>,
}

impl PdfTextSource {
    pub fn new() -> Self {
        Self
    }

    fn load(&self, data: &[u8]) -> Result<LoadedPdf> {
        let mut document =
            Document::load_mem(data).map_err(|e| DocumentError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        let raw_data = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(DocumentError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| DocumentError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        if document.get_pages().is_empty() {
            return Err(DocumentError::NoPages);
        }

        Ok(LoadedPdf { document, raw_data })
    }
}

impl LoadedPdf {
    fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Per-page text through lopdf's own content-stream reader.
    fn lopdf_pages(&self) -> Result<Vec<String>> {
        self.document
            .get_pages()
            .keys()
            .map(|&number| {
                self.document
                    .extract_text(&[number])
                    .map_err(|e| DocumentError::TextExtraction(e.to_string()))
            })
            .collect()
    }
}

impl PageTextSource for PdfTextSource {
    fn page_texts(&self, data: &[u8]) -> Result<Vec<String>> {
        let pdf = self.load(data)?;

        let pages = match pdf_extract::extract_text_from_mem_by_pages(&pdf.raw_data) {
            Ok(pages) if pages.len() == pdf.page_count() => pages,
            Ok(pages) => {
                warn!(
                    "pdf-extract returned {} pages for a {}-page document, using lopdf",
                    pages.len(),
                    pdf.page_count()
                );
                pdf.lopdf_pages()?
            }
            Err(e) => {
                warn!("pdf-extract failed ({}), using lopdf", e);
                pdf.lopdf_pages()?
            }
        };

        debug!(
            "Extracted {} pages, {} chars of text",
            pages.len(),
            pages.iter().map(String::len).sum::<usize>()
        );
        Ok(pages)
    }
}
