//! Page text sources.
//!
//! The extractors never see raw bytes: a [`PageTextSource`] turns a
//! [`SourceDocument`] into one string per page, in page order.

#[cfg(feature = "pdf")]
mod extractor;

#[cfg(feature = "pdf")]
pub use extractor::PdfTextSource;

use tracing::debug;

use crate::error::DocumentError;

/// Result type for page text operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Page separator understood by [`PlainTextSource`].
pub const PAGE_BREAK: char = '\u{c}';

/// An uploaded file.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// File name as uploaded.
    pub name: String,
    /// Raw file content.
    pub data: Vec<u8>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Trait for page text extraction implementations.
pub trait PageTextSource {
    /// Text of every page, in page order. Pages without text are empty strings.
    fn page_texts(&self, data: &[u8]) -> Result<Vec<String>>;

    /// Text of the first `pages` pages, joined, for document classification.
    fn header_text(&self, data: &[u8], pages: usize) -> Result<String> {
        Ok(self.page_texts(data)?.into_iter().take(pages).collect::<Vec<_>>().join("\n"))
    }
}

/// Plain UTF-8 text with form-feed page breaks.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSource;

impl PlainTextSource {
    pub fn new() -> Self {
        Self
    }
}

impl PageTextSource for PlainTextSource {
    fn page_texts(&self, data: &[u8]) -> Result<Vec<String>> {
        let text = std::str::from_utf8(data).map_err(|_| DocumentError::Encoding)?;
        if text.trim().is_empty() {
            return Err(DocumentError::NoPages);
        }

        let pages: Vec<String> = text.split(PAGE_BREAK).map(str::to_string).collect();
        debug!("Loaded plain text document with {} pages", pages.len());
        Ok(pages)
    }
}

/// Join pages into the form read by [`PlainTextSource`].
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&PAGE_BREAK.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_pages() {
        let data = join_pages(&["page one", "", "page three"]);
        let pages = PlainTextSource.page_texts(data.as_bytes()).unwrap();
        assert_eq!(pages, vec!["page one", "", "page three"]);
    }

    #[test]
    fn test_header_text_takes_first_pages() {
        let data = join_pages(&["a", "b", "c"]);
        assert_eq!(PlainTextSource.header_text(data.as_bytes(), 2).unwrap(), "a\nb");
    }

    #[test]
    fn test_plain_text_rejects_binary_and_empty() {
        assert!(matches!(
            PlainTextSource.page_texts(&[0xff, 0xfe, 0x00]),
            Err(DocumentError::Encoding)
        ));
        assert!(matches!(
            PlainTextSource.page_texts(b"  \n"),
            Err(DocumentError::NoPages)
        ));
    }
}
