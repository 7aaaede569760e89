//! Record extraction from page text.
//!
//! Each report family has its own [`RecordExtractor`]: a single pass over the
//! lines of a document that assembles typed records. Block families
//! (full payroll, assistential) thread an explicit open-record slot through
//! the line loop; line families (net pay, extras) match each line on its own.
//! [`BatchExtractor`] runs an extractor over an upload batch and isolates
//! failures per document.

mod assistential;
mod extras;
mod header;
mod net_pay;
mod payroll;

pub use assistential::AssistentialExtractor;
pub use extras::ExtrasExtractor;
pub use header::HeaderContext;
pub use net_pay::NetPayExtractor;
pub use payroll::PayrollExtractor;

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{ExtractionError, ExtractionWarning};
use crate::models::Family;
use crate::pdf::{PageTextSource, SourceDocument};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Page text of one document, ready for a line scan.
#[derive(Debug, Clone)]
pub struct DocumentText {
    /// File name as uploaded.
    pub name: String,
    /// Raw text per page, in page order.
    pub pages: Vec<String>,
    /// Text of the leading pages, used for classification.
    pub header: String,
}

impl DocumentText {
    pub fn new(name: impl Into<String>, pages: Vec<String>, header_pages: usize) -> Self {
        let header = pages
            .iter()
            .take(header_pages)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            name: name.into(),
            pages,
            header,
        }
    }

    /// Pages that carry any text.
    pub fn text_pages(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .map(String::as_str)
            .filter(|page| !page.trim().is_empty())
    }
}

/// Records and warnings from one document.
#[derive(Debug, Clone)]
pub struct Extracted<R> {
    pub records: Vec<R>,
    pub warnings: Vec<ExtractionWarning>,
}

impl<R> Default for Extracted<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Trait for family-specific line scanners.
pub trait RecordExtractor {
    /// Record type produced.
    type Record;

    /// Family this extractor reads.
    fn family(&self) -> Family;

    /// Scan one document.
    fn extract(&self, document: &DocumentText) -> Result<Extracted<Self::Record>>;
}

/// Outcome of one document in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    /// Document scanned; number of records emitted.
    Extracted { records: usize },
    /// Document could not be read or scanned.
    Failed { error: String },
}

/// Per-document line of the batch summary.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub file: String,
    pub status: DocumentStatus,
    pub warnings: Vec<ExtractionWarning>,
    pub processing_time_ms: u64,
}

impl DocumentReport {
    pub fn is_success(&self) -> bool {
        matches!(self.status, DocumentStatus::Extracted { .. })
    }
}

/// Records of a whole batch plus the per-document summary.
#[derive(Debug, Clone)]
pub struct Batch<R> {
    pub family: Family,
    pub records: Vec<R>,
    pub reports: Vec<DocumentReport>,
}

impl<R> Batch<R> {
    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.len() - self.succeeded()
    }

    /// Every warning raised in the batch.
    pub fn warnings(&self) -> impl Iterator<Item = (&str, &ExtractionWarning)> {
        self.reports
            .iter()
            .flat_map(|r| r.warnings.iter().map(move |w| (r.file.as_str(), w)))
    }
}

/// Runs an extractor over a batch of uploaded documents.
pub struct BatchExtractor<'a, S: PageTextSource + ?Sized> {
    source: &'a S,
    header_pages: usize,
}

impl<'a, S: PageTextSource + ?Sized> BatchExtractor<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            header_pages: 2,
        }
    }

    /// Number of leading pages used for classification.
    pub fn with_header_pages(mut self, pages: usize) -> Self {
        self.header_pages = pages;
        self
    }

    /// Read one document into page text.
    pub fn load(&self, document: &SourceDocument) -> crate::Result<DocumentText> {
        let pages = self.source.page_texts(&document.data)?;
        Ok(DocumentText::new(&document.name, pages, self.header_pages))
    }

    /// Extract every document; one bad document never stops the batch.
    pub fn run<E: RecordExtractor>(
        &self,
        extractor: &E,
        documents: &[SourceDocument],
    ) -> Batch<E::Record> {
        self.run_with_progress(extractor, documents, |_| {})
    }

    /// Like [`run`](Self::run), calling `progress` after each document.
    pub fn run_with_progress<E: RecordExtractor>(
        &self,
        extractor: &E,
        documents: &[SourceDocument],
        mut progress: impl FnMut(&DocumentReport),
    ) -> Batch<E::Record> {
        let family = extractor.family();
        let mut records = Vec::new();
        let mut reports = Vec::with_capacity(documents.len());

        info!("Extracting {} {} documents", documents.len(), family);

        for document in documents {
            let start = Instant::now();
            let outcome = self
                .load(document)
                .and_then(|text| extractor.extract(&text).map_err(Into::into));

            let report = match outcome {
                Ok(extracted) => {
                    debug!(
                        "{}: {} records, {} warnings",
                        document.name,
                        extracted.records.len(),
                        extracted.warnings.len()
                    );
                    for warning in &extracted.warnings {
                        warn!("{}: {}", document.name, warning);
                    }
                    let count = extracted.records.len();
                    records.extend(extracted.records);
                    DocumentReport {
                        file: document.name.clone(),
                        status: DocumentStatus::Extracted { records: count },
                        warnings: extracted.warnings,
                        processing_time_ms: start.elapsed().as_millis() as u64,
                    }
                }
                Err(e) => {
                    warn!("Failed to process {}: {}", document.name, e);
                    DocumentReport {
                        file: document.name.clone(),
                        status: DocumentStatus::Failed {
                            error: e.to_string(),
                        },
                        warnings: Vec::new(),
                        processing_time_ms: start.elapsed().as_millis() as u64,
                    }
                }
            };

            progress(&report);
            reports.push(report);
        }

        Batch {
            family,
            records,
            reports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{join_pages, PlainTextSource};
    use crate::rules::RuleTable;

    #[test]
    fn test_document_text_header() {
        let doc = DocumentText::new(
            "a.pdf",
            vec!["one".to_string(), "  ".to_string(), "three".to_string()],
            1,
        );
        assert_eq!(doc.header, "one");
        assert_eq!(doc.text_pages().collect::<Vec<_>>(), vec!["one", "three"]);
    }

    #[test]
    fn test_bad_document_does_not_abort_batch() {
        let rules = RuleTable::builtin();
        let extractor = NetPayExtractor::new(&rules);
        let good = join_pages(&["CNPJ 12.345.678/0001-90\n10 Ana Silva 123.456.789-00 05/03/2024 1.500,00"]);
        let documents = vec![
            SourceDocument::new("broken.txt", vec![0xff, 0xfe]),
            SourceDocument::new("good.txt", good.into_bytes()),
        ];

        let batch = BatchExtractor::new(&PlainTextSource).run(&extractor, &documents);

        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.succeeded(), 1);
        assert_eq!(batch.failed(), 1);
        assert!(matches!(batch.reports[0].status, DocumentStatus::Failed { .. }));
        assert_eq!(
            batch.reports[1].status,
            DocumentStatus::Extracted { records: 1 }
        );
    }

    #[test]
    fn test_progress_called_per_document() {
        let rules = RuleTable::builtin();
        let extractor = NetPayExtractor::new(&rules);
        let documents = vec![
            SourceDocument::new("a.txt", "x".as_bytes().to_vec()),
            SourceDocument::new("b.txt", "y".as_bytes().to_vec()),
        ];
        let mut seen = Vec::new();
        BatchExtractor::new(&PlainTextSource).run_with_progress(&extractor, &documents, |r| {
            seen.push(r.file.clone())
        });
        assert_eq!(seen, vec!["a.txt", "b.txt"]);
    }
}
