//! Error types for the payrec-core library.

use thiserror::Error;

/// Main error type for the payrec library.
#[derive(Error, Debug)]
pub enum PayrecError {
    /// A source document could not be read.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Record extraction failed for a document.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// A field could not be normalized.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Table shape or lookup error.
    #[error("table error: {0}")]
    Table(#[from] TableError),

    /// Consolidation precondition failed.
    #[error("consolidation error: {0}")]
    Consolidation(#[from] ConsolidationError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while opening or decoding a source document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Failed to open/parse the document.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// Failed to extract text from the document.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("document is encrypted")]
    Encrypted,

    /// The document is empty or has no pages.
    #[error("document has no pages")]
    NoPages,

    /// The document is not valid UTF-8 text.
    #[error("document is not valid UTF-8 text")]
    Encoding,
}

/// A numeric or identifier field that could not be brought to canonical form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Locale-formatted amount could not be parsed.
    #[error("invalid amount for {field}: {value:?}")]
    Number { field: String, value: String },

    /// Date could not be parsed as dd/mm/yyyy.
    #[error("invalid date for {field}: {value:?}")]
    Date { field: String, value: String },
}

/// Errors related to record extraction from page text.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// An employee block opened but never reached its totals line.
    #[error("employee block {code} ({name}) was never closed")]
    UnclosedBlock { code: String, name: String },

    /// A field of a finished record could not be normalized.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors related to semantic tables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Column name not present in the table.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Row does not have one cell per column.
    #[error("row has {actual} cells, table has {expected} columns")]
    RowWidth { expected: usize, actual: usize },

    /// A column name appears twice.
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),
}

/// Preconditions that stop consolidation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsolidationError {
    /// No payroll table was supplied.
    #[error("the full payroll table must be processed before consolidating")]
    MissingBase,

    /// The payroll table has no rows.
    #[error("the full payroll table is empty; nothing to consolidate")]
    EmptyBase,
}

/// Non-fatal conditions surfaced to the operator after extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionWarning {
    /// No rule matched the document; rows carry the sentinel event name.
    #[error("no event rule matched {file}; rows filed under {label:?}")]
    Unclassified { file: String, label: String },

    /// A record was discarded because a field could not be normalized.
    #[error("record for employee {code} dropped: {reason}")]
    RecordDropped { code: String, reason: String },

    /// An unclosed employee block was discarded (lenient mode).
    #[error("employee block {code} ({name}) discarded without a totals line")]
    BlockDiscarded { code: String, name: String },

    /// A name line had no matching values line immediately after it.
    #[error("employee {code} ({name}) dropped: values line missing")]
    MissingContinuation { code: String, name: String },
}

/// Result type for the payrec library.
pub type Result<T> = std::result::Result<T, PayrecError>;
