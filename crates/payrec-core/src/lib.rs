//! Core library for payroll report extraction and consolidation.
//!
//! This crate provides:
//! - Page text sources (PDF via lopdf/pdf-extract, plain text)
//! - Locale-aware value normalization (amounts, tax ids, dates)
//! - Rule-table event classification
//! - Line-oriented record extractors for the four report families
//! - Family table building (grouping, extras pivot)
//! - Consolidation of the family tables on the employee key

pub mod consolidate;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod pdf;
pub mod rules;
pub mod tabulate;

pub use consolidate::{Consolidated, ConsolidationEngine, KeyNormalizer};
pub use error::{ExtractionWarning, PayrecError, Result};
pub use extract::{
    AssistentialExtractor, Batch, BatchExtractor, DocumentReport, DocumentStatus, DocumentText,
    ExtrasExtractor, NetPayExtractor, PayrollExtractor, RecordExtractor,
};
pub use models::{EmployeeKey, Family, PayrecConfig, Table};
pub use pdf::{PageTextSource, PlainTextSource, SourceDocument};
#[cfg(feature = "pdf")]
pub use pdf::PdfTextSource;
pub use rules::{Category, EventRule, RuleTable};
pub use tabulate::{FamilyTable, TableBuilder};
