//! Loading configuration and documents, running a family over a batch.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use payrec_core::extract::{
    AssistentialExtractor, BatchExtractor, DocumentReport, DocumentStatus, ExtrasExtractor,
    NetPayExtractor, PayrollExtractor,
};
use payrec_core::models::{Family, PayrecConfig};
use payrec_core::pdf::{self, PageTextSource, PdfTextSource, PlainTextSource, SourceDocument};
use payrec_core::rules::RuleTable;
use payrec_core::tabulate::{FamilyTable, TableBuilder};

use super::config::default_config_path;

/// Picks the PDF reader for `%PDF` data and plain text otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnySource;

impl PageTextSource for AnySource {
    fn page_texts(&self, data: &[u8]) -> pdf::Result<Vec<String>> {
        if data.starts_with(b"%PDF") {
            PdfTextSource.page_texts(data)
        } else {
            PlainTextSource.page_texts(data)
        }
    }
}

/// Explicit config file, else the user config if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PayrecConfig> {
    if let Some(path) = config_path {
        return PayrecConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to read config {}", path));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config {}", default_path.display());
        Ok(PayrecConfig::from_file(&default_path)?)
    } else {
        Ok(PayrecConfig::default())
    }
}

/// Expand file names and glob patterns to `.pdf` / `.txt` files, in order.
pub fn expand_inputs(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        let matched: Vec<PathBuf> = glob(pattern)?
            .filter_map(|r| r.ok())
            .filter(|p| {
                let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
                matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
            })
            .collect();

        if matched.is_empty() {
            anyhow::bail!("No matching files found for pattern: {}", pattern);
        }
        for path in matched {
            if !files.contains(&path) {
                files.push(path);
            }
        }
    }
    Ok(files)
}

pub fn read_documents(paths: &[PathBuf]) -> anyhow::Result<Vec<SourceDocument>> {
    paths
        .iter()
        .map(|path| {
            let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
            let name = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("document")
                .to_string();
            Ok(SourceDocument::new(name, data))
        })
        .collect()
}

/// Extract one family from `documents` and build its table.
pub fn extract_family(
    family: Family,
    documents: &[SourceDocument],
    rules: &RuleTable,
    config: &PayrecConfig,
) -> anyhow::Result<(FamilyTable, Vec<DocumentReport>)> {
    let source = AnySource;
    let batch = BatchExtractor::new(&source).with_header_pages(config.extraction.header_pages);
    let builder = TableBuilder::from_config(&config.extraction);

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );
    pb.set_message(family.title());
    let tick = |_: &DocumentReport| pb.inc(1);

    let result = match family {
        Family::Payroll => {
            let extractor =
                PayrollExtractor::new(rules).with_block_policy(config.extraction.block_policy);
            let out = batch.run_with_progress(&extractor, documents, tick);
            (builder.payroll(&out.records)?, out.reports)
        }
        Family::Assistential => {
            let out = batch.run_with_progress(&AssistentialExtractor::new(), documents, tick);
            (builder.assistential(&out.records)?, out.reports)
        }
        Family::NetPay => {
            let out = batch.run_with_progress(&NetPayExtractor::new(rules), documents, tick);
            (builder.net_pay(&out.records)?, out.reports)
        }
        Family::Extras => {
            let out = batch.run_with_progress(&ExtrasExtractor::new(rules), documents, tick);
            (builder.extras(&out.records)?, out.reports)
        }
    };

    pb.finish_and_clear();
    Ok(result)
}

/// Per-document summary of a batch, on stderr.
pub fn print_reports(family: Family, table: &FamilyTable, reports: &[DocumentReport]) {
    let failed: Vec<_> = reports.iter().filter(|r| !r.is_success()).collect();
    eprintln!(
        "{} {}: {} documents, {} ok, {} failed, {} rows",
        style("✓").green(),
        family.title(),
        reports.len(),
        style(reports.len() - failed.len()).green(),
        style(failed.len()).red(),
        table.len()
    );

    for report in reports {
        if let DocumentStatus::Failed { error } = &report.status {
            eprintln!("  {} {}: {}", style("✗").red(), report.file, error);
        }
        for warning in &report.warnings {
            eprintln!("  {} {}: {}", style("⚠").yellow(), report.file, warning);
        }
    }
}
