//! Assistential (union contribution) report extractor.
//!
//! Each employee takes two lines: a name line and, immediately after it, a
//! values line. A name line whose next line does not match is dropped.

use tracing::trace;

use crate::error::{ExtractionWarning, ParseError};
use crate::models::{AssistentialRecord, Family};
use crate::normalize::{parse_date, to_number_field};
use crate::rules::patterns::{ASSISTENTIAL_NAME, ASSISTENTIAL_VALUES};

use super::{DocumentText, Extracted, HeaderContext, RecordExtractor, Result};

/// Name line waiting for its values line.
#[derive(Debug, Clone)]
struct PendingName {
    tax_id: String,
    code: String,
    name: String,
    role: String,
}

impl PendingName {
    fn complete(
        self,
        admission: &str,
        salary: &str,
        value: &str,
        source_file: &str,
    ) -> std::result::Result<AssistentialRecord, ParseError> {
        Ok(AssistentialRecord {
            admission: parse_date("Admissão", admission)?,
            base_salary: to_number_field("Salário Base", salary)?,
            contribution: to_number_field("Valor Assistencial", value)?,
            tax_id: self.tax_id,
            code: self.code,
            name: self.name,
            role: self.role,
            source_file: source_file.to_string(),
        })
    }
}

/// Assistential report extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssistentialExtractor;

impl AssistentialExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl RecordExtractor for AssistentialExtractor {
    type Record = AssistentialRecord;

    fn family(&self) -> Family {
        Family::Assistential
    }

    fn extract(&self, document: &DocumentText) -> Result<Extracted<AssistentialRecord>> {
        let mut out = Extracted::default();
        let mut header = HeaderContext::new();
        let mut pending: Option<PendingName> = None;

        for page in document.text_pages() {
            header.update_from_page(page);

            for line in page.lines() {
                if let Some(name) = pending.take() {
                    match ASSISTENTIAL_VALUES.captures(line) {
                        Some(caps) => {
                            let code = name.code.clone();
                            match name.complete(&caps[1], &caps[2], &caps[3], &document.name) {
                                Ok(record) => {
                                    trace!("Assistential record {}", record.code);
                                    out.records.push(record);
                                }
                                Err(e) => out.warnings.push(ExtractionWarning::RecordDropped {
                                    code,
                                    reason: e.to_string(),
                                }),
                            }
                            continue;
                        }
                        None => out.warnings.push(ExtractionWarning::MissingContinuation {
                            code: name.code,
                            name: name.name,
                        }),
                    }
                }

                if let Some(caps) = ASSISTENTIAL_NAME.captures(line) {
                    pending = Some(PendingName {
                        tax_id: header.tax_id.clone(),
                        code: caps[1].to_string(),
                        name: caps[2].trim().to_string(),
                        role: caps[3].trim().to_string(),
                    });
                }
            }
        }

        if let Some(name) = pending {
            out.warnings.push(ExtractionWarning::MissingContinuation {
                code: name.code,
                name: name.name,
            });
        }

        Ok(out)
    }
}
