//! Full payroll sheet extractor.
//!
//! An employee block starts at a `Cód: .. Nome: .. Função:` line and ends at
//! the `Proventos / Descontos / Liquido` totals line. Between the two, every
//! line is tried against the field registry; a later match for a field
//! replaces an earlier one.

use regex::Regex;
use tracing::{debug, trace};

use crate::error::{ExtractionError, ExtractionWarning, ParseError};
use crate::models::{BlockPolicy, Family, PayrollAmounts, PayrollField, PayrollRecord};
use crate::normalize::{parse_date, to_number_field};
use crate::rules::patterns::*;
use crate::rules::{Category, RuleTable};

use super::{DocumentText, Extracted, HeaderContext, RecordExtractor, Result};

/// Text every amount holds until its line is seen.
const ZERO_TEXT: &str = "0,00";

/// Single-capture item and base lines, tried in order on every line of a block.
fn field_rules() -> [(PayrollField, &'static Regex); 12] {
    [
        (PayrollField::SalaryEarning, &*ITEM_SALARY),
        (PayrollField::DsrOvertime, &*ITEM_DSR_OVERTIME),
        (PayrollField::Overtime50, &*ITEM_OVERTIME_50),
        (PayrollField::Overtime100, &*ITEM_OVERTIME_100),
        (PayrollField::TransportRefund, &*ITEM_TRANSPORT_REFUND),
        (PayrollField::InssSalary, &*ITEM_INSS),
        (PayrollField::IrrfSalary, &*ITEM_IRRF),
        (PayrollField::TransportDiscount, &*ITEM_TRANSPORT_DISCOUNT),
        (PayrollField::AssistentialContribution, &*ITEM_ASSISTENTIAL),
        (PayrollField::InssCompanyBase, &*BASE_INSS_COMPANY),
        (PayrollField::InssEmployeeBase, &*BASE_INSS_EMPLOYEE),
        (PayrollField::FgtsBase, &*BASE_FGTS),
    ]
}

/// An employee block between its open line and its totals line.
#[derive(Debug, Clone)]
struct OpenBlock {
    company: String,
    tax_id: String,
    code: String,
    name: String,
    role: String,
    admission: Option<String>,
    amounts: [String; PayrollField::COUNT],
}

impl OpenBlock {
    fn open(header: &HeaderContext, code: &str, name: &str, role: &str) -> Self {
        Self {
            company: header.company.clone(),
            tax_id: header.tax_id.clone(),
            code: code.to_string(),
            name: name.trim().to_string(),
            role: role.trim().to_string(),
            admission: None,
            amounts: std::array::from_fn(|_| ZERO_TEXT.to_string()),
        }
    }

    fn set(&mut self, field: PayrollField, raw: &str) {
        trace!("{} {} = {}", self.code, field.label(), raw);
        self.amounts[field as usize] = raw.to_string();
    }

    /// Returns true when the line closed the block.
    fn apply_line(&mut self, line: &str) -> bool {
        if let Some(caps) = PAYROLL_CONTRACT.captures(line) {
            self.admission = Some(caps[1].to_string());
            self.set(PayrollField::ContractSalary, &caps[2]);
        }

        for (field, pattern) in field_rules() {
            if let Some(caps) = pattern.captures(line) {
                self.set(field, &caps[1]);
            }
        }

        let without_base = BASE_FGTS.replace_all(line, "");
        if let Some(caps) = FGTS.captures(&without_base) {
            self.set(PayrollField::Fgts, &caps[1]);
        }

        if let Some(caps) = PAYROLL_TOTALS.captures(line) {
            self.set(PayrollField::TotalGross, &caps[1]);
            self.set(PayrollField::TotalDeductions, &caps[2]);
            self.set(PayrollField::NetPay, &caps[3]);
            return true;
        }
        false
    }

    fn finish(
        self,
        period_tag: &str,
        source_file: &str,
    ) -> std::result::Result<PayrollRecord, ParseError> {
        let mut amounts = PayrollAmounts::default();
        for field in PayrollField::ALL {
            amounts[field] = to_number_field(field.label(), &self.amounts[field as usize])?;
        }
        let admission = self
            .admission
            .as_deref()
            .map(|raw| parse_date("Admissão", raw))
            .transpose()?;

        Ok(PayrollRecord {
            company: self.company,
            tax_id: self.tax_id,
            code: self.code,
            name: self.name,
            role: self.role,
            admission,
            period_tag: period_tag.to_string(),
            amounts,
            source_file: source_file.to_string(),
        })
    }
}

/// Full payroll sheet extractor.
pub struct PayrollExtractor<'r> {
    rules: &'r RuleTable,
    policy: BlockPolicy,
}

impl<'r> PayrollExtractor<'r> {
    pub fn new(rules: &'r RuleTable) -> Self {
        Self {
            rules,
            policy: BlockPolicy::Lenient,
        }
    }

    /// Set the handling of blocks that never reach a totals line.
    pub fn with_block_policy(mut self, policy: BlockPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn unclosed(&self, block: OpenBlock, warnings: &mut Vec<ExtractionWarning>) -> Result<()> {
        match self.policy {
            BlockPolicy::Lenient => {
                debug!("Discarding unclosed block {} ({})", block.code, block.name);
                warnings.push(ExtractionWarning::BlockDiscarded {
                    code: block.code,
                    name: block.name,
                });
                Ok(())
            }
            BlockPolicy::Strict => Err(ExtractionError::UnclosedBlock {
                code: block.code,
                name: block.name,
            }),
        }
    }
}

impl RecordExtractor for PayrollExtractor<'_> {
    type Record = PayrollRecord;

    fn family(&self) -> Family {
        Family::Payroll
    }

    fn extract(&self, document: &DocumentText) -> Result<Extracted<PayrollRecord>> {
        let mut out = Extracted::default();
        let period_tag = self
            .rules
            .classify_in(&document.header, Category::Payroll)
            .period_tag();
        debug!("{}: payroll period tag {:?}", document.name, period_tag);

        let mut header = HeaderContext::new();
        let mut current: Option<OpenBlock> = None;

        for page in document.text_pages() {
            header.update_from_payroll_page(page);

            for line in page.lines() {
                if let Some(caps) = PAYROLL_OPEN.captures(line) {
                    if let Some(previous) = current.take() {
                        self.unclosed(previous, &mut out.warnings)?;
                    }
                    current = Some(OpenBlock::open(&header, &caps[1], &caps[2], &caps[3]));
                    continue;
                }

                let Some(block) = current.as_mut() else {
                    continue;
                };
                if !block.apply_line(line) {
                    continue;
                }

                if let Some(block) = current.take() {
                    let code = block.code.clone();
                    match block.finish(&period_tag, &document.name) {
                        Ok(record) => out.records.push(record),
                        Err(e) => out.warnings.push(ExtractionWarning::RecordDropped {
                            code,
                            reason: e.to_string(),
                        }),
                    }
                }
            }
        }

        if let Some(block) = current.take() {
            self.unclosed(block, &mut out.warnings)?;
        }

        Ok(out)
    }
}
