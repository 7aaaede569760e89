//! Extras (extra hours / bonus) report extractor.
//!
//! The whole document is one event; the event name comes from the rule
//! table, every qualifying line is one record.

use rust_decimal::Decimal;

use crate::error::{ExtractionWarning, ParseError};
use crate::models::{ExtrasRecord, Family};
use crate::normalize::to_number_field;
use crate::rules::patterns::{EXTRAS_LINE, EXTRAS_LINE_SHORT};
use crate::rules::{Category, RuleTable};

use super::{DocumentText, Extracted, HeaderContext, RecordExtractor, Result};

/// Extras report extractor.
pub struct ExtrasExtractor<'r> {
    rules: &'r RuleTable,
}

/// Leading zeros are dropped so `0012` and `12` join.
fn canonical_code(raw: &str) -> String {
    raw.parse::<u64>()
        .map(|code| code.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

struct ExtrasLine<'t> {
    code: &'t str,
    name: &'t str,
    reference: Option<&'t str>,
    value: &'t str,
}

fn match_line(line: &str) -> Option<ExtrasLine<'_>> {
    if let Some(caps) = EXTRAS_LINE.captures(line) {
        return Some(ExtrasLine {
            code: caps.get(1)?.as_str(),
            name: caps.get(2)?.as_str(),
            reference: Some(caps.get(3)?.as_str()),
            value: caps.get(4)?.as_str(),
        });
    }
    let caps = EXTRAS_LINE_SHORT.captures(line)?;
    Some(ExtrasLine {
        code: caps.get(1)?.as_str(),
        name: caps.get(2)?.as_str(),
        reference: None,
        value: caps.get(3)?.as_str(),
    })
}

impl<'r> ExtrasExtractor<'r> {
    pub fn new(rules: &'r RuleTable) -> Self {
        Self { rules }
    }
}

impl RecordExtractor for ExtrasExtractor<'_> {
    type Record = ExtrasRecord;

    fn family(&self) -> Family {
        Family::Extras
    }

    fn extract(&self, document: &DocumentText) -> Result<Extracted<ExtrasRecord>> {
        let mut out = Extracted::default();

        let classification = self.rules.classify_in(&document.header, Category::Extras);
        if classification.is_unclassified() {
            out.warnings.push(ExtractionWarning::Unclassified {
                file: document.name.clone(),
                label: classification.label().to_string(),
            });
        }
        let event = classification.label();

        let mut header = HeaderContext::new();
        for page in document.text_pages() {
            header.update_from_page(page);

            for line in page.lines() {
                let Some(matched) = match_line(line) else {
                    continue;
                };
                let parsed = (|| -> std::result::Result<(Option<Decimal>, Decimal), ParseError> {
                    let reference = matched
                        .reference
                        .map(|r| to_number_field("Referência", r))
                        .transpose()?;
                    Ok((reference, to_number_field("Valor", matched.value)?))
                })();

                match parsed {
                    Ok((reference, value)) => out.records.push(ExtrasRecord {
                        tax_id: header.tax_id.clone(),
                        code: canonical_code(matched.code),
                        name: matched.name.trim().to_string(),
                        event: event.to_string(),
                        reference,
                        value,
                        source_file: document.name.clone(),
                    }),
                    Err(e) => out.warnings.push(ExtractionWarning::RecordDropped {
                        code: canonical_code(matched.code),
                        reason: e.to_string(),
                    }),
                }
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{EventRule, UNCLASSIFIED_LABEL};

    fn doc(name: &str, pages: &[&str]) -> DocumentText {
        DocumentText::new(name, pages.iter().map(|p| p.to_string()).collect(), 2)
    }

    #[test]
    fn test_primary_and_fallback_lines() {
        let rules = RuleTable::builtin();
        let document = doc(
            "he50.pdf",
            &["\
Relatório Horas Extras 50% - ACME 12.345.678/0001-90
0012 Ana Silva 10,00 150,00
13 Bruno Costa 80,00"],
        );

        let out = ExtrasExtractor::new(&rules).extract(&document).unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(out.records.len(), 2);

        let first = &out.records[0];
        assert_eq!(first.code, "12");
        assert_eq!(first.name, "Ana Silva");
        assert_eq!(first.event, "Horas Extras 50%");
        assert_eq!(first.reference, Some(Decimal::new(1000, 2)));
        assert_eq!(first.value, Decimal::new(15000, 2));
        assert_eq!(first.tax_id, "12.345.678/0001-90");

        assert_eq!(out.records[1].reference, None);
        assert_eq!(out.records[1].value, Decimal::new(8000, 2));
    }

    #[test]
    fn test_unclassified_document_keeps_rows() {
        let rules = RuleTable::builtin();
        let document = doc("misc.pdf", &["Relatório de Prêmios\n7 Carla Dias 300,00"]);

        let out = ExtrasExtractor::new(&rules).extract(&document).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].event, UNCLASSIFIED_LABEL);
        assert_eq!(
            out.warnings,
            vec![ExtractionWarning::Unclassified {
                file: "misc.pdf".to_string(),
                label: UNCLASSIFIED_LABEL.to_string(),
            }]
        );
    }

    #[test]
    fn test_rule_change_between_batches() {
        let document = doc("misc.pdf", &["Relatório de Prêmios\n7 Carla Dias 300,00"]);
        let mut rules = RuleTable::builtin();
        rules.insert(0, EventRule::new("Prêmios", "Prêmio", Category::Extras));

        let out = ExtrasExtractor::new(&rules).extract(&document).unwrap();
        assert_eq!(out.records[0].event, "Prêmio");
    }

    #[test]
    fn test_canonical_code() {
        assert_eq!(canonical_code("0012"), "12");
        assert_eq!(canonical_code("0"), "0");
        assert_eq!(canonical_code("A12"), "A12");
    }
}
