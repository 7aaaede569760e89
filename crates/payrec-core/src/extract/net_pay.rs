//! Net-pay report extractor. One line is one record.

use crate::error::{ExtractionWarning, ParseError};
use crate::models::{Family, NetPayRecord};
use crate::normalize::{parse_date, to_number_field};
use crate::rules::patterns::NET_PAY_LINE;
use crate::rules::{Category, RuleTable};

use super::{DocumentText, Extracted, HeaderContext, RecordExtractor, Result};

/// Net-pay report extractor.
pub struct NetPayExtractor<'r> {
    rules: &'r RuleTable,
}

impl<'r> NetPayExtractor<'r> {
    pub fn new(rules: &'r RuleTable) -> Self {
        Self { rules }
    }

    fn parse_line(
        &self,
        caps: &regex::Captures<'_>,
        tax_id: &str,
        period_tag: &str,
        source_file: &str,
    ) -> std::result::Result<NetPayRecord, ParseError> {
        Ok(NetPayRecord {
            tax_id: tax_id.to_string(),
            code: caps[1].to_string(),
            name: caps[2].trim().to_string(),
            cpf: caps[3].to_string(),
            pay_date: parse_date("Data Pagto", &caps[4])?,
            net_amount: to_number_field("Valor Líquido", &caps[5])?,
            period_tag: period_tag.to_string(),
            source_file: source_file.to_string(),
        })
    }
}

impl RecordExtractor for NetPayExtractor<'_> {
    type Record = NetPayRecord;

    fn family(&self) -> Family {
        Family::NetPay
    }

    fn extract(&self, document: &DocumentText) -> Result<Extracted<NetPayRecord>> {
        let mut out = Extracted::default();
        let period_tag = self
            .rules
            .classify_in(&document.header, Category::Payroll)
            .period_tag();
        let mut header = HeaderContext::new();

        for page in document.text_pages() {
            header.update_from_page(page);

            for line in page.lines() {
                let Some(caps) = NET_PAY_LINE.captures(line) else {
                    continue;
                };
                match self.parse_line(&caps, &header.tax_id, &period_tag, &document.name) {
                    Ok(record) => out.records.push(record),
                    Err(e) => out.warnings.push(ExtractionWarning::RecordDropped {
                        code: caps[1].to_string(),
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
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn doc(pages: &[&str]) -> DocumentText {
        DocumentText::new(
            "Liquido de Pagamento.pdf",
            pages.iter().map(|p| p.to_string()).collect(),
            2,
        )
    }

    #[test]
    fn test_net_pay_lines() {
        let rules = RuleTable::builtin();
        let document = doc(&["\
Relatório de Líquidos - ACME 12.345.678/0001-90
Cód Nome CPF Data Valor
10 Ana Silva 123.456.789-00 05/03/2024 1.500,00
11 Bruno Costa Neto 987.654.321-00 05/03/2024 2.100,50"]);

        let out = NetPayExtractor::new(&rules).extract(&document).unwrap();
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].name, "Ana Silva");
        assert_eq!(out.records[0].tax_id, "12.345.678/0001-90");
        assert_eq!(out.records[0].pay_date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(out.records[1].name, "Bruno Costa Neto");
        assert_eq!(out.records[1].net_amount, Decimal::new(210050, 2));
        assert_eq!(out.records[1].period_tag, "");
    }

    #[test]
    fn test_advance_report_tagged() {
        let rules = RuleTable::builtin();
        let document = doc(&[
            "Relatorio Liquido de Adiantamento 12.345.678/0001-90\n10 Ana Silva 123.456.789-00 20/03/2024 600,00",
        ]);
        let out = NetPayExtractor::new(&rules).extract(&document).unwrap();
        assert_eq!(out.records[0].period_tag, "Adiantamento");
    }

    #[test]
    fn test_page_without_tax_id_keeps_previous() {
        let rules = RuleTable::builtin();
        let document = doc(&[
            "12.345.678/0001-90\n10 Ana Silva 123.456.789-00 05/03/2024 1,00",
            "11 Bruno Costa 987.654.321-00 05/03/2024 2,00",
        ]);
        let out = NetPayExtractor::new(&rules).extract(&document).unwrap();
        assert_eq!(out.records[1].tax_id, "12.345.678/0001-90");
    }

    #[test]
    fn test_invalid_date_dropped() {
        let rules = RuleTable::builtin();
        let document = doc(&["10 Ana Silva 123.456.789-00 45/13/2024 1,00"]);
        let out = NetPayExtractor::new(&rules).extract(&document).unwrap();
        assert!(out.records.is_empty());
        assert_eq!(
            out.warnings[0],
            ExtractionWarning::RecordDropped {
                code: "10".to_string(),
                reason: "invalid date for Data Pagto: \"45/13/2024\"".to_string()
            }
        );
    }
}
