//! Company header carried across pages.

use tracing::debug;

use crate::normalize::TAX_ID_NOT_FOUND;
use crate::rules::patterns::{COMPANY_NAME, COMPANY_TAX_ID, TAX_ID_GENERIC};

/// Company name and tax id in effect for the current page.
///
/// Values persist across pages until a later page prints a new header, which
/// lets one document cover several companies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderContext {
    pub company: String,
    pub tax_id: String,
}

impl HeaderContext {
    pub fn new() -> Self {
        Self {
            company: TAX_ID_NOT_FOUND.to_string(),
            tax_id: TAX_ID_NOT_FOUND.to_string(),
        }
    }

    /// Take the first `NN.NNN.NNN/NNNN-NN` on the page, if any.
    pub fn update_from_page(&mut self, page: &str) {
        if let Some(m) = TAX_ID_GENERIC.find(page) {
            self.set_tax_id(m.as_str());
        }
    }

    /// Read the full-payroll header (`Razão Social:` and `CNPJ/CEI:`).
    pub fn update_from_payroll_page(&mut self, page: &str) {
        if let Some(caps) = COMPANY_NAME.captures(page) {
            let company = caps[1].trim();
            if !company.is_empty() && company != self.company {
                debug!("Company header changed to {}", company);
                self.company = company.to_string();
            }
        }
        if let Some(caps) = COMPANY_TAX_ID.captures(page) {
            self.set_tax_id(caps[1].trim());
        }
    }

    fn set_tax_id(&mut self, tax_id: &str) {
        if tax_id != self.tax_id {
            debug!("Tax id header changed to {}", tax_id);
            self.tax_id = tax_id.to_string();
        }
    }
}

impl Default for HeaderContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_carried_until_overwritten() {
        let mut header = HeaderContext::new();
        assert_eq!(header.tax_id, TAX_ID_NOT_FOUND);

        header.update_from_page("Empresa X - 12.345.678/0001-90");
        assert_eq!(header.tax_id, "12.345.678/0001-90");

        header.update_from_page("page without header");
        assert_eq!(header.tax_id, "12.345.678/0001-90");

        header.update_from_page("Empresa Y - 98.765.432/0001-10");
        assert_eq!(header.tax_id, "98.765.432/0001-10");
    }

    #[test]
    fn test_payroll_header() {
        let mut header = HeaderContext::new();
        header.update_from_payroll_page(
            "Razão Social: ACME LTDA CNPJ/CEI:12.345.678/0001-90 Pág: 1\nCód: 1 Nome: A Função: B",
        );
        assert_eq!(header.company, "ACME LTDA");
        assert_eq!(header.tax_id, "12.345.678/0001-90");
    }
}
