//! Typed records produced by the family extractors.

use std::ops::{Index, IndexMut};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monetary line items and totals of a full-payroll employee block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PayrollField {
    ContractSalary,
    SalaryEarning,
    DsrOvertime,
    Overtime50,
    Overtime100,
    TransportRefund,
    InssSalary,
    IrrfSalary,
    TransportDiscount,
    AssistentialContribution,
    InssCompanyBase,
    InssEmployeeBase,
    FgtsBase,
    Fgts,
    TotalGross,
    TotalDeductions,
    NetPay,
}

impl PayrollField {
    pub const COUNT: usize = 17;

    /// Every field in column order.
    pub const ALL: [PayrollField; Self::COUNT] = [
        PayrollField::ContractSalary,
        PayrollField::SalaryEarning,
        PayrollField::DsrOvertime,
        PayrollField::Overtime50,
        PayrollField::Overtime100,
        PayrollField::TransportRefund,
        PayrollField::InssSalary,
        PayrollField::IrrfSalary,
        PayrollField::TransportDiscount,
        PayrollField::AssistentialContribution,
        PayrollField::InssCompanyBase,
        PayrollField::InssEmployeeBase,
        PayrollField::FgtsBase,
        PayrollField::Fgts,
        PayrollField::TotalGross,
        PayrollField::TotalDeductions,
        PayrollField::NetPay,
    ];

    /// Column label as printed on the report.
    pub fn label(&self) -> &'static str {
        match self {
            PayrollField::ContractSalary => "Salário Base Contratual",
            PayrollField::SalaryEarning => "Salário Provento",
            PayrollField::DsrOvertime => "D.S.R. Sobre Horas Extras",
            PayrollField::Overtime50 => "Horas Extras 50%",
            PayrollField::Overtime100 => "Horas Extras 100%",
            PayrollField::TransportRefund => "Reembolso Vale Transporte",
            PayrollField::InssSalary => "INSS Sobre Salário",
            PayrollField::IrrfSalary => "IRRF Sobre Salário",
            PayrollField::TransportDiscount => "Desc. Vale Transporte",
            PayrollField::AssistentialContribution => "Contribuição Assistencial",
            PayrollField::InssCompanyBase => "Base INSS Empresa",
            PayrollField::InssEmployeeBase => "Base INSS Funcionário",
            PayrollField::FgtsBase => "Base F.G.T.S.",
            PayrollField::Fgts => "F.G.T.S.",
            PayrollField::TotalGross => "Total Proventos",
            PayrollField::TotalDeductions => "Total Descontos",
            PayrollField::NetPay => "Líquido a Receber",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// One value per [`PayrollField`], zero by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PayrollAmounts([Decimal; PayrollField::COUNT]);

impl PayrollAmounts {
    pub fn iter(&self) -> impl Iterator<Item = (PayrollField, Decimal)> + '_ {
        PayrollField::ALL.iter().map(move |f| (*f, self[*f]))
    }

    pub fn is_all_zero(&self) -> bool {
        self.0.iter().all(Decimal::is_zero)
    }

    /// Field-wise sum.
    pub fn add(&mut self, other: &PayrollAmounts) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a += *b;
        }
    }
}

impl Index<PayrollField> for PayrollAmounts {
    type Output = Decimal;

    fn index(&self, field: PayrollField) -> &Decimal {
        &self.0[field.index()]
    }
}

impl IndexMut<PayrollField> for PayrollAmounts {
    fn index_mut(&mut self, field: PayrollField) -> &mut Decimal {
        &mut self.0[field.index()]
    }
}

/// A closed employee block of the full payroll report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayrollRecord {
    pub company: String,
    /// Tax id as printed, or the not-found marker.
    pub tax_id: String,
    pub code: String,
    pub name: String,
    pub role: String,
    pub admission: Option<NaiveDate>,
    /// Sub-run tag; empty for the monthly run.
    pub period_tag: String,
    pub amounts: PayrollAmounts,
    pub source_file: String,
}

/// Employee entry of the union/assistential deduction report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistentialRecord {
    pub tax_id: String,
    pub code: String,
    pub name: String,
    pub role: String,
    pub admission: NaiveDate,
    pub base_salary: Decimal,
    pub contribution: Decimal,
    pub source_file: String,
}

/// One line of the net-pay report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetPayRecord {
    pub tax_id: String,
    pub code: String,
    pub name: String,
    /// Personal tax id as printed (NNN.NNN.NNN-NN).
    pub cpf: String,
    pub pay_date: NaiveDate,
    pub net_amount: Decimal,
    pub period_tag: String,
    pub source_file: String,
}

/// One line of an extra-hours / bonus report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtrasRecord {
    pub tax_id: String,
    /// Canonical code, leading zeros stripped.
    pub code: String,
    pub name: String,
    /// Event label from the rule table.
    pub event: String,
    /// Reference column (hours or quantity), absent in the short layout.
    pub reference: Option<Decimal>,
    pub value: Decimal,
    pub source_file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_matches_index() {
        for (i, field) in PayrollField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }

    #[test]
    fn test_amounts_add_and_zero() {
        let mut a = PayrollAmounts::default();
        assert!(a.is_all_zero());

        let mut b = PayrollAmounts::default();
        b[PayrollField::NetPay] = Decimal::new(90000, 2);
        a.add(&b);
        a.add(&b);
        assert_eq!(a[PayrollField::NetPay], Decimal::new(180000, 2));
        assert!(!a.is_all_zero());
    }
}
