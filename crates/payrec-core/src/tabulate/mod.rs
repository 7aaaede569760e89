//! Family tables built from extracted records.
//!
//! Each family has its own finishing step: payroll rows are de-duplicated
//! and grouped, extras are pivoted to one column per event, assistential and
//! net-pay rows are optionally grouped by employee key.

mod group;

pub(crate) use group::{group_rows, is_default_text};

use std::collections::{BTreeSet, HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::TableError;
use crate::models::config::ExtractionConfig;
use crate::models::{
    AssistentialRecord, CellValue, Column, EmployeeKey, ExtrasRecord, Family, NetPayRecord,
    PayrollField, PayrollRecord, Table,
};
use crate::normalize::{parse_code, to_digits_only, DATE_FORMAT};

pub const COL_CODE: &str = "Código";
pub const COL_TAX_ID: &str = "CNPJ";
pub const COL_PERIOD: &str = "Período";
pub const COL_COMPANY: &str = "Empresa";
pub const COL_NAME: &str = "Funcionário";
pub const COL_ROLE: &str = "Função";
pub const COL_ADMISSION: &str = "Admissão";
pub const COL_SOURCE: &str = "Arquivo";
pub const COL_BASE_SALARY: &str = "Salário Base";
pub const COL_ASSISTENTIAL: &str = "Valor Assistencial";
pub const COL_CPF: &str = "CPF";
pub const COL_PAY_DATE: &str = "Data Pagamento";
pub const COL_NET_PAY: &str = "Valor Líquido";
pub const COL_TOTAL: &str = "Total";

/// Columns the employee key is derived from.
pub const KEY_COLUMNS: [&str; 3] = [COL_CODE, COL_TAX_ID, COL_PERIOD];

/// The finished table of one report family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyTable {
    pub family: Family,
    pub table: Table,
}

impl FamilyTable {
    pub fn new(family: Family, table: Table) -> Self {
        Self { family, table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Columns an extras event name may not take over.
const EXTRAS_FIXED_COLUMNS: [&str; 5] = [COL_TAX_ID, COL_CODE, COL_NAME, COL_PERIOD, COL_TOTAL];

/// Key fields of a payroll row, everything except amounts and source file.
///
/// Code and tax id are compared in their normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PayrollGroup<'a> {
    company: &'a str,
    tax_id: String,
    code: u64,
    name: &'a str,
    role: &'a str,
    admission: Option<chrono::NaiveDate>,
    period_tag: &'a str,
}

impl<'a> From<&'a PayrollRecord> for PayrollGroup<'a> {
    fn from(r: &'a PayrollRecord) -> Self {
        Self {
            company: &r.company,
            tax_id: to_digits_only(Some(&r.tax_id)),
            code: parse_code(&r.code),
            name: &r.name,
            role: &r.role,
            admission: r.admission,
            period_tag: &r.period_tag,
        }
    }
}

/// Collapse payroll records into one per employee block identity.
///
/// Exact duplicates (ignoring the source file) are dropped first, then rows
/// whose amounts are all zero, then the rest is grouped by company, tax id,
/// code, name, role, admission date and period tag with amounts summed. Codes
/// and tax ids match once normalized (`0010` is `10`). Each group keeps the
/// source file of its first row. Running it twice gives the same result.
pub fn group_payroll(records: &[PayrollRecord]) -> Vec<PayrollRecord> {
    let mut seen: HashSet<(PayrollGroup<'_>, &crate::models::PayrollAmounts)> = HashSet::new();
    let mut slots: HashMap<PayrollGroup<'_>, usize> = HashMap::new();
    let mut grouped: Vec<PayrollRecord> = Vec::new();
    let mut dropped_zero = 0usize;

    for record in records {
        let group = PayrollGroup::from(record);
        if !seen.insert((group.clone(), &record.amounts)) {
            continue;
        }
        if record.amounts.is_all_zero() {
            dropped_zero += 1;
            continue;
        }
        match slots.get(&group) {
            Some(&slot) => grouped[slot].amounts.add(&record.amounts),
            None => {
                slots.insert(group, grouped.len());
                grouped.push(record.clone());
            }
        }
    }

    debug!(
        "Grouped {} payroll records into {} ({} all-zero dropped)",
        records.len(),
        grouped.len(),
        dropped_zero
    );
    grouped
}

/// Builds the four family tables.
#[derive(Debug, Clone, Copy)]
pub struct TableBuilder {
    group_duplicates: bool,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self {
            group_duplicates: true,
        }
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            group_duplicates: config.group_duplicates,
        }
    }

    /// Whether assistential and net-pay rows sharing a key are merged.
    pub fn with_group_duplicates(mut self, group: bool) -> Self {
        self.group_duplicates = group;
        self
    }

    /// Full payroll table, grouped as in [`group_payroll`].
    ///
    /// Rows left with the same employee key (a name or role spelled two ways)
    /// are then merged, so every key appears once.
    pub fn payroll(&self, records: &[PayrollRecord]) -> Result<FamilyTable, TableError> {
        let mut columns = vec![
            Column::text(COL_COMPANY),
            Column::text(COL_TAX_ID),
            Column::text(COL_CODE),
            Column::text(COL_NAME),
            Column::text(COL_ROLE),
            Column::text(COL_ADMISSION),
            Column::text(COL_PERIOD),
        ];
        columns.extend(PayrollField::ALL.iter().map(|f| Column::number(f.label())));
        columns.push(Column::text(COL_SOURCE));

        let mut table = Table::new(columns)?;
        let mut keys = Vec::new();
        for record in group_payroll(records) {
            keys.push(row_key(&record.code, &record.tax_id, &record.period_tag));
            let mut row: Vec<CellValue> = vec![
                record.company.into(),
                record.tax_id.into(),
                record.code.into(),
                record.name.into(),
                record.role.into(),
                record
                    .admission
                    .map(|d| d.format(DATE_FORMAT).to_string())
                    .unwrap_or_default()
                    .into(),
                record.period_tag.into(),
            ];
            row.extend(record.amounts.iter().map(|(_, v)| CellValue::Number(v)));
            row.push(record.source_file.into());
            table.push_row(row)?;
        }

        let (table, _) = group_rows(&table, &keys, "");
        Ok(FamilyTable::new(Family::Payroll, table))
    }

    /// Assistential table. No period column: these rows belong to the main run.
    pub fn assistential(&self, records: &[AssistentialRecord]) -> Result<FamilyTable, TableError> {
        let mut table = Table::new(vec![
            Column::text(COL_TAX_ID),
            Column::text(COL_CODE),
            Column::text(COL_NAME),
            Column::text(COL_ROLE),
            Column::text(COL_ADMISSION),
            Column::number(COL_BASE_SALARY),
            Column::number(COL_ASSISTENTIAL),
            Column::text(COL_SOURCE),
        ])?;
        let mut keys = Vec::with_capacity(records.len());
        for r in records {
            keys.push(row_key(&r.code, &r.tax_id, ""));
            table.push_row(vec![
                r.tax_id.as_str().into(),
                r.code.as_str().into(),
                r.name.as_str().into(),
                r.role.as_str().into(),
                r.admission.format(DATE_FORMAT).to_string().into(),
                r.base_salary.into(),
                r.contribution.into(),
                r.source_file.as_str().into(),
            ])?;
        }

        Ok(FamilyTable::new(Family::Assistential, self.maybe_group(table, &keys)))
    }

    /// Net-pay table.
    pub fn net_pay(&self, records: &[NetPayRecord]) -> Result<FamilyTable, TableError> {
        let mut table = Table::new(vec![
            Column::text(COL_TAX_ID),
            Column::text(COL_CODE),
            Column::text(COL_NAME),
            Column::text(COL_CPF),
            Column::text(COL_PAY_DATE),
            Column::number(COL_NET_PAY),
            Column::text(COL_PERIOD),
            Column::text(COL_SOURCE),
        ])?;
        let mut keys = Vec::with_capacity(records.len());
        for r in records {
            keys.push(row_key(&r.code, &r.tax_id, &r.period_tag));
            table.push_row(vec![
                r.tax_id.as_str().into(),
                r.code.as_str().into(),
                r.name.as_str().into(),
                r.cpf.as_str().into(),
                r.pay_date.format(DATE_FORMAT).to_string().into(),
                r.net_amount.into(),
                r.period_tag.as_str().into(),
                r.source_file.as_str().into(),
            ])?;
        }

        Ok(FamilyTable::new(Family::NetPay, self.maybe_group(table, &keys)))
    }

    /// Extras pivot: one row per employee, one column per event plus a total.
    ///
    /// Event columns are sorted by name; an employee without an event gets 0.
    /// An event named like a fixed column gets an `(evento)` suffix.
    pub fn extras(&self, records: &[ExtrasRecord]) -> Result<FamilyTable, TableError> {
        let event_columns: BTreeSet<String> =
            records.iter().map(|r| event_column(&r.event)).collect();
        let column_index: HashMap<&str, usize> = event_columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();
        let clashing: BTreeSet<&str> = records
            .iter()
            .map(|r| r.event.as_str())
            .filter(|e| EXTRAS_FIXED_COLUMNS.contains(e))
            .collect();
        for event in clashing {
            warn!("Event {:?} clashes with a fixed column, renamed", event);
        }

        let mut columns = vec![
            Column::text(COL_TAX_ID),
            Column::text(COL_CODE),
            Column::text(COL_NAME),
        ];
        columns.extend(event_columns.iter().map(|c| Column::number(c.as_str())));
        columns.push(Column::number(COL_TOTAL));
        let mut table = Table::new(columns)?;

        let mut slots: HashMap<EmployeeKey, usize> = HashMap::new();
        let mut pivot: Vec<(&ExtrasRecord, Vec<Decimal>)> = Vec::new();
        for r in records {
            let slot = *slots
                .entry(row_key(&r.code, &r.tax_id, ""))
                .or_insert_with(|| {
                    pivot.push((r, vec![Decimal::ZERO; event_columns.len()]));
                    pivot.len() - 1
                });
            if let Some(&column) = column_index.get(event_column(&r.event).as_str()) {
                pivot[slot].1[column] += r.value;
            }
        }

        for (first, values) in pivot {
            let total: Decimal = values.iter().sum();
            let mut row: Vec<CellValue> = vec![
                first.tax_id.as_str().into(),
                first.code.as_str().into(),
                first.name.as_str().into(),
            ];
            row.extend(values.into_iter().map(CellValue::Number));
            row.push(total.into());
            table.push_row(row)?;
        }

        debug!(
            "Pivoted {} extras lines into {} rows over {} events",
            records.len(),
            table.len(),
            event_columns.len()
        );
        Ok(FamilyTable::new(Family::Extras, table))
    }

    fn maybe_group(&self, table: Table, keys: &[EmployeeKey]) -> Table {
        if self.group_duplicates {
            group_rows(&table, keys, "").0
        } else {
            table
        }
    }
}

fn event_column(event: &str) -> String {
    if EXTRAS_FIXED_COLUMNS.contains(&event) {
        format!("{} (evento)", event)
    } else {
        event.to_string()
    }
}

fn row_key(code: &str, tax_id: &str, period_tag: &str) -> EmployeeKey {
    EmployeeKey::new(parse_code(code), to_digits_only(Some(tax_id)), period_tag)
}
