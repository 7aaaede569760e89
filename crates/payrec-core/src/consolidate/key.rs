//! Employee keys derived from table rows.

use crate::error::TableError;
use crate::models::{CellValue, EmployeeKey, Table};
use crate::normalize::{parse_code, to_digits_only};
use crate::tabulate::{COL_CODE, COL_PERIOD, COL_TAX_ID};

/// Reads the code, tax id and optional period columns of a table.
#[derive(Debug, Clone, Copy)]
pub struct KeyNormalizer<'t> {
    table: &'t Table,
    code: usize,
    tax_id: usize,
    period: Option<usize>,
}

fn cell_text(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Text(s) => Some(s.clone()),
        CellValue::Number(d) => Some(d.normalize().to_string()),
        CellValue::Missing => None,
    }
}

impl<'t> KeyNormalizer<'t> {
    /// Fails when the table has no code or tax id column. The period column is optional.
    pub fn new(table: &'t Table) -> Result<Self, TableError> {
        let column = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
        };
        Ok(Self {
            table,
            code: column(COL_CODE)?,
            tax_id: column(COL_TAX_ID)?,
            period: table.column_index(COL_PERIOD),
        })
    }

    /// Key of one row.
    pub fn key(&self, row: &[CellValue]) -> EmployeeKey {
        let code = cell_text(&row[self.code])
            .map(|c| parse_code(&c))
            .unwrap_or(0);
        let tax_id = to_digits_only(cell_text(&row[self.tax_id]).as_deref());
        let period_tag = self
            .period
            .and_then(|i| cell_text(&row[i]))
            .map(|p| p.trim().to_string())
            .unwrap_or_default();
        EmployeeKey::new(code, tax_id, period_tag)
    }

    /// Key of every row, in row order.
    pub fn keys(&self) -> Vec<EmployeeKey> {
        self.table.rows().iter().map(|row| self.key(row)).collect()
    }

    /// Whether `name` is one of the key-forming columns.
    pub fn is_key_column(name: &str) -> bool {
        name == COL_CODE || name == COL_TAX_ID || name == COL_PERIOD
    }
}
