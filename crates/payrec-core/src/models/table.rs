//! Semantic tables handed to display and export.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::TableError;

/// Type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Number,
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Text,
        }
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Number,
        }
    }

    /// Same column under another name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: self.kind,
        }
    }
}

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(Decimal),
    Text(String),
    Missing,
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            CellValue::Number(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

impl From<Decimal> for CellValue {
    fn from(d: Decimal) -> Self {
        CellValue::Number(d)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(d) => write!(f, "{}", d),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Missing => Ok(()),
        }
    }
}

/// Ordered columns with one row of cells per record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create an empty table. Column names must be unique.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row; it must have exactly one cell per column.
    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Same columns over new rows. Callers keep every row at the table width.
    pub(crate) fn with_rows(&self, rows: Vec<Vec<CellValue>>) -> Table {
        debug_assert!(rows.iter().all(|r| r.len() == self.columns.len()));
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Cell at `row` in the named column.
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// Numeric cell at `row`; text and missing cells read as `None`.
    pub fn number(&self, row: usize, column: &str) -> Option<Decimal> {
        self.value(row, column).and_then(CellValue::as_number)
    }

    /// Project onto `names`, in the given order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table, TableError> {
        let indices = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.column_index(name)
                    .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut selected = Table::new(indices.iter().map(|&i| self.columns[i].clone()).collect())?;
        selected.rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample() -> Table {
        let mut table = Table::new(vec![
            Column::text("Código"),
            Column::text("Funcionário"),
            Column::number("Valor"),
        ])
        .unwrap();
        table
            .push_row(vec!["10".into(), "Ana".into(), Decimal::from(5).into()])
            .unwrap();
        table
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let err = Table::new(vec![Column::text("A"), Column::number("A")]).unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("A".to_string()));
    }

    #[test]
    fn test_row_width_checked() {
        let mut table = sample();
        let err = table.push_row(vec!["1".into()]).unwrap_err();
        assert_eq!(err, TableError::RowWidth { expected: 3, actual: 1 });
    }

    #[test]
    fn test_select_reorders() {
        let table = sample();
        let selected = table.select(&["Valor", "Código"]).unwrap();
        assert_eq!(selected.column_names(), vec!["Valor", "Código"]);
        assert_eq!(selected.number(0, "Valor"), Some(Decimal::from(5)));
        assert_eq!(selected.value(0, "Código"), Some(&CellValue::text("10")));
    }

    #[test]
    fn test_select_unknown_column() {
        let err = sample().select(&["Nope"]).unwrap_err();
        assert_eq!(err, TableError::UnknownColumn("Nope".to_string()));
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::Number(Decimal::from_str("12.50").unwrap()).to_string(), "12.50");
        assert_eq!(CellValue::Missing.to_string(), "");
    }
}
