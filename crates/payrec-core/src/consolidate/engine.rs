//! Joins the family tables onto the payroll base.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ConsolidationError, TableError};
use crate::models::config::ConsolidationConfig;
use crate::models::{CellValue, Column, ColumnKind, EmployeeKey, Family, JoinMode, Table};
use crate::tabulate::{group_rows, is_default_text, FamilyTable, COL_CODE, COL_PERIOD, COL_TAX_ID};

use super::KeyNormalizer;

/// Name a secondary column takes in the consolidated table.
pub fn renamed_column(column: &str, family: Family) -> String {
    format!("{}_{}", column, family.slug())
}

/// One source table, reduced to its data columns and pre-grouped by key.
struct Source {
    family: Family,
    columns: Vec<Column>,
    rows: HashMap<EmployeeKey, Vec<CellValue>>,
    order: Vec<EmployeeKey>,
}

impl Source {
    fn prepare(input: &FamilyTable, rename: bool, placeholder: &str) -> Result<Self, TableError> {
        let table = &input.table;
        let keys = KeyNormalizer::new(table)?.keys();

        let picks: Vec<(usize, Column)> = table
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, c)| !KeyNormalizer::is_key_column(&c.name))
            .map(|(i, c)| {
                let column = if rename {
                    c.renamed(renamed_column(&c.name, input.family))
                } else {
                    c.clone()
                };
                (i, column)
            })
            .collect();

        let mut data = Table::new(picks.iter().map(|(_, c)| c.clone()).collect())?;
        for row in table.rows() {
            data.push_row(picks.iter().map(|(i, _)| row[*i].clone()).collect())?;
        }

        let (grouped, order) = group_rows(&data, &keys, placeholder);
        if grouped.len() < data.len() {
            debug!(
                "{}: {} rows collapsed to {} keys before join",
                input.family,
                data.len(),
                grouped.len()
            );
        }

        let rows = order
            .iter()
            .cloned()
            .zip(grouped.rows().iter().cloned())
            .collect();

        Ok(Self {
            family: input.family,
            columns: grouped.columns().to_vec(),
            rows,
            order,
        })
    }
}

/// The consolidated table plus the key of every row.
#[derive(Debug, Clone, Serialize)]
pub struct Consolidated {
    pub table: Table,
    pub keys: Vec<EmployeeKey>,
}

impl Consolidated {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Row of `key`, if present.
    pub fn row(&self, key: &EmployeeKey) -> Option<&[CellValue]> {
        let index = self.keys.iter().position(|k| k == key)?;
        self.table.rows().get(index).map(Vec::as_slice)
    }

    /// Cell of `key` in the named column.
    pub fn value(&self, key: &EmployeeKey, column: &str) -> Option<&CellValue> {
        let index = self.keys.iter().position(|k| k == key)?;
        self.table.value(index, column)
    }
}

/// Merges the payroll table with the secondary family tables.
#[derive(Debug, Clone)]
pub struct ConsolidationEngine {
    join_mode: JoinMode,
    placeholder: String,
}

impl Default for ConsolidationEngine {
    fn default() -> Self {
        Self::from_config(&ConsolidationConfig::default())
    }
}

impl ConsolidationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ConsolidationConfig) -> Self {
        Self {
            join_mode: config.join_mode,
            placeholder: config.text_placeholder.clone(),
        }
    }

    pub fn with_join_mode(mut self, mode: JoinMode) -> Self {
        self.join_mode = mode;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Join `secondary` onto `base`.
    ///
    /// Secondary data columns are suffixed with their family slug. Every input
    /// is grouped by key first, so repeated keys in a secondary table add up
    /// instead of multiplying base rows. Cells with no contributing row are 0
    /// for numbers and the placeholder for text.
    pub fn consolidate(
        &self,
        base: Option<&FamilyTable>,
        secondary: &[&FamilyTable],
    ) -> crate::Result<Consolidated> {
        let base = match base {
            None => {
                warn!("Consolidation requested without a payroll table");
                return Err(ConsolidationError::MissingBase.into());
            }
            Some(b) if b.is_empty() => {
                warn!("Consolidation requested with an empty payroll table");
                return Err(ConsolidationError::EmptyBase.into());
            }
            Some(b) => b,
        };

        let mut secondary: Vec<&FamilyTable> = secondary.to_vec();
        secondary.sort_by_key(|t| {
            Family::SECONDARY
                .iter()
                .position(|f| *f == t.family)
                .unwrap_or(Family::SECONDARY.len())
        });

        let mut sources = vec![Source::prepare(base, false, &self.placeholder)?];
        for table in secondary {
            sources.push(Source::prepare(table, true, &self.placeholder)?);
        }

        let keys = self.joined_keys(&sources);

        let mut columns = vec![
            Column::text(COL_CODE),
            Column::text(COL_TAX_ID),
            Column::text(COL_PERIOD),
        ];
        for source in &sources {
            columns.extend(source.columns.iter().cloned());
        }
        let mut joined = Table::new(columns)?;

        for key in &keys {
            let mut row: Vec<CellValue> = vec![
                key.code.to_string().into(),
                key.tax_id.as_str().into(),
                key.period_tag.as_str().into(),
            ];
            for source in &sources {
                match source.rows.get(key) {
                    Some(cells) => row.extend(
                        cells
                            .iter()
                            .zip(&source.columns)
                            .map(|(cell, column)| self.fill(cell, column)),
                    ),
                    None => row.extend(
                        source
                            .columns
                            .iter()
                            .map(|column| self.fill(&CellValue::Missing, column)),
                    ),
                }
            }
            joined.push_row(row)?;
        }

        let (table, keys) = group_rows(&joined, &keys, &self.placeholder);

        info!(
            "Consolidated {} rows from {} ({})",
            table.len(),
            sources
                .iter()
                .map(|s| s.family.slug())
                .collect::<Vec<_>>()
                .join(", "),
            match self.join_mode {
                JoinMode::Left => "left join",
                JoinMode::Outer => "outer join",
            }
        );

        Ok(Consolidated { table, keys })
    }

    /// Base keys in order; in outer mode, followed by keys only secondaries have.
    fn joined_keys(&self, sources: &[Source]) -> Vec<EmployeeKey> {
        let Some((base, rest)) = sources.split_first() else {
            return Vec::new();
        };
        let mut keys = base.order.clone();
        if self.join_mode == JoinMode::Outer {
            let mut seen: HashSet<EmployeeKey> = keys.iter().cloned().collect();
            for source in rest {
                for key in &source.order {
                    if seen.insert(key.clone()) {
                        keys.push(key.clone());
                    }
                }
            }
        }
        keys
    }

    fn fill(&self, cell: &CellValue, column: &Column) -> CellValue {
        match column.kind {
            ColumnKind::Number => match cell {
                CellValue::Number(_) => cell.clone(),
                _ => CellValue::Number(Decimal::ZERO),
            },
            ColumnKind::Text => {
                if is_default_text(cell, &self.placeholder) {
                    CellValue::text(self.placeholder.as_str())
                } else {
                    cell.clone()
                }
            }
        }
    }
}
