//! Table export as CSV or JSON.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value};
use tracing::debug;

use payrec_core::models::{CellValue, PayrecConfig, Table};

/// Output format for exported tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Comma-separated values with a header row
    Csv,
    /// JSON array of row objects
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Column selection for the consolidated export.
#[derive(Debug, Clone)]
pub enum ColumnChoice {
    /// Columns named by the user, in their order.
    Explicit(Vec<String>),
    /// Every column.
    All,
    /// The configured default subset.
    Default,
}

impl ColumnChoice {
    pub fn from_args(columns: Option<&str>, all: bool) -> Self {
        match columns {
            _ if all => ColumnChoice::All,
            Some(list) => ColumnChoice::Explicit(
                list.split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect(),
            ),
            None => ColumnChoice::Default,
        }
    }

    /// Project `table`; an unknown or empty explicit selection is an error.
    pub fn apply(&self, table: &Table, config: &PayrecConfig) -> anyhow::Result<Table> {
        let selected = match self {
            ColumnChoice::All => table.clone(),
            ColumnChoice::Explicit(names) if names.is_empty() => {
                anyhow::bail!("Select at least one column")
            }
            ColumnChoice::Explicit(names) => table.select(names.as_slice())?,
            ColumnChoice::Default => {
                table.select(config.export.columns_for(&table.column_names()).as_slice())?
            }
        };
        Ok(selected)
    }
}

fn cell_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Number(d) => d.to_string(),
        CellValue::Text(s) => s.clone(),
        CellValue::Missing => String::new(),
    }
}

fn cell_json(cell: &CellValue) -> Value {
    match cell {
        CellValue::Number(d) => d.to_f64().map(Value::from).unwrap_or(Value::Null),
        CellValue::Text(s) => Value::String(s.clone()),
        CellValue::Missing => Value::Null,
    }
}

pub fn render_table(table: &Table, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(table.column_names())?;
            for row in table.rows() {
                wtr.write_record(row.iter().map(cell_text))?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Json => {
            let names = table.column_names();
            let records: Vec<Value> = table
                .rows()
                .iter()
                .map(|row| {
                    let object: Map<String, Value> = names
                        .iter()
                        .zip(row)
                        .map(|(name, cell)| (name.to_string(), cell_json(cell)))
                        .collect();
                    Value::Object(object)
                })
                .collect();
            Ok(serde_json::to_string_pretty(&records)?)
        }
    }
}

/// Write to `path`, or to stdout when no path is given.
pub fn write_table(table: &Table, format: OutputFormat, path: Option<&Path>) -> anyhow::Result<()> {
    let content = render_table(table, format)?;
    match path {
        Some(path) => {
            fs::write(path, content)?;
            debug!("Wrote {} rows to {}", table.len(), path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use payrec_core::models::Column;
    use rust_decimal::Decimal;

    fn sample() -> Table {
        let mut table = Table::new(vec![Column::text("Código"), Column::number("Valor")]).unwrap();
        table
            .push_row(vec!["10".into(), Decimal::new(15050, 2).into()])
            .unwrap();
        table
    }

    #[test]
    fn test_render_csv() {
        let csv = render_table(&sample(), OutputFormat::Csv).unwrap();
        assert_eq!(csv, "Código,Valor\n10,150.50\n");
    }

    #[test]
    fn test_render_json() {
        let json = render_table(&sample(), OutputFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["Código"], "10");
        assert_eq!(value[0]["Valor"], 150.5);
    }

    #[test]
    fn test_column_choice() {
        let config = PayrecConfig::default();
        let table = sample();

        let picked = ColumnChoice::from_args(Some("Valor, Código"), false)
            .apply(&table, &config)
            .unwrap();
        assert_eq!(picked.column_names(), vec!["Valor", "Código"]);

        let all = ColumnChoice::from_args(Some("Valor"), true).apply(&table, &config).unwrap();
        assert_eq!(all.column_names(), vec!["Código", "Valor"]);

        let default = ColumnChoice::from_args(None, false).apply(&table, &config).unwrap();
        assert_eq!(default.column_names(), vec!["Código"]);

        assert!(ColumnChoice::from_args(Some("Nope"), false)
            .apply(&table, &config)
            .is_err());
    }

    #[test]
    fn test_empty_selection_refused() {
        let config = PayrecConfig::default();
        for list in ["", ",", " , "] {
            let err = ColumnChoice::from_args(Some(list), false)
                .apply(&sample(), &config)
                .unwrap_err();
            assert_eq!(err.to_string(), "Select at least one column");
        }
    }
}
