//! Consolidate command - extract every family and merge them per employee.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::debug;

use payrec_core::consolidate::ConsolidationEngine;
use payrec_core::models::{Family, JoinMode};
use payrec_core::tabulate::FamilyTable;

use super::input::{expand_inputs, extract_family, load_config, print_reports, read_documents};
use super::output::{write_table, ColumnChoice, OutputFormat};
use super::store::{load_rules, rules_path};

/// Arguments for the consolidate command.
#[derive(Args)]
pub struct ConsolidateArgs {
    /// Full payroll reports (the consolidation base)
    #[arg(long, num_args = 1.., required = true)]
    payroll: Vec<String>,

    /// Assistential deduction reports
    #[arg(long, num_args = 1..)]
    assistential: Vec<String>,

    /// Net-pay reports
    #[arg(long = "net-pay", num_args = 1..)]
    net_pay: Vec<String>,

    /// Extra-hours and bonus reports
    #[arg(long, num_args = 1..)]
    extras: Vec<String>,

    /// Output directory
    #[arg(short, long, default_value = "payrec-out")]
    output_dir: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Keep employees missing from the payroll table
    #[arg(long)]
    outer: bool,

    /// Comma-separated consolidated columns, in export order
    #[arg(long, conflicts_with = "all_columns")]
    columns: Option<String>,

    /// Export every consolidated column
    #[arg(long)]
    all_columns: bool,

    /// Rule table file (overrides config)
    #[arg(long)]
    rules: Option<PathBuf>,
}

impl ConsolidateArgs {
    fn inputs(&self, family: Family) -> &[String] {
        match family {
            Family::Payroll => &self.payroll,
            Family::Assistential => &self.assistential,
            Family::NetPay => &self.net_pay,
            Family::Extras => &self.extras,
        }
    }
}

pub fn run(args: ConsolidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.outer {
        config.consolidation.join_mode = JoinMode::Outer;
    }
    let rules = load_rules(&rules_path(&config, args.rules.as_deref()))?;

    fs::create_dir_all(&args.output_dir)?;

    let mut tables: Vec<FamilyTable> = Vec::new();
    for family in Family::ALL {
        let patterns = args.inputs(family);
        if patterns.is_empty() {
            debug!("No {} documents given", family);
            continue;
        }

        let documents = read_documents(&expand_inputs(patterns)?)?;
        let (table, reports) = extract_family(family, &documents, &rules, &config)?;
        print_reports(family, &table, &reports);

        let path = args
            .output_dir
            .join(format!("{}.{}", family.slug(), args.format.extension()));
        write_table(&table.table, args.format, Some(&path))?;
        tables.push(table);
    }

    let base = tables.iter().find(|t| t.family == Family::Payroll);
    let secondary: Vec<&FamilyTable> = tables
        .iter()
        .filter(|t| t.family != Family::Payroll)
        .collect();

    let consolidated = ConsolidationEngine::from_config(&config.consolidation)
        .consolidate(base, &secondary)?;

    let choice = ColumnChoice::from_args(args.columns.as_deref(), args.all_columns);
    let export = choice.apply(&consolidated.table, &config)?;
    let path = args
        .output_dir
        .join(format!("consolidated.{}", args.format.extension()));
    write_table(&export, args.format, Some(&path))?;

    eprintln!();
    eprintln!(
        "{} Consolidated {} employee rows in {:?}",
        style("✓").green(),
        consolidated.len(),
        start.elapsed()
    );
    eprintln!("   Written to {}", args.output_dir.display());

    Ok(())
}
