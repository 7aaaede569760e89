//! Extract command - one report family into one table.

use std::path::PathBuf;

use clap::Args;

use payrec_core::models::{BlockPolicy, Family};

use super::input::{expand_inputs, extract_family, load_config, print_reports, read_documents};
use super::output::{write_table, OutputFormat};
use super::store::{load_rules, rules_path};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Report family (payroll, assistential, net-pay, extras)
    #[arg(short = 't', long = "family")]
    family: Family,

    /// Input files or glob patterns (.pdf or .txt)
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Rule table file (overrides config)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Fail a payroll document when an employee block never closes
    #[arg(long)]
    strict: bool,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if args.strict {
        config.extraction.block_policy = BlockPolicy::Strict;
    }
    let rules = load_rules(&rules_path(&config, args.rules.as_deref()))?;

    let files = expand_inputs(&args.inputs)?;
    let documents = read_documents(&files)?;

    let (table, reports) = extract_family(args.family, &documents, &rules, &config)?;
    print_reports(args.family, &table, &reports);

    write_table(&table.table, args.format, args.output.as_deref())?;

    if reports.iter().all(|r| !r.is_success()) {
        anyhow::bail!("No document of the batch could be processed");
    }
    Ok(())
}
