//! Rules command - view and edit the ordered event rule table.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use payrec_core::extract::BatchExtractor;
use payrec_core::rules::{Category, EventRule, RuleTable};

use super::input::{expand_inputs, load_config, read_documents, AnySource};
use super::store::{load_rules, rules_path, save_rules};

/// Arguments for the rules command.
#[derive(Args)]
pub struct RulesArgs {
    /// Rule table file (overrides config)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: RulesCommand,
}

#[derive(Subcommand)]
enum RulesCommand {
    /// List rules in evaluation order
    List,

    /// Add a rule
    Add {
        /// Text searched for in the document
        match_text: String,
        /// Label assigned on match
        event_name: String,
        /// Rule category (extras or payroll)
        #[arg(short = 'k', long, default_value = "extras")]
        category: Category,
        /// 1-based position (appends when omitted)
        #[arg(long)]
        at: Option<usize>,
    },

    /// Remove the rule at a 1-based position
    Remove { position: usize },

    /// Move a rule to another 1-based position
    Move { from: usize, to: usize },

    /// Show how documents are classified
    Test {
        /// Input files or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,
    },
}

fn index(position: usize) -> anyhow::Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("Positions start at 1"))
}

pub fn run(args: RulesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let path = rules_path(&config, args.rules.as_deref());
    let mut rules = load_rules(&path)?;

    match args.command {
        RulesCommand::List => list(&rules),
        RulesCommand::Add {
            match_text,
            event_name,
            category,
            at,
        } => {
            let rule = EventRule::new(match_text, event_name, category);
            match at {
                Some(position) => rules.insert(index(position)?, rule),
                None => rules.push(rule),
            }
            save_rules(&path, &rules)?;
            println!("{} Rule added to {}", style("✓").green(), path.display());
            list(&rules);
        }
        RulesCommand::Remove { position } => {
            let removed = rules
                .remove(index(position)?)
                .ok_or_else(|| anyhow::anyhow!("No rule at position {}", position))?;
            save_rules(&path, &rules)?;
            println!(
                "{} Removed rule {:?} -> {}",
                style("✓").green(),
                removed.match_text,
                removed.event_name
            );
        }
        RulesCommand::Move { from, to } => {
            if !rules.move_rule(index(from)?, index(to)?) {
                anyhow::bail!("No rule at position {}", from);
            }
            save_rules(&path, &rules)?;
            list(&rules);
        }
        RulesCommand::Test { inputs } => {
            let documents = read_documents(&expand_inputs(&inputs)?)?;
            let extractor = BatchExtractor::new(&AnySource)
                .with_header_pages(config.extraction.header_pages);

            for document in &documents {
                match extractor.load(document) {
                    Ok(text) => {
                        let extras = rules.classify_in(&text.header, Category::Extras);
                        let payroll = rules.classify_in(&text.header, Category::Payroll);
                        let marker = if extras.is_unclassified() {
                            style("⚠").yellow()
                        } else {
                            style("✓").green()
                        };
                        println!(
                            "{} {}: extras = {}, period = {}",
                            marker,
                            document.name,
                            extras.label(),
                            if payroll.is_unclassified() {
                                "(main run)".to_string()
                            } else {
                                payroll.period_tag()
                            }
                        );
                    }
                    Err(e) => println!("{} {}: {}", style("✗").red(), document.name, e),
                }
            }
        }
    }

    Ok(())
}

fn list(rules: &RuleTable) {
    if rules.is_empty() {
        println!("{} Rule table is empty", style("ℹ").blue());
        return;
    }
    for (i, rule) in rules.rules().iter().enumerate() {
        println!(
            "{:>3}. [{}] {:?} -> {}",
            i + 1,
            rule.category,
            rule.match_text,
            rule.event_name
        );
    }
}
