//! Rule table persisted as CSV (`match_text,event_name,category`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use payrec_core::models::PayrecConfig;
use payrec_core::rules::{EventRule, RuleTable};

/// The `--rules` override, else the configured path.
pub fn rules_path(config: &PayrecConfig, explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.rules.path.clone())
}

/// Read the rule table; a missing file gives the built-in rules.
pub fn load_rules(path: &Path) -> anyhow::Result<RuleTable> {
    if !path.exists() {
        info!("No rule table at {}, using built-in rules", path.display());
        return Ok(RuleTable::builtin());
    }

    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open rule table {}", path.display()))?;
    let rules = rdr
        .deserialize::<EventRule>()
        .collect::<Result<RuleTable, _>>()
        .with_context(|| format!("Invalid rule table {}", path.display()))?;

    debug!("Loaded {} rules from {}", rules.len(), path.display());
    Ok(rules)
}

pub fn save_rules(path: &Path, rules: &RuleTable) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::Writer::from_path(path)?;
    if rules.is_empty() {
        wtr.write_record(["match_text", "event_name", "category"])?;
    }
    for rule in rules.rules() {
        wtr.serialize(rule)?;
    }
    wtr.flush()?;

    debug!("Saved {} rules to {}", rules.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use payrec_core::rules::Category;

    #[test]
    fn test_missing_file_gives_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let rules = load_rules(&dir.path().join("rules.csv")).unwrap();
        assert_eq!(rules, RuleTable::builtin());
    }

    #[test]
    fn test_save_and_load_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rules.csv");
        let rules: RuleTable = vec![
            EventRule::new("Prêmio, Anual", "Prêmio", Category::Extras),
            EventRule::new("Adiantamento", "Adiantamento", Category::Payroll),
        ]
        .into_iter()
        .collect();

        save_rules(&path, &rules).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("match_text,event_name,category\n"));

        assert_eq!(load_rules(&path).unwrap(), rules);
    }

    #[test]
    fn test_empty_table_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.csv");
        save_rules(&path, &RuleTable::default()).unwrap();
        assert!(load_rules(&path).unwrap().is_empty());
    }
}
