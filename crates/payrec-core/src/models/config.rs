//! Configuration structures for the extraction and consolidation pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::PayrecError;

/// Main configuration for payrec.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrecConfig {
    /// Record extraction configuration.
    pub extraction: ExtractionConfig,

    /// Consolidation configuration.
    pub consolidation: ConsolidationConfig,

    /// Export configuration.
    pub export: ExportConfig,

    /// Rule table location.
    pub rules: RulesConfig,
}

/// What to do with an employee block that opens but never closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockPolicy {
    /// Discard the block with a warning and keep going.
    #[default]
    Lenient,
    /// Fail the document.
    Strict,
}

/// Record extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Number of leading pages used to classify a document.
    pub header_pages: usize,

    /// Handling of unclosed employee blocks.
    pub block_policy: BlockPolicy,

    /// Merge assistential and net-pay rows that share a key.
    pub group_duplicates: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            header_pages: 2,
            block_policy: BlockPolicy::Lenient,
            group_duplicates: true,
        }
    }
}

/// How secondary tables attach to the payroll base table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinMode {
    /// Keep only employees present in the payroll table.
    #[default]
    Left,
    /// Keep employees present in any table.
    Outer,
}

/// Consolidation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    /// Join mode.
    pub join_mode: JoinMode,

    /// Text written into textual cells with no contributing row.
    pub text_placeholder: String,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            join_mode: JoinMode::Left,
            text_placeholder: "-".to_string(),
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Consolidated columns exported when the user picks none.
    /// Empty means every column.
    pub default_columns: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_columns: [
                "Código",
                "CNPJ",
                "Período",
                "Empresa",
                "Funcionário",
                "Função",
                "Salário Base Contratual",
                "Total Proventos",
                "Total Descontos",
                "Líquido a Receber",
                "Valor Assistencial_assistential",
                "Valor Líquido_net_pay",
                "Total_extras",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl ExportConfig {
    /// Default columns that exist in a table with `available` columns,
    /// in declared order. Falls back to every column.
    pub fn columns_for(&self, available: &[&str]) -> Vec<String> {
        let picked: Vec<String> = self
            .default_columns
            .iter()
            .filter(|c| available.contains(&c.as_str()))
            .cloned()
            .collect();

        if picked.is_empty() {
            available.iter().map(|s| s.to_string()).collect()
        } else {
            picked
        }
    }
}

/// Rule table location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Delimited rule table file.
    pub path: PathBuf,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("rules.csv"),
        }
    }
}

impl PayrecConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| PayrecError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| PayrecError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
