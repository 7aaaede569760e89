//! Composite employee-period key shared by every join.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one employee in one pay run of one company.
///
/// Two rows with equal keys are the same employee-period and are always
/// merged. The period tag is empty for the main monthly run and carries the
/// sub-run label (e.g. `Adiantamento`) otherwise, so an advance and the
/// monthly run never collapse into one row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeKey {
    /// Numeric employee code; non-numeric codes are 0.
    pub code: u64,
    /// Digits-only company tax id, or the not-found placeholder.
    pub tax_id: String,
    /// Sub-period tag; empty for the main run.
    pub period_tag: String,
}

impl EmployeeKey {
    pub fn new(code: u64, tax_id: impl Into<String>, period_tag: impl Into<String>) -> Self {
        Self {
            code,
            tax_id: tax_id.into(),
            period_tag: period_tag.into(),
        }
    }
}

impl fmt::Display for EmployeeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.period_tag.is_empty() {
            write!(f, "{}@{}", self.code, self.tax_id)
        } else {
            write!(f, "{}@{} [{}]", self.code, self.tax_id, self.period_tag)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_tag_distinguishes_keys() {
        let monthly = EmployeeKey::new(5, "111", "");
        let advance = EmployeeKey::new(5, "111", "Adiantamento");
        assert_ne!(monthly, advance);
        assert_eq!(monthly, EmployeeKey::new(5, "111".to_string(), String::new()));
    }

    #[test]
    fn test_display() {
        assert_eq!(EmployeeKey::new(5, "111", "").to_string(), "5@111");
        assert_eq!(
            EmployeeKey::new(5, "111", "Adiantamento").to_string(),
            "5@111 [Adiantamento]"
        );
    }
}
