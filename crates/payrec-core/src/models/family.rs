//! The four report families.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A document type with its own line grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// Full payroll sheet; the consolidation base.
    Payroll,
    /// Union/assistential deduction report.
    Assistential,
    /// Net-pay report.
    NetPay,
    /// Extra-hours and bonus reports.
    Extras,
}

impl Family {
    pub const ALL: [Family; 4] = [
        Family::Payroll,
        Family::Assistential,
        Family::NetPay,
        Family::Extras,
    ];

    /// Families joined onto the payroll base, in join order.
    pub const SECONDARY: [Family; 3] = [Family::Assistential, Family::NetPay, Family::Extras];

    /// Stable identifier, also the suffix of renamed columns.
    pub fn slug(&self) -> &'static str {
        match self {
            Family::Payroll => "payroll",
            Family::Assistential => "assistential",
            Family::NetPay => "net_pay",
            Family::Extras => "extras",
        }
    }

    /// Human-readable name.
    pub fn title(&self) -> &'static str {
        match self {
            Family::Payroll => "Folha",
            Family::Assistential => "Assistencial",
            Family::NetPay => "Líquido",
            Family::Extras => "Extras",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "payroll" | "folha" => Ok(Family::Payroll),
            "assistential" | "assistencial" => Ok(Family::Assistential),
            "net_pay" | "liquido" | "líquido" => Ok(Family::NetPay),
            "extras" => Ok(Family::Extras),
            other => Err(format!("unknown document family: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_family() {
        assert_eq!("net-pay".parse::<Family>().unwrap(), Family::NetPay);
        assert_eq!("Folha".parse::<Family>().unwrap(), Family::Payroll);
        assert!("bonus".parse::<Family>().is_err());
    }

    #[test]
    fn test_slug_round_trips() {
        for family in Family::ALL {
            assert_eq!(family.slug().parse::<Family>().unwrap(), family);
        }
    }
}
