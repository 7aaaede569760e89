//! Cross-report consolidation.
//!
//! Every family table is keyed by [`EmployeeKey`](crate::models::EmployeeKey)
//! through [`KeyNormalizer`]; [`ConsolidationEngine`] then joins the secondary
//! tables onto the payroll base and aggregates rows sharing a key.

mod engine;
mod key;

pub use engine::{renamed_column, Consolidated, ConsolidationEngine};
pub use key::KeyNormalizer;
