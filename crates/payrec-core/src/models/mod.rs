//! Data models: records, keys, tables and configuration.

pub mod config;
pub mod family;
pub mod key;
pub mod record;
pub mod table;

pub use config::{BlockPolicy, JoinMode, PayrecConfig};
pub use family::Family;
pub use key::EmployeeKey;
pub use record::{
    AssistentialRecord, ExtrasRecord, NetPayRecord, PayrollAmounts, PayrollField, PayrollRecord,
};
pub use table::{CellValue, Column, ColumnKind, Table};
