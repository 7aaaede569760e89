//! Row grouping shared by the family tables and the consolidation join.

use std::collections::HashMap;
use std::hash::Hash;

use crate::models::{CellValue, Table};

/// Whether a text cell holds no information.
pub(crate) fn is_default_text(cell: &CellValue, placeholder: &str) -> bool {
    match cell {
        CellValue::Missing => true,
        CellValue::Text(s) => s.trim().is_empty() || s == placeholder,
        CellValue::Number(_) => false,
    }
}

fn merge_cell(acc: &mut CellValue, cell: &CellValue, placeholder: &str) {
    if let (CellValue::Number(a), CellValue::Number(b)) = (&mut *acc, cell) {
        *a += *b;
        return;
    }
    if cell.is_missing() {
        return;
    }
    if acc.is_missing()
        || (is_default_text(acc, placeholder) && !is_default_text(cell, placeholder))
    {
        *acc = cell.clone();
    }
}

/// Collapse rows that share a key.
///
/// `keys[i]` is the key of row `i`. Numeric cells are summed, text cells keep
/// the first value that is neither empty nor `placeholder`. Groups come out in
/// order of first appearance. Returns the grouped table and one key per row.
pub(crate) fn group_rows<K>(table: &Table, keys: &[K], placeholder: &str) -> (Table, Vec<K>)
where
    K: Hash + Eq + Clone,
{
    let mut index: HashMap<&K, usize> = HashMap::new();
    let mut grouped_keys: Vec<K> = Vec::new();
    let mut grouped_rows: Vec<Vec<CellValue>> = Vec::new();

    for (row, key) in table.rows().iter().zip(keys) {
        match index.get(key) {
            Some(&slot) => {
                for (acc, cell) in grouped_rows[slot].iter_mut().zip(row) {
                    merge_cell(acc, cell, placeholder);
                }
            }
            None => {
                index.insert(key, grouped_rows.len());
                grouped_keys.push(key.clone());
                grouped_rows.push(row.clone());
            }
        }
    }

    (table.with_rows(grouped_rows), grouped_keys)
}
