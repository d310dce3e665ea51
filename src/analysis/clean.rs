//! Data cleaning: duplicate removal and forward-fill.

use crate::domain::RawRecord;
use crate::error::StageError;
use crate::io::ingest::RawTable;

/// Cleaned table: no duplicate rows, no nulls except leading ones.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub records: Vec<RawRecord>,
    pub duplicates_removed: usize,
    pub cells_filled: usize,
}

/// Remove exact-duplicate rows and forward-fill missing cells.
///
/// A duplicate is a row equal to an earlier row in all five fields; the
/// first occurrence is kept. Forward-fill replaces each remaining `None`
/// with the nearest preceding non-`None` value in the same column. If the
/// first rows of a column are null they stay null — there is nothing to
/// carry from before row 0.
pub fn clean(table: &RawTable) -> Result<CleanedTable, StageError> {
    if table.records.is_empty() {
        return Err(StageError::NoData("raw table has no rows"));
    }

    let mut records: Vec<RawRecord> = Vec::with_capacity(table.records.len());
    for record in &table.records {
        if !records.contains(record) {
            records.push(record.clone());
        }
    }
    let duplicates_removed = table.records.len() - records.len();

    let cells_filled = forward_fill(&mut records);

    Ok(CleanedTable {
        records,
        duplicates_removed,
        cells_filled,
    })
}

fn forward_fill(records: &mut [RawRecord]) -> usize {
    let mut filled = 0usize;

    let mut last_date: Option<String> = None;
    let mut last_category: Option<String> = None;
    let mut last_business: Option<String> = None;
    let mut last_quantity: Option<f64> = None;
    let mut last_unit_price: Option<f64> = None;

    for r in records.iter_mut() {
        filled += fill_cell(&mut r.date, &mut last_date);
        filled += fill_cell(&mut r.category, &mut last_category);
        filled += fill_cell(&mut r.business, &mut last_business);
        filled += fill_cell(&mut r.quantity, &mut last_quantity);
        filled += fill_cell(&mut r.unit_price, &mut last_unit_price);
    }

    filled
}

fn fill_cell<T: Clone>(cell: &mut Option<T>, carry: &mut Option<T>) -> usize {
    match cell {
        Some(v) => {
            *carry = Some(v.clone());
            0
        }
        None => match carry {
            Some(v) => {
                *cell = Some(v.clone());
                1
            }
            None => 0,
        },
    }
}
