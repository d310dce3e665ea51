//! CSV ingest and schema validation.
//!
//! This module is responsible for turning the sales CSV into raw records the
//! cleaner can work on.
//!
//! Design goals:
//! - **Strict schema** for required columns, validated once at load time
//!   (clear errors + exit code 2) instead of failing deep inside an
//!   aggregation step
//! - **Null preservation**: empty or unparseable cells become `None` so the
//!   cleaner's forward-fill sees them; the loader never drops a row
//! - **Separation of concerns**: no cleaning or analysis logic here

use std::collections::HashMap;
use std::fs::File;

use csv::StringRecord;

use crate::domain::RawRecord;
use crate::error::{AppError, StageError};

/// Required source columns, matched case-and-spacing exactly.
pub const COL_DATE: &str = "DATE";
pub const COL_CATEGORY: &str = "ANONYMIZED CATEGORY";
pub const COL_BUSINESS: &str = "ANONYMIZED BUSINESS";
pub const COL_QUANTITY: &str = "QUANTITY";
pub const COL_UNIT_PRICE: &str = "UNIT PRICE";

const REQUIRED_COLUMNS: [&str; 5] = [
    COL_DATE,
    COL_CATEGORY,
    COL_BUSINESS,
    COL_QUANTITY,
    COL_UNIT_PRICE,
];

/// Raw table as loaded: dedup and fill have not happened yet.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub records: Vec<RawRecord>,
    pub rows_read: usize,
}

/// Why a load failed, split by how the driver should react.
#[derive(Debug)]
pub enum LoadError {
    /// Unreadable source. The driver logs this and continues; every later
    /// stage then short-circuits on missing input.
    Unavailable(StageError),
    /// Readable file with required columns missing. Fatal, so the schema
    /// problem surfaces immediately instead of deep inside an aggregation.
    Schema(AppError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Unavailable(e) => write!(f, "{e}"),
            LoadError::Schema(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Load the sales CSV into raw records.
pub fn load_sales_csv(path: &std::path::Path) -> Result<RawTable, LoadError> {
    let file = File::open(path).map_err(|e| {
        LoadError::Unavailable(StageError::SourceUnavailable(format!(
            "failed to open '{}': {e}",
            path.display()
        )))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers().map_err(|e| {
        LoadError::Unavailable(StageError::SourceUnavailable(format!(
            "failed to read CSV headers: {e}"
        )))
    })?.clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map).map_err(LoadError::Schema)?;

    let mut records = Vec::new();
    let mut rows_read = 0usize;

    for result in reader.records() {
        rows_read += 1;
        let record = match result {
            Ok(r) => r,
            // A malformed line is dropped rather than aborting the load.
            Err(_) => continue,
        };
        records.push(parse_record(&record, &header_map));
    }

    Ok(RawTable { records, rows_read })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header (e.g. "﻿DATE"). If we don't strip it, schema
    // validation will incorrectly report a missing column. Case and spacing
    // are otherwise matched exactly.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(*c))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::new(
            2,
            format!("Missing required column(s): {}", missing.join(", ")),
        ))
    }
}

fn parse_record(record: &StringRecord, header_map: &HashMap<String, usize>) -> RawRecord {
    RawRecord {
        date: get_cell(record, header_map, COL_DATE),
        category: get_cell(record, header_map, COL_CATEGORY),
        business: get_cell(record, header_map, COL_BUSINESS),
        quantity: parse_opt_f64(get_cell(record, header_map, COL_QUANTITY)),
        unit_price: parse_opt_f64(get_cell(record, header_map, COL_UNIT_PRICE)),
    }
}

fn get_cell(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<String> {
    let idx = *header_map.get(name)?;
    match record.get(idx) {
        Some(s) if !s.is_empty() => Some(s.to_string()),
        _ => None,
    }
}

fn parse_opt_f64(cell: Option<String>) -> Option<f64> {
    let raw = cell?;
    // Exports sometimes thousands-group numeric cells ("1,250").
    let cleaned: String = raw.chars().filter(|&c| c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
