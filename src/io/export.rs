//! Optional exports: segmentation CSV and stats summary JSON.
//!
//! The exports are meant to be easy to consume in spreadsheets or
//! downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::{OverviewStats, SegmentStats, Segmentation, TrendStats};
use crate::error::AppError;

/// Write the segmentation table to a CSV file.
pub fn write_segments_csv(path: &Path, segmentation: &Segmentation) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;

    writeln!(file, "business,total_quantity,total_value,active_days,tier")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for row in &segmentation.rows {
        writeln!(
            file,
            "{},{:.4},{:.4},{},{}",
            row.business,
            row.total_quantity,
            row.total_value,
            row.active_days,
            row.tier.display_name(),
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// All stage statistics in one exportable document.
///
/// Stages that failed upstream serialize as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary<'a> {
    pub tool: &'static str,
    pub rows_read: usize,
    pub rows_analyzed: usize,
    pub overview: Option<&'a OverviewStats>,
    pub trend: Option<&'a TrendStats>,
    pub segmentation: Option<&'a SegmentStats>,
}

/// Write the run summary to a JSON file.
pub fn write_summary_json(path: &Path, summary: &RunSummary<'_>) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| AppError::new(2, format!("Failed to serialize summary: {e}")))?;

    std::fs::write(path, json).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to write summary JSON '{}': {e}", path.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SegmentRow, Tier};

    #[test]
    fn segments_csv_round_trips_through_reader() {
        let path = std::env::temp_dir().join("salescope_segments_export.csv");
        let segmentation = Segmentation {
            rows: vec![
                SegmentRow {
                    business: "b3".to_string(),
                    total_quantity: 4.0,
                    total_value: 60.0,
                    active_days: 2,
                    tier: Tier::High,
                },
                SegmentRow {
                    business: "b1".to_string(),
                    total_quantity: 1.0,
                    total_value: 10.0,
                    active_days: 1,
                    tier: Tier::Low,
                },
            ],
            stats: SegmentStats {
                high_value_customers: 1,
                avg_customer_value: 35.0,
                top_customer: "b3".to_string(),
                top_customer_value: 60.0,
            },
        };

        write_segments_csv(&path, &segmentation).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("business,total_quantity,total_value,active_days,tier")
        );
        assert_eq!(lines.next(), Some("b3,4.0000,60.0000,2,High Value"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn summary_json_serializes_missing_stages_as_null() {
        let path = std::env::temp_dir().join("salescope_summary_export.json");
        let summary = RunSummary {
            tool: "salescope",
            rows_read: 10,
            rows_analyzed: 8,
            overview: None,
            trend: None,
            segmentation: None,
        };

        write_summary_json(&path, &summary).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["rows_read"], 10);
        assert!(json["overview"].is_null());

        let _ = std::fs::remove_file(&path);
    }
}
