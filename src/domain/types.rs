//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during the analysis stages
//! - exported to CSV/JSON
//! - rendered into terminal tables and report files

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A raw ingested row, nulls preserved.
///
/// Every field is optional: the cleaner is responsible for forward-filling
/// missing cells, so the loader must not invent values or reject rows. A
/// numeric cell that fails to parse is treated the same as an empty cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub date: Option<String>,
    pub category: Option<String>,
    pub business: Option<String>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
}

impl RawRecord {
    /// True if no cell is missing.
    pub fn is_complete(&self) -> bool {
        self.date.is_some()
            && self.category.is_some()
            && self.business.is_some()
            && self.quantity.is_some()
            && self.unit_price.is_some()
    }
}

/// A fully typed transaction produced by the feature stage.
///
/// Rows whose date cannot be parsed, or which still carry a leading null
/// after forward-fill, never become a `Transaction`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Month-year bucket label, e.g. `"January 2024"`.
    pub period: String,
    pub category: String,
    pub business: String,
    pub quantity: f64,
    pub unit_price: f64,
}

/// Summed totals for one grouping key (category, business, or period).
///
/// `value` is the summed unit price over the group's rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotals {
    pub key: String,
    pub quantity: f64,
    pub value: f64,
}

/// Customer value tier assigned by equal-frequency tri-partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    /// Human-readable label for terminal and report output.
    pub fn display_name(self) -> &'static str {
        match self {
            Tier::Low => "Low Value",
            Tier::Medium => "Medium Value",
            Tier::High => "High Value",
        }
    }
}

/// One business in the segmentation table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRow {
    pub business: String,
    pub total_quantity: f64,
    pub total_value: f64,
    /// Count of distinct transaction dates for this business.
    pub active_days: usize,
    pub tier: Tier,
}

/// Statistics captured by the sales-overview aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewStats {
    pub top_category: String,
    pub top_category_value: f64,
    pub total_sales_value: f64,
}

/// Statistics captured by the period-trend aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendStats {
    pub peak_period: String,
    pub peak_period_value: f64,
    pub avg_period_value: f64,
}

/// Statistics captured by customer segmentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentStats {
    pub high_value_customers: usize,
    pub avg_customer_value: f64,
    pub top_customer: String,
    pub top_customer_value: f64,
}

/// Output of the sales-overview stage: two independent groupings plus stats.
#[derive(Debug, Clone)]
pub struct SalesOverview {
    pub by_category: Vec<GroupTotals>,
    pub by_business: Vec<GroupTotals>,
    pub stats: OverviewStats,
}

/// Output of the trends stage: per-period totals plus stats.
#[derive(Debug, Clone)]
pub struct TrendReport {
    pub by_period: Vec<GroupTotals>,
    pub stats: TrendStats,
}

/// Output of the segmentation stage.
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub rows: Vec<SegmentRow>,
    pub stats: SegmentStats,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub csv_path: PathBuf,
    /// Directory under which report files are written.
    pub output_dir: PathBuf,
    /// Retention lookback window in calendar months (inclusive).
    pub retention_months: u32,
    /// How many peak periods to surface in the operational-efficiency section.
    pub top_periods: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_segments: Option<PathBuf>,
    pub export_summary: Option<PathBuf>,
}
