//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the analysis code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::analysis::insights::fmt_money;
use crate::app::pipeline::RunOutput;
use crate::domain::{GroupTotals, Segmentation};

/// Format the full run summary (row counts + per-stage highlights).
pub fn format_run_summary(run: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("=== salescope - Sales Analysis ===\n");
    out.push_str(&format!("Rows read: {}\n", run.rows_read));
    out.push_str(&format!(
        "Rows analyzed: {} (duplicates removed: {}, unparseable dropped: {})\n",
        run.rows_analyzed, run.duplicates_removed, run.rows_dropped
    ));

    if let Some(overview) = &run.overview {
        out.push_str(&format!(
            "Top category: {} ({})\n",
            overview.stats.top_category,
            fmt_money(overview.stats.top_category_value)
        ));
        out.push_str(&format!(
            "Total sales value: {}\n",
            fmt_money(overview.stats.total_sales_value)
        ));
    }
    if let Some(trend) = &run.trend {
        out.push_str(&format!(
            "Peak period: {} ({})\n",
            trend.stats.peak_period,
            fmt_money(trend.stats.peak_period_value)
        ));
        out.push_str(&format!(
            "Average period value: {}\n",
            fmt_money(trend.stats.avg_period_value)
        ));
    }
    if let Some(segmentation) = &run.segmentation {
        out.push_str(&format!(
            "High-value customers: {} | top customer: {} ({})\n",
            segmentation.stats.high_value_customers,
            segmentation.stats.top_customer,
            fmt_money(segmentation.stats.top_customer_value)
        ));
    }

    for (stage, err) in &run.failures {
        out.push_str(&format!("(stage {stage} skipped) {err}\n"));
    }

    out
}

/// Format the segmentation table.
pub fn format_segments(segmentation: &Segmentation) -> String {
    let mut out = String::new();

    out.push_str("Customer segmentation:\n");
    out.push_str(
        format!(
            "{:<24} {:>12} {:>14} {:>12} {:<12}\n",
            "business", "quantity", "value", "active_days", "tier"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<24} {:-<12} {:-<14} {:-<12} {:-<12}\n",
            "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for row in &segmentation.rows {
        out.push_str(
            format!(
                "{:<24} {:>12.2} {:>14.2} {:>12} {:<12}\n",
                truncate(&row.business, 24),
                row.total_quantity,
                row.total_value,
                row.active_days,
                row.tier.display_name(),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format a `{key, quantity, value}` aggregate table.
pub fn format_totals(title: &str, groups: &[GroupTotals]) -> String {
    let mut out = String::new();

    out.push_str(title);
    out.push_str(":\n");
    out.push_str(
        format!("{:<24} {:>12} {:>14}\n", "key", "quantity", "value").trim_end(),
    );
    out.push('\n');

    for g in groups {
        out.push_str(
            format!(
                "{:<24} {:>12.2} {:>14.2}\n",
                truncate(&g.key, 24),
                g.quantity,
                g.value
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SegmentRow, SegmentStats, Tier};

    #[test]
    fn segment_table_lists_every_business() {
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
                    business: "a-business-with-a-very-long-name".to_string(),
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

        let txt = format_segments(&segmentation);
        assert!(txt.contains("b3"));
        assert!(txt.contains("High Value"));
        // Long names are truncated with a trailing dot.
        assert!(txt.contains("a-business-with-a-very-."));
    }

    #[test]
    fn totals_table_renders_rows_in_order() {
        let groups = vec![
            GroupTotals { key: "A".into(), quantity: 12.0, value: 6.5 },
            GroupTotals { key: "B".into(), quantity: 3.0, value: 7.0 },
        ];
        let txt = format_totals("Category totals", &groups);
        let a_pos = txt.find("A ").unwrap();
        let b_pos = txt.find("B ").unwrap();
        assert!(a_pos < b_pos);
    }
}
