//! Category, business, and period aggregations.
//!
//! Each grouping sums `{quantity, value}` where `value` is the row's unit
//! price. Grouping keys are case-sensitive exact matches and exist only when
//! at least one row maps to them — there are no zero-filled keys. Key order
//! is first appearance in the input, which keeps tables, plots, and the
//! top-N tie-break deterministic.

use std::collections::HashMap;

use crate::analysis::features::FeatureTable;
use crate::domain::{GroupTotals, OverviewStats, SalesOverview, Transaction, TrendReport, TrendStats};
use crate::error::StageError;

/// Sum `{quantity, value}` per distinct key, in first-appearance order.
pub fn group_totals<F>(transactions: &[Transaction], key_of: F) -> Vec<GroupTotals>
where
    F: Fn(&Transaction) -> &str,
{
    let mut order: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut totals: Vec<(f64, f64)> = Vec::new();

    for t in transactions {
        let key = key_of(t);
        let idx = match index.get(key) {
            Some(&idx) => idx,
            None => {
                let idx = order.len();
                order.push(key.to_string());
                index.insert(key.to_string(), idx);
                totals.push((0.0, 0.0));
                idx
            }
        };
        totals[idx].0 += t.quantity;
        totals[idx].1 += t.unit_price;
    }

    order
        .into_iter()
        .zip(totals)
        .map(|(key, (quantity, value))| GroupTotals {
            key,
            quantity,
            value,
        })
        .collect()
}

/// The group with the maximum `value`.
///
/// Ties resolve to the earliest-seen key (strict `>` over first-appearance
/// order). Every consumer of the top pick goes through this routine, so the
/// overview stats and the product-strategy recomputation always agree.
pub fn top_by_value(groups: &[GroupTotals]) -> Option<&GroupTotals> {
    let mut best: Option<&GroupTotals> = None;
    for g in groups {
        match best {
            Some(b) if g.value > b.value => best = Some(g),
            None => best = Some(g),
            _ => {}
        }
    }
    best
}

/// Per-category and per-business totals plus overview statistics.
pub fn sales_overview(features: &FeatureTable) -> Result<SalesOverview, StageError> {
    if features.transactions.is_empty() {
        return Err(StageError::NoData("no transactions for sales overview"));
    }

    let by_category = group_totals(&features.transactions, |t| &t.category);
    let by_business = group_totals(&features.transactions, |t| &t.business);

    // by_category is non-empty whenever transactions is.
    let top = top_by_value(&by_category).ok_or(StageError::NoData("no category totals"))?;

    let stats = OverviewStats {
        top_category: top.key.clone(),
        top_category_value: top.value,
        total_sales_value: by_category.iter().map(|g| g.value).sum(),
    };

    Ok(SalesOverview {
        by_category,
        by_business,
        stats,
    })
}

/// Per-period totals plus trend statistics.
pub fn trends_over_time(features: &FeatureTable) -> Result<TrendReport, StageError> {
    if features.transactions.is_empty() {
        return Err(StageError::NoData("no transactions for trend analysis"));
    }

    let by_period = group_totals(&features.transactions, |t| &t.period);
    let peak = top_by_value(&by_period).ok_or(StageError::NoData("no period totals"))?;

    let stats = TrendStats {
        peak_period: peak.key.clone(),
        peak_period_value: peak.value,
        avg_period_value: by_period.iter().map(|g| g.value).sum::<f64>() / by_period.len() as f64,
    };

    Ok(TrendReport { by_period, stats })
}
