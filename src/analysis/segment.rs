//! Customer segmentation by purchasing behavior.

use std::collections::BTreeSet;
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::analysis::features::FeatureTable;
use crate::domain::{SegmentRow, SegmentStats, Segmentation, Tier, Transaction};
use crate::error::StageError;

/// Segment businesses into three value tiers.
///
/// For each business this computes total quantity, total value, and the
/// count of distinct transaction dates, then partitions businesses by total
/// value ascending into equal-frequency buckets: lowest third Low, middle
/// third Medium, highest third High. Bucket sizes differ by at most one.
/// Equal values at a bucket boundary can land in different tiers depending
/// on sort position; that is expected for equal-frequency binning.
pub fn segment_customers(features: &FeatureTable) -> Result<Segmentation, StageError> {
    if features.transactions.is_empty() {
        return Err(StageError::NoData("no transactions for segmentation"));
    }

    let profiles = business_profiles(&features.transactions);
    let n = profiles.len();
    if n < 3 {
        return Err(StageError::InsufficientData(format!(
            "segmentation needs at least 3 distinct businesses, found {n}"
        )));
    }

    // Value-ascending ranks decide tiers. The sort is stable, so ties keep
    // first-appearance order.
    let mut ranked: Vec<(String, f64, f64, usize)> = profiles;
    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut rows: Vec<SegmentRow> = ranked
        .into_iter()
        .enumerate()
        .map(|(rank, (business, total_value, total_quantity, active_days))| SegmentRow {
            business,
            total_quantity,
            total_value,
            active_days,
            tier: tier_for_rank(rank, n),
        })
        .collect();

    // Present highest value first; tier assignment is already done.
    rows.reverse();

    let high_value_customers = rows.iter().filter(|r| r.tier == Tier::High).count();
    let avg_customer_value = rows.iter().map(|r| r.total_value).sum::<f64>() / n as f64;
    let top = &rows[0];

    let stats = SegmentStats {
        high_value_customers,
        avg_customer_value,
        top_customer: top.business.clone(),
        top_customer_value: top.total_value,
    };

    Ok(Segmentation { rows, stats })
}

/// Equal-frequency bucket for a value-ascending rank.
fn tier_for_rank(rank: usize, n: usize) -> Tier {
    match rank * 3 / n {
        0 => Tier::Low,
        1 => Tier::Medium,
        _ => Tier::High,
    }
}

/// Per-business `(name, total_value, total_quantity, distinct dates)`,
/// in first-appearance order.
fn business_profiles(transactions: &[Transaction]) -> Vec<(String, f64, f64, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut value: Vec<f64> = Vec::new();
    let mut quantity: Vec<f64> = Vec::new();
    let mut dates: Vec<BTreeSet<NaiveDate>> = Vec::new();

    for t in transactions {
        let idx = match index.get(t.business.as_str()) {
            Some(&idx) => idx,
            None => {
                let idx = order.len();
                order.push(t.business.clone());
                index.insert(t.business.clone(), idx);
                value.push(0.0);
                quantity.push(0.0);
                dates.push(BTreeSet::new());
                idx
            }
        };
        value[idx] += t.unit_price;
        quantity[idx] += t.quantity;
        dates[idx].insert(t.date);
    }

    order
        .into_iter()
        .enumerate()
        .map(|(idx, business)| (business, value[idx], quantity[idx], dates[idx].len()))
        .collect()
}
