//! Feature derivation: date parsing and the month-year period label.

use chrono::NaiveDate;

use crate::analysis::clean::CleanedTable;
use crate::domain::Transaction;

/// Date formats accepted by the source, tried in order.
///
/// The list is fixed and ordered so parsing stays deterministic for
/// ambiguous inputs (d/m vs m/d).
const DATE_FORMATS: [&str; 5] = [
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
];

/// Feature table: fully typed transactions, period label attached.
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    pub transactions: Vec<Transaction>,
    /// Rows dropped because their date failed to parse or a leading null
    /// survived forward-fill.
    pub rows_dropped: usize,
}

/// Parse dates, drop unparseable rows, and derive the period label.
///
/// Zero parseable rows yields an empty table, not an error; downstream
/// stages produce empty aggregates for it.
pub fn derive_features(cleaned: &CleanedTable) -> FeatureTable {
    let mut transactions = Vec::with_capacity(cleaned.records.len());
    let mut rows_dropped = 0usize;

    for r in &cleaned.records {
        let parsed = r.date.as_deref().and_then(parse_date);
        match (parsed, &r.category, &r.business, r.quantity, r.unit_price) {
            (Some(date), Some(category), Some(business), Some(quantity), Some(unit_price)) => {
                transactions.push(Transaction {
                    date,
                    period: period_label(date),
                    category: category.clone(),
                    business: business.clone(),
                    quantity,
                    unit_price,
                });
            }
            _ => rows_dropped += 1,
        }
    }

    FeatureTable {
        transactions,
        rows_dropped,
    }
}

/// Parse a raw date cell against the accepted formats.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS.iter().find_map(|fmt| {
        if fmt.contains("%H") {
            chrono::NaiveDateTime::parse_from_str(s, fmt)
                .ok()
                .map(|dt| dt.date())
        } else {
            NaiveDate::parse_from_str(s, fmt).ok()
        }
    })
}

/// Month-year bucket label, e.g. `"January 2024"`.
pub fn period_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawRecord;

    fn cleaned(records: Vec<RawRecord>) -> CleanedTable {
        CleanedTable {
            records,
            duplicates_removed: 0,
            cells_filled: 0,
        }
    }

    fn complete(date: &str) -> RawRecord {
        RawRecord {
            date: Some(date.to_string()),
            category: Some("Category-A".to_string()),
            business: Some("Business-1".to_string()),
            quantity: Some(10.0),
            unit_price: Some(5.0),
        }
    }

    #[test]
    fn derives_period_label() {
        let table = cleaned(vec![complete("2024-01-15")]);
        let features = derive_features(&table);
        assert_eq!(features.transactions.len(), 1);
        assert_eq!(features.transactions[0].period, "January 2024");
    }

    #[test]
    fn accepts_mixed_date_formats() {
        let table = cleaned(vec![
            complete("2024-01-15"),
            complete("2024-01-15 08:26:00"),
            complete("15/01/2024"),
        ]);
        let features = derive_features(&table);
        assert_eq!(features.transactions.len(), 3);
        assert!(
            features
                .transactions
                .iter()
                .all(|t| t.period == "January 2024")
        );
    }

    #[test]
    fn drops_unparseable_dates_without_error() {
        let table = cleaned(vec![complete("not-a-date"), complete("2024-02-01")]);
        let features = derive_features(&table);
        assert_eq!(features.transactions.len(), 1);
        assert_eq!(features.rows_dropped, 1);
    }

    #[test]
    fn all_unparseable_yields_empty_table() {
        let table = cleaned(vec![complete("???"), complete("13/13/2024x")]);
        let features = derive_features(&table);
        assert!(features.transactions.is_empty());
        assert_eq!(features.rows_dropped, 2);
    }

    #[test]
    fn drops_rows_with_leading_nulls() {
        let mut leading = complete("2024-01-15");
        leading.business = None;
        let table = cleaned(vec![leading, complete("2024-01-15")]);
        let features = derive_features(&table);
        assert_eq!(features.transactions.len(), 1);
        assert_eq!(features.rows_dropped, 1);
    }

    #[test]
    fn idempotent_on_own_output() {
        let table = cleaned(vec![complete("2024-01-15"), complete("2024-03-02")]);
        let first = derive_features(&table);

        // Re-deriving from the already-typed rows must not change the count.
        let rerun_input = cleaned(
            first
                .transactions
                .iter()
                .map(|t| RawRecord {
                    date: Some(t.date.format("%Y-%m-%d").to_string()),
                    category: Some(t.category.clone()),
                    business: Some(t.business.clone()),
                    quantity: Some(t.quantity),
                    unit_price: Some(t.unit_price),
                })
                .collect(),
        );
        let second = derive_features(&rerun_input);
        assert_eq!(second.transactions.len(), first.transactions.len());
        assert_eq!(second.rows_dropped, 0);
    }
}
