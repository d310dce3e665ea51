//! The sequential analysis driver shared by all subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> clean -> features -> aggregate -> segment -> insights
//!
//! Stage failures are deliberately non-fatal: each failure is logged and
//! recorded, and the driver keeps invoking later stages, which re-check
//! their own inputs and short-circuit. A missing source therefore produces
//! a cascade of diagnostics rather than an aborted process; only a schema
//! violation in a readable file is fatal.

use std::fmt;

use tracing::warn;

use crate::analysis::clean::clean;
use crate::analysis::features::{FeatureTable, derive_features};
use crate::analysis::insights::{InsightReport, generate_insights};
use crate::analysis::{sales_overview, segment_customers, trends_over_time};
use crate::domain::{AnalysisConfig, SalesOverview, Segmentation, TrendReport};
use crate::error::{AppError, StageError};
use crate::io::ingest::{LoadError, load_sales_csv};

/// Pipeline stage identifiers, used in failure diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Clean,
    Overview,
    Trends,
    Segmentation,
    Insights,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Clean => "clean",
            Stage::Overview => "overview",
            Stage::Trends => "trends",
            Stage::Segmentation => "segmentation",
            Stage::Insights => "insights",
        };
        write!(f, "{name}")
    }
}

/// All computed outputs of a single run.
///
/// Stages that failed are `None`; their reasons are in `failures`.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub rows_read: usize,
    pub rows_analyzed: usize,
    pub duplicates_removed: usize,
    pub rows_dropped: usize,
    pub features: FeatureTable,
    pub overview: Option<SalesOverview>,
    pub trend: Option<TrendReport>,
    pub segmentation: Option<Segmentation>,
    pub insights: Option<InsightReport>,
    pub failures: Vec<(Stage, StageError)>,
}

/// Execute the full analysis pipeline and return the computed outputs.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let mut out = RunOutput::default();

    // 1) Load. An unreadable source is recorded and everything downstream
    //    short-circuits; a schema violation aborts with a clear error.
    let raw = match load_sales_csv(&config.csv_path) {
        Ok(raw) => Some(raw),
        Err(LoadError::Schema(err)) => return Err(err),
        Err(LoadError::Unavailable(err)) => {
            record_failure(&mut out, Stage::Load, err);
            None
        }
    };
    if let Some(raw) = &raw {
        out.rows_read = raw.rows_read;
    }

    // 2) Clean: dedup + forward-fill.
    let cleaned = raw.as_ref().and_then(|raw| match clean(raw) {
        Ok(cleaned) => Some(cleaned),
        Err(err) => {
            record_failure(&mut out, Stage::Clean, err);
            None
        }
    });
    if let Some(cleaned) = &cleaned {
        out.duplicates_removed = cleaned.duplicates_removed;
    }

    // 3) Features: date parse + period label. Empty output is legal.
    if let Some(cleaned) = &cleaned {
        out.features = derive_features(cleaned);
        out.rows_dropped = out.features.rows_dropped;
        out.rows_analyzed = out.features.transactions.len();
    }

    // 4) Aggregations (independent of each other).
    out.overview = match sales_overview(&out.features) {
        Ok(v) => Some(v),
        Err(err) => {
            record_failure(&mut out, Stage::Overview, err);
            None
        }
    };
    out.trend = match trends_over_time(&out.features) {
        Ok(v) => Some(v),
        Err(err) => {
            record_failure(&mut out, Stage::Trends, err);
            None
        }
    };

    // 5) Segmentation.
    out.segmentation = match segment_customers(&out.features) {
        Ok(v) => Some(v),
        Err(err) => {
            record_failure(&mut out, Stage::Segmentation, err);
            None
        }
    };

    // 6) Insights, from whatever stage results exist.
    out.insights = match generate_insights(
        &out.features,
        out.overview.as_ref().map(|o| &o.stats),
        out.trend.as_ref(),
        out.segmentation.as_ref().map(|s| &s.stats),
        config.retention_months,
        config.top_periods,
    ) {
        Ok(v) => Some(v),
        Err(err) => {
            record_failure(&mut out, Stage::Insights, err);
            None
        }
    };

    Ok(out)
}

fn record_failure(out: &mut RunOutput, stage: Stage, err: StageError) {
    warn!(%stage, error = %err, "stage failed, continuing");
    out.failures.push((stage, err));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn config_for(path: PathBuf) -> AnalysisConfig {
        AnalysisConfig {
            csv_path: path,
            output_dir: std::env::temp_dir(),
            retention_months: 3,
            top_periods: 3,
            plot: false,
            plot_width: 80,
            plot_height: 15,
            export_segments: None,
            export_summary: None,
        }
    }

    #[test]
    fn full_pipeline_end_to_end() {
        let path = write_temp_csv(
            "salescope_pipeline_full.csv",
            "DATE,ANONYMIZED CATEGORY,ANONYMIZED BUSINESS,QUANTITY,UNIT PRICE\n\
             2024-01-05,Category-A,Business-1,10,5.0\n\
             2024-01-05,Category-A,Business-1,10,5.0\n\
             2024-02-14,Category-B,Business-2,3,7.0\n\
             2024-02-20,Category-A,Business-3,8,2.5\n\
             2024-06-01,Category-C,Business-2,1,30.0\n",
        );

        let run = run_analysis(&config_for(path)).unwrap();

        assert_eq!(run.rows_read, 5);
        assert_eq!(run.duplicates_removed, 1);
        assert_eq!(run.rows_analyzed, 4);
        assert!(run.failures.is_empty());

        let overview = run.overview.as_ref().unwrap();
        assert_eq!(overview.by_category.len(), 3);

        let segmentation = run.segmentation.as_ref().unwrap();
        assert_eq!(segmentation.rows.len(), 3);

        let insights = run.insights.as_ref().unwrap();
        // Business-1 and Business-3 are stale relative to 2024-06-01.
        assert!(
            insights
                .customer_retention
                .contains("2 businesses have reduced activity")
        );
    }

    #[test]
    fn missing_source_cascades_without_aborting() {
        let run = run_analysis(&config_for(PathBuf::from("/nonexistent/sales.csv"))).unwrap();

        assert!(run.overview.is_none());
        assert!(run.insights.is_none());

        let stages: Vec<Stage> = run.failures.iter().map(|(s, _)| *s).collect();
        assert!(stages.contains(&Stage::Load));
        assert!(stages.contains(&Stage::Overview));
        assert!(stages.contains(&Stage::Insights));
    }

    #[test]
    fn unparseable_dates_leave_empty_aggregates() {
        let path = write_temp_csv(
            "salescope_pipeline_baddates.csv",
            "DATE,ANONYMIZED CATEGORY,ANONYMIZED BUSINESS,QUANTITY,UNIT PRICE\n\
             not-a-date,Category-A,Business-1,10,5.0\n\
             also-bad,Category-B,Business-2,3,7.0\n",
        );

        let run = run_analysis(&config_for(path)).unwrap();
        assert_eq!(run.rows_analyzed, 0);
        assert_eq!(run.rows_dropped, 2);
        assert!(run.overview.is_none());
        assert!(
            run.failures
                .iter()
                .any(|(s, e)| *s == Stage::Overview && matches!(e, StageError::NoData(_)))
        );
    }

    #[test]
    fn two_businesses_fail_segmentation_only() {
        let path = write_temp_csv(
            "salescope_pipeline_twobiz.csv",
            "DATE,ANONYMIZED CATEGORY,ANONYMIZED BUSINESS,QUANTITY,UNIT PRICE\n\
             2024-01-05,Category-A,Business-1,10,5.0\n\
             2024-02-14,Category-B,Business-2,3,7.0\n",
        );

        let run = run_analysis(&config_for(path)).unwrap();
        assert!(run.overview.is_some());
        assert!(run.trend.is_some());
        assert!(run.segmentation.is_none());
        assert!(run.insights.is_some());
        assert!(
            run.failures
                .iter()
                .any(|(s, e)| *s == Stage::Segmentation
                    && matches!(e, StageError::InsufficientData(_)))
        );
    }
}
