//! Report-file sink.
//!
//! Writes one plain-text file per insight section plus a completion marker,
//! and two static advisory documents. The layout is fixed:
//!
//! ```text
//! <out>/strategic_insights_recommendations/insights_overview.txt
//! <out>/strategic_insights_recommendations/product_strategy.txt
//! <out>/strategic_insights_recommendations/customer_retention.txt
//! <out>/strategic_insights_recommendations/operational_efficiency.txt
//! <out>/strategic_insights_recommendations/completion_status.txt
//! <out>/bonus_questions/scalability_solutions.txt
//! <out>/bonus_questions/predictive_analysis.txt
//! ```

use std::fs;
use std::path::Path;

use crate::analysis::insights::InsightReport;
use crate::error::AppError;

const INSIGHTS_DIR: &str = "strategic_insights_recommendations";
const ADVISORY_DIR: &str = "bonus_questions";

const COMPLETION_MARKER: &str = "Strategic Insights and Recommendations completed!";

/// Fixed reference text on scaling this analysis; not derived from data.
const SCALABILITY_NOTES: &str = "\
Scalability Recommendations:

1. Data Storage:
- Implement distributed storage using Hadoop/HDFS or cloud solutions (AWS S3)
- Partition data by date ranges for efficient querying
- Use columnar storage formats like Parquet for better compression
- Use database sharding to distribute data across multiple servers
- Ensure the database follows ACID properties
- Implement database replication for high availability and fault tolerance
- Use database indexing to optimize query performance
- Implement database backup and recovery procedures

2. Processing Optimization:
- Leverage Apache Spark for distributed data processing
- Implement data streaming for real-time analysis
- Use caching strategies for frequently accessed data
- Use event-driven architecture to handle data streaming
- Implement data processing pipelines for transformation and loading
- Implement dead-letter queues to handle failed messages
- Implement monitoring and alerting for system performance and errors
- Implement data quality checks and validation processes
- Implement data versioning and auditing to track changes
- Implement data masking and anonymization for sensitive information
- Use retry and exponential backoff strategies for data processing
";

/// Fixed reference text on predictive modeling; not derived from data.
const PREDICTIVE_NOTES: &str = "\
Predictive Analysis Framework:

1. External Factors to Consider:
- Economic indicators: GDP, inflation rates, consumer price index
- Seasonal factors: weather patterns, holidays, events
- Market dynamics: competitor pricing, new market entrants
- Supply chain metrics: supplier reliability, lead times

2. Proposed Methodology:
- Time series models (SARIMA) incorporating seasonal components
- Machine learning models (XGBoost, Random Forests) for multi-factor analysis
- Neural networks for complex pattern recognition
- Regular model retraining pipeline for accuracy maintenance
";

/// Write all insight sections and the completion marker.
pub fn write_insight_files(out_dir: &Path, report: &InsightReport) -> Result<(), AppError> {
    let dir = out_dir.join(INSIGHTS_DIR);
    fs::create_dir_all(&dir).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create report directory '{}': {e}", dir.display()),
        )
    })?;

    write_file(&dir.join("insights_overview.txt"), &report.overview)?;
    write_file(&dir.join("product_strategy.txt"), &report.product_strategy)?;
    write_file(&dir.join("customer_retention.txt"), &report.customer_retention)?;
    write_file(
        &dir.join("operational_efficiency.txt"),
        &report.operational_efficiency,
    )?;
    write_file(&dir.join("completion_status.txt"), COMPLETION_MARKER)?;

    Ok(())
}

/// Write the two static advisory documents.
pub fn write_advisory_files(out_dir: &Path) -> Result<(), AppError> {
    let dir = out_dir.join(ADVISORY_DIR);
    fs::create_dir_all(&dir).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create advisory directory '{}': {e}", dir.display()),
        )
    })?;

    write_file(&dir.join("scalability_solutions.txt"), SCALABILITY_NOTES)?;
    write_file(&dir.join("predictive_analysis.txt"), PREDICTIVE_NOTES)?;

    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<(), AppError> {
    fs::write(path, contents)
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))
}
