//! The sequential analysis stages.
//!
//! Responsibilities:
//!
//! - deduplicate and forward-fill the raw table (`clean`)
//! - parse dates and derive the period label (`features`)
//! - category/business/period aggregations (`aggregate`)
//! - customer value-tier segmentation (`segment`)
//! - strategic insight sections (`insights`)

pub mod aggregate;
pub mod clean;
pub mod features;
pub mod insights;
pub mod segment;

pub use aggregate::*;
pub use clean::*;
pub use features::*;
pub use insights::*;
pub use segment::*;
