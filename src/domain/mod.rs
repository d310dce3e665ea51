//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw and typed transaction rows (`RawRecord`, `Transaction`)
//! - aggregate and segmentation outputs (`GroupTotals`, `SegmentRow`, `Tier`)
//! - per-stage statistic structs consumed by the insight generator
//! - the resolved run configuration (`AnalysisConfig`)

pub mod types;

pub use types::*;
