//! Input/output helpers.
//!
//! - CSV ingest + schema validation (`ingest`)
//! - segmentation/summary exports (`export`)
//! - report-file sink (`report_files`)

pub mod export;
pub mod ingest;
pub mod report_files;

pub use export::*;
pub use ingest::*;
pub use report_files::*;
