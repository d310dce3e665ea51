//! Terminal charts for the dashboard sink.

pub mod ascii;

pub use ascii::*;
