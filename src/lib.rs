//! Dashboard for ActivityWatch data exports.
//! An export is loaded once, aggregated into per application usage and printed as summary
//! statistics, a ranked list and chart data. Everything happens in a single pass, nothing is
//! stored between runs.
//!

pub mod aggregate;
pub mod cli;
pub mod export;
pub mod loader;
pub mod report;
pub mod utils;
