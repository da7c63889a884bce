//! Analysis modules.
//!
//! Ranking of points tables ahead of charting and reporting.

pub mod aggregator;

pub use aggregator::*;
