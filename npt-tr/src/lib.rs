//! npt-tr library - trend statistics over per-period frequency tables
//!
//! Consumes the corpus counts and the per-year percentage tables, computes
//! difference-based and rank-based trend statistics (window delta,
//! Mann-Kendall, Theil-Sen) and clusters frequency time series with
//! seeded k-means.

pub mod cluster;
pub mod delta;
pub mod report;
pub mod stats;
pub mod widetable;
