//! Trend statistics: Mann-Kendall rank test and Theil-Sen slope estimate

mod mann_kendall;
mod theil_sen;

pub use mann_kendall::{mann_kendall, MannKendall, Trend};
pub use theil_sen::{theil_sen, TheilSen};
