//! Calendar period bucketing (monthly / yearly)

use chrono::{Datelike, NaiveDate};

/// Aggregation bucket granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Monthly,
    Yearly,
}

impl Granularity {
    /// Period key for a date: `YYYY-MM` for monthly, `YYYY` for yearly.
    /// These keys match the period-totals files.
    pub fn key(&self, date: NaiveDate) -> String {
        match self {
            Granularity::Monthly => format!("{:04}-{:02}", date.year(), date.month()),
            Granularity::Yearly => format!("{:04}", date.year()),
        }
    }

    /// Start date of the bucket containing `date`
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        let (year, month) = match self {
            Granularity::Monthly => (date.year(), date.month()),
            Granularity::Yearly => (date.year(), 1),
        };
        // First of a valid month always exists
        NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Granularity::Monthly => "monthly",
            Granularity::Yearly => "yearly",
        })
    }
}

impl std::str::FromStr for Granularity {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monthly" | "month" => Ok(Granularity::Monthly),
            "yearly" | "year" => Ok(Granularity::Yearly),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown granularity: {}",
                other
            ))),
        }
    }
}

/// First and last day of a calendar month
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_first.pred_opt()?))
}

/// First and last day of a calendar year
pub fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}
