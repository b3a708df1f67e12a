//! Year Filter Module
//! Restricts the cleaned sales table to the order years picked in the UI.

use polars::prelude::*;
use thiserror::Error;

use super::loader::COL_ORDER_DATE;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Year filter failed: {0}")]
    Polars(#[from] PolarsError),
}

/// Year extraction and filtering over `order_date`.
pub struct YearFilter;

impl YearFilter {
    /// Distinct calendar years of `order_date`, newest first.
    pub fn available_years(table: &DataFrame) -> Result<Vec<i32>, FilterError> {
        let years = table
            .clone()
            .lazy()
            .select([col(COL_ORDER_DATE)
                .dt()
                .year()
                .cast(DataType::Int32)
                .alias("year")])
            .collect()?;

        let mut years: Vec<i32> = years
            .column("year")?
            .as_materialized_series()
            .i32()?
            .into_iter()
            .flatten()
            .collect();
        years.sort_unstable();
        years.dedup();
        years.reverse();
        Ok(years)
    }

    /// Retain rows whose order year is in `years`. An empty set keeps
    /// nothing; callers short-circuit that case before aggregating.
    pub fn by_years(table: &DataFrame, years: &[i32]) -> Result<DataFrame, FilterError> {
        let year = col(COL_ORDER_DATE).dt().year().cast(DataType::Int32);
        let membership = years
            .iter()
            .map(|y| year.clone().eq(lit(*y)))
            .reduce(|acc, expr| acc.or(expr))
            .unwrap_or_else(|| lit(false));

        Ok(table.clone().lazy().filter(membership).collect()?)
    }
}
