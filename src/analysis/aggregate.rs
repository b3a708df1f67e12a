//! Aggregation Module
//! Stateless group-by projections over the filtered sales table. Every call
//! is one lazy Polars pass collected into plain row structs, so the chart
//! layer never touches a DataFrame.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{COL_ORDER_DATE, COL_TOTAL_SALES};

const YEAR_KEY: &str = "year";
const MONTH_KEY: &str = "month";
const COL_ORDERS: &str = "orders";

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Aggregation failed: {0}")]
    Polars(#[from] PolarsError),
}

/// Time-bucket resolution for trend views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Granularity {
    #[default]
    Monthly,
    Yearly,
}

impl Granularity {
    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Monthly => "Monthly",
            Granularity::Yearly => "Yearly",
        }
    }
}

/// Total sales for one value of a grouping dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionSum {
    pub key: String,
    pub total_sales: f64,
}

/// Order count for one observed (primary, secondary) combination.
/// Unobserved combinations are never emitted; consumers read them as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PairCount {
    pub primary: String,
    pub secondary: String,
    pub orders: u32,
}

/// Order count for one value of a field.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueCount {
    pub value: String,
    pub orders: u32,
}

/// One time bucket of the global trend.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub period: String,
    pub total_sales: f64,
}

/// One (time bucket, series) point of a multi-series trend.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTrendPoint {
    pub period: String,
    pub series: String,
    pub total_sales: f64,
}

/// Group-by/sum/count projections of the filtered table.
pub struct Aggregator;

impl Aggregator {
    /// Sum `total_sales` per value of `dimension`, highest first.
    ///
    /// Ties keep first-encounter order; `top_n` truncates after sorting.
    /// Negative sales figures are summed as-is.
    pub fn sum_by_dimension(
        table: &DataFrame,
        dimension: &str,
        top_n: Option<usize>,
    ) -> Result<Vec<DimensionSum>, AggregateError> {
        let mut sums = table
            .clone()
            .lazy()
            // Rows with a null group key are not a group (gender and
            // product_name survive loading with nulls).
            .drop_nulls(Some(vec![col(dimension)]))
            .group_by_stable([col(dimension)])
            .agg([col(COL_TOTAL_SALES).sum()])
            .sort_by_exprs(
                vec![col(COL_TOTAL_SALES)],
                SortMultipleOptions {
                    descending: vec![true],
                    maintain_order: true,
                    ..Default::default()
                },
            );
        if let Some(n) = top_n {
            sums = sums.limit(n as IdxSize);
        }
        let sums = sums.collect()?;

        let keys = string_values(&sums, dimension)?;
        let totals = f64_values(&sums, COL_TOTAL_SALES)?;
        Ok(keys
            .into_iter()
            .zip(totals)
            .map(|(key, total_sales)| DimensionSum { key, total_sales })
            .collect())
    }

    /// Count rows for every observed combination of two fields, sorted by
    /// the field values.
    pub fn count_by_pair(
        table: &DataFrame,
        field_a: &str,
        field_b: &str,
    ) -> Result<Vec<PairCount>, AggregateError> {
        let counts = table
            .clone()
            .lazy()
            .drop_nulls(Some(vec![col(field_a), col(field_b)]))
            .group_by_stable([col(field_a), col(field_b)])
            .agg([len().alias(COL_ORDERS)])
            .sort_by_exprs(
                vec![col(field_a), col(field_b)],
                SortMultipleOptions::default(),
            )
            .collect()?;

        let primaries = string_values(&counts, field_a)?;
        let secondaries = string_values(&counts, field_b)?;
        let orders = u32_values(&counts, COL_ORDERS)?;
        Ok(primaries
            .into_iter()
            .zip(secondaries)
            .zip(orders)
            .map(|((primary, secondary), orders)| PairCount {
                primary,
                secondary,
                orders,
            })
            .collect())
    }

    /// Count rows per distinct value of `field`, most frequent first.
    /// Ties keep first-encounter order.
    pub fn frequency_rank(table: &DataFrame, field: &str) -> Result<Vec<ValueCount>, AggregateError> {
        let counts = table
            .clone()
            .lazy()
            .drop_nulls(Some(vec![col(field)]))
            .group_by_stable([col(field)])
            .agg([len().alias(COL_ORDERS)])
            .sort_by_exprs(
                vec![col(COL_ORDERS)],
                SortMultipleOptions {
                    descending: vec![true],
                    maintain_order: true,
                    ..Default::default()
                },
            )
            .collect()?;

        let values = string_values(&counts, field)?;
        let orders = u32_values(&counts, COL_ORDERS)?;
        Ok(values
            .into_iter()
            .zip(orders)
            .map(|(value, orders)| ValueCount { value, orders })
            .collect())
    }

    /// Sum `total_sales` per calendar bucket of `order_date`, oldest first.
    ///
    /// Period labels are fixed-width (`2023` / `2023-04`) so plain string
    /// order is chronological. Buckets with no records are not synthesized.
    pub fn trend(
        table: &DataFrame,
        granularity: Granularity,
    ) -> Result<Vec<TrendPoint>, AggregateError> {
        let buckets = Self::bucketed(table, granularity, None)?;
        let labels = period_labels(&buckets, granularity)?;
        let totals = f64_values(&buckets, COL_TOTAL_SALES)?;
        Ok(labels
            .into_iter()
            .zip(totals)
            .map(|(period, total_sales)| TrendPoint {
                period,
                total_sales,
            })
            .collect())
    }

    /// Like [`Aggregator::trend`], with one sum per (bucket, `series_field`
    /// value) pair. Sorted by bucket, then series value.
    pub fn trend_by(
        table: &DataFrame,
        granularity: Granularity,
        series_field: &str,
    ) -> Result<Vec<SeriesTrendPoint>, AggregateError> {
        let buckets = Self::bucketed(table, granularity, Some(series_field))?;
        let labels = period_labels(&buckets, granularity)?;
        let series = string_values(&buckets, series_field)?;
        let totals = f64_values(&buckets, COL_TOTAL_SALES)?;
        Ok(labels
            .into_iter()
            .zip(series)
            .zip(totals)
            .map(|((period, series), total_sales)| SeriesTrendPoint {
                period,
                series,
                total_sales,
            })
            .collect())
    }

    /// The `k` values of `entity_field` with the highest summed sales.
    /// Tie order is deterministic: first encounter in the table wins.
    pub fn top_k(
        table: &DataFrame,
        entity_field: &str,
        k: usize,
    ) -> Result<Vec<String>, AggregateError> {
        Ok(Self::sum_by_dimension(table, entity_field, Some(k))?
            .into_iter()
            .map(|entry| entry.key)
            .collect())
    }

    /// Keep only rows whose `field` value is one of `values`.
    pub fn restrict_to(
        table: &DataFrame,
        field: &str,
        values: &[String],
    ) -> Result<DataFrame, AggregateError> {
        let membership = values
            .iter()
            .map(|value| col(field).eq(lit(value.as_str())))
            .reduce(|acc, expr| acc.or(expr))
            .unwrap_or_else(|| lit(false));
        Ok(table.clone().lazy().filter(membership).collect()?)
    }

    fn bucketed(
        table: &DataFrame,
        granularity: Granularity,
        series_field: Option<&str>,
    ) -> Result<DataFrame, AggregateError> {
        let mut keys = vec![col(YEAR_KEY)];
        if granularity == Granularity::Monthly {
            keys.push(col(MONTH_KEY));
        }
        let mut lazy = table.clone().lazy();
        if let Some(field) = series_field {
            keys.push(col(field));
            lazy = lazy.drop_nulls(Some(vec![col(field)]));
        }

        Ok(lazy
            .with_columns([
                col(COL_ORDER_DATE)
                    .dt()
                    .year()
                    .cast(DataType::Int32)
                    .alias(YEAR_KEY),
                col(COL_ORDER_DATE)
                    .dt()
                    .month()
                    .cast(DataType::Int32)
                    .alias(MONTH_KEY),
            ])
            .group_by_stable(keys.clone())
            .agg([col(COL_TOTAL_SALES).sum()])
            .sort_by_exprs(keys, SortMultipleOptions::default())
            .collect()?)
    }
}

fn period_labels(buckets: &DataFrame, granularity: Granularity) -> Result<Vec<String>, AggregateError> {
    let years = i32_values(buckets, YEAR_KEY)?;
    Ok(match granularity {
        Granularity::Yearly => years.into_iter().map(|y| format!("{y:04}")).collect(),
        Granularity::Monthly => {
            let months = i32_values(buckets, MONTH_KEY)?;
            years
                .into_iter()
                .zip(months)
                .map(|(y, m)| format!("{y:04}-{m:02}"))
                .collect()
        }
    })
}

fn string_values(df: &DataFrame, name: &str) -> Result<Vec<String>, AggregateError> {
    Ok(df
        .column(name)?
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect())
}

fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, AggregateError> {
    Ok(df
        .column(name)?
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|value| value.unwrap_or_default())
        .collect())
}

fn i32_values(df: &DataFrame, name: &str) -> Result<Vec<i32>, AggregateError> {
    Ok(df
        .column(name)?
        .as_materialized_series()
        .i32()?
        .into_iter()
        .map(|value| value.unwrap_or_default())
        .collect())
}

fn u32_values(df: &DataFrame, name: &str) -> Result<Vec<u32>, AggregateError> {
    Ok(df
        .column(name)?
        .as_materialized_series()
        .u32()?
        .into_iter()
        .map(|value| value.unwrap_or_default())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{
        SalesLoader, COL_CATEGORY, COL_COUNTRY, COL_GENDER, COL_PAYMENT_METHOD, COL_PRODUCT_NAME,
    };

    /// The three-row table from the dashboard walkthrough, plus nothing else.
    fn scenario_table() -> DataFrame {
        build_table(&[
            ("2023-01-05", "100", "US", "A", "card", "F", "Widget"),
            ("2023-02-10", "50", "US", "B", "cash", "M", "Gadget"),
            ("2024-01-01", "200", "DE", "A", "card", "M", "Widget"),
        ])
    }

    fn build_table(rows: &[(&str, &str, &str, &str, &str, &str, &str)]) -> DataFrame {
        let raw = df!(
            "order_date" => rows.iter().map(|r| r.0).collect::<Vec<_>>(),
            "review_date" => rows.iter().map(|_| "").collect::<Vec<_>>(),
            "signup_date" => rows.iter().map(|_| "").collect::<Vec<_>>(),
            "total_sales" => rows.iter().map(|r| r.1).collect::<Vec<_>>(),
            "country" => rows.iter().map(|r| r.2).collect::<Vec<_>>(),
            "category" => rows.iter().map(|r| r.3).collect::<Vec<_>>(),
            "payment_method" => rows.iter().map(|r| r.4).collect::<Vec<_>>(),
            "gender" => rows.iter().map(|r| r.5).collect::<Vec<_>>(),
            "product_name" => rows.iter().map(|r| r.6).collect::<Vec<_>>(),
        )
        .unwrap();
        SalesLoader::clean(raw.lazy()).collect().unwrap()
    }

    #[test]
    fn test_sum_by_dimension_sorts_descending() {
        let sums = Aggregator::sum_by_dimension(&scenario_table(), COL_COUNTRY, None).unwrap();
        assert_eq!(
            sums,
            vec![
                DimensionSum {
                    key: "DE".to_string(),
                    total_sales: 200.0
                },
                DimensionSum {
                    key: "US".to_string(),
                    total_sales: 150.0
                },
            ]
        );
    }

    #[test]
    fn test_sum_by_dimension_conserves_total() {
        let table = build_table(&[
            ("2023-01-05", "10.5", "US", "A", "card", "F", "Widget"),
            ("2023-02-10", "20.25", "DE", "B", "cash", "M", "Gadget"),
            ("2023-03-01", "-5", "FR", "A", "card", "F", "Widget"),
            ("2024-01-01", "30", "US", "C", "card", "M", "Doohickey"),
        ]);
        let sums = Aggregator::sum_by_dimension(&table, COL_CATEGORY, None).unwrap();
        let grouped: f64 = sums.iter().map(|entry| entry.total_sales).sum();
        assert!((grouped - 55.75).abs() < 1e-9);
    }

    #[test]
    fn test_sum_by_dimension_top_n_keeps_highest() {
        let table = build_table(&[
            ("2023-01-01", "10", "FR", "A", "card", "F", "Widget"),
            ("2023-01-02", "300", "US", "A", "card", "F", "Widget"),
            ("2023-01-03", "200", "DE", "A", "card", "F", "Widget"),
            ("2023-01-04", "5", "IT", "A", "card", "F", "Widget"),
        ]);
        let sums = Aggregator::sum_by_dimension(&table, COL_COUNTRY, Some(2)).unwrap();
        let keys: Vec<&str> = sums.iter().map(|entry| entry.key.as_str()).collect();
        assert_eq!(keys, vec!["US", "DE"]);
    }

    #[test]
    fn test_sum_by_dimension_ties_keep_encounter_order() {
        let table = build_table(&[
            ("2023-01-01", "100", "FR", "A", "card", "F", "Widget"),
            ("2023-01-02", "100", "US", "A", "card", "F", "Widget"),
            ("2023-01-03", "100", "DE", "A", "card", "F", "Widget"),
        ]);
        let sums = Aggregator::sum_by_dimension(&table, COL_COUNTRY, None).unwrap();
        let keys: Vec<&str> = sums.iter().map(|entry| entry.key.as_str()).collect();
        assert_eq!(keys, vec!["FR", "US", "DE"]);
    }

    #[test]
    fn test_count_by_pair_is_sparse() {
        let counts =
            Aggregator::count_by_pair(&scenario_table(), COL_GENDER, COL_CATEGORY).unwrap();
        // F/B never occurs and must not be emitted.
        assert_eq!(
            counts,
            vec![
                PairCount {
                    primary: "F".to_string(),
                    secondary: "A".to_string(),
                    orders: 1
                },
                PairCount {
                    primary: "M".to_string(),
                    secondary: "A".to_string(),
                    orders: 1
                },
                PairCount {
                    primary: "M".to_string(),
                    secondary: "B".to_string(),
                    orders: 1
                },
            ]
        );
    }

    #[test]
    fn test_count_by_pair_skips_null_keys() {
        // gender is not a key column, so rows with a blank gender survive
        // loading; they must not form a group of their own.
        let raw = df!(
            "order_date" => ["2023-01-05", "2023-01-06"],
            "review_date" => ["", ""],
            "signup_date" => ["", ""],
            "total_sales" => ["100", "50"],
            "country" => ["US", "US"],
            "category" => ["A", "A"],
            "payment_method" => ["card", "card"],
            "gender" => [Some("F"), None],
            "product_name" => ["Widget", "Widget"],
        )
        .unwrap();
        let table = SalesLoader::clean(raw.lazy()).collect().unwrap();
        assert_eq!(table.height(), 2);

        let counts = Aggregator::count_by_pair(&table, COL_GENDER, COL_CATEGORY).unwrap();
        assert_eq!(
            counts,
            vec![PairCount {
                primary: "F".to_string(),
                secondary: "A".to_string(),
                orders: 1
            }]
        );
    }

    #[test]
    fn test_frequency_rank_conserves_count() {
        let table = scenario_table();
        let ranks = Aggregator::frequency_rank(&table, COL_PAYMENT_METHOD).unwrap();
        assert_eq!(ranks[0].value, "card");
        assert_eq!(ranks[0].orders, 2);
        let total: u32 = ranks.iter().map(|entry| entry.orders).sum();
        assert_eq!(total as usize, table.height());
    }

    #[test]
    fn test_trend_yearly_scenario() {
        let trend = Aggregator::trend(&scenario_table(), Granularity::Yearly).unwrap();
        assert_eq!(
            trend,
            vec![
                TrendPoint {
                    period: "2023".to_string(),
                    total_sales: 150.0
                },
                TrendPoint {
                    period: "2024".to_string(),
                    total_sales: 200.0
                },
            ]
        );
    }

    #[test]
    fn test_trend_monthly_labels_sort_chronologically() {
        let trend = Aggregator::trend(&scenario_table(), Granularity::Monthly).unwrap();
        let periods: Vec<&str> = trend.iter().map(|point| point.period.as_str()).collect();
        assert_eq!(periods, vec!["2023-01", "2023-02", "2024-01"]);
        assert!(periods.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_trend_skips_empty_buckets() {
        let table = build_table(&[
            ("2023-01-05", "100", "US", "A", "card", "F", "Widget"),
            ("2023-05-10", "50", "US", "A", "card", "F", "Widget"),
        ]);
        let trend = Aggregator::trend(&table, Granularity::Monthly).unwrap();
        let periods: Vec<&str> = trend.iter().map(|point| point.period.as_str()).collect();
        // February through April have no orders and are not synthesized.
        assert_eq!(periods, vec!["2023-01", "2023-05"]);
    }

    #[test]
    fn test_trend_by_splits_series() {
        let points =
            Aggregator::trend_by(&scenario_table(), Granularity::Yearly, COL_CATEGORY).unwrap();
        assert_eq!(
            points,
            vec![
                SeriesTrendPoint {
                    period: "2023".to_string(),
                    series: "A".to_string(),
                    total_sales: 100.0
                },
                SeriesTrendPoint {
                    period: "2023".to_string(),
                    series: "B".to_string(),
                    total_sales: 50.0
                },
                SeriesTrendPoint {
                    period: "2024".to_string(),
                    series: "A".to_string(),
                    total_sales: 200.0
                },
            ]
        );
    }

    #[test]
    fn test_top_k_restricts_entities() {
        let table = build_table(&[
            ("2023-01-01", "10", "US", "A", "card", "F", "Widget"),
            ("2023-01-02", "300", "US", "A", "card", "F", "Gadget"),
            ("2023-01-03", "200", "US", "A", "card", "F", "Doohickey"),
            ("2023-01-04", "250", "US", "A", "card", "F", "Gadget"),
        ]);
        let top = Aggregator::top_k(&table, COL_PRODUCT_NAME, 2).unwrap();
        assert_eq!(top, vec!["Gadget".to_string(), "Doohickey".to_string()]);

        let restricted = Aggregator::restrict_to(&table, COL_PRODUCT_NAME, &top).unwrap();
        assert_eq!(restricted.height(), 3);
    }
}
