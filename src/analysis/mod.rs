//! Analysis module - aggregated views over the filtered sales table

mod aggregate;
mod views;

pub use aggregate::{
    AggregateError, Aggregator, DimensionSum, Granularity, PairCount, SeriesTrendPoint,
    TrendPoint, ValueCount,
};
pub use views::{DashboardViews, TOP_PRODUCTS};
