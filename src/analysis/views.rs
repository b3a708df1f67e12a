//! Dashboard Views Module
//! One pass over the filtered table producing every aggregated view the
//! dashboard renders. Recomputed in full on each filter change.

use polars::prelude::*;
use rayon::prelude::*;

use super::aggregate::{
    AggregateError, Aggregator, DimensionSum, Granularity, PairCount, SeriesTrendPoint,
    TrendPoint, ValueCount,
};
use crate::data::{COL_CATEGORY, COL_COUNTRY, COL_GENDER, COL_PAYMENT_METHOD, COL_PRODUCT_NAME};

/// Countries shown in the country comparison.
pub const TOP_COUNTRIES: usize = 10;
/// Products tracked in the product trend.
pub const TOP_PRODUCTS: usize = 5;

/// Everything one dashboard render needs.
#[derive(Debug, Clone)]
pub struct DashboardViews {
    pub sales_by_country: Vec<DimensionSum>,
    pub sales_by_category: Vec<DimensionSum>,
    pub sales_by_payment: Vec<DimensionSum>,
    pub orders_by_gender_category: Vec<PairCount>,
    pub payment_frequency: Vec<ValueCount>,
    pub overall_trend: Vec<TrendPoint>,
    pub category_trend: Vec<SeriesTrendPoint>,
    pub top_product_trend: Vec<SeriesTrendPoint>,
}

impl DashboardViews {
    /// Compute all views from an already year-filtered table.
    ///
    /// Callers short-circuit empty tables and show a no-data state instead
    /// of calling this.
    pub fn compute(
        filtered: &DataFrame,
        granularity: Granularity,
    ) -> Result<Self, AggregateError> {
        let dimensions = vec![
            (COL_COUNTRY, Some(TOP_COUNTRIES)),
            (COL_CATEGORY, None),
            (COL_PAYMENT_METHOD, None),
        ];
        let mut sums: Vec<Vec<DimensionSum>> = dimensions
            .par_iter()
            .map(|(dimension, top_n)| Aggregator::sum_by_dimension(filtered, dimension, *top_n))
            .collect::<Result<_, _>>()?;
        let sales_by_payment = sums.pop().unwrap_or_default();
        let sales_by_category = sums.pop().unwrap_or_default();
        let sales_by_country = sums.pop().unwrap_or_default();

        let top_products = Aggregator::top_k(filtered, COL_PRODUCT_NAME, TOP_PRODUCTS)?;
        let product_rows = Aggregator::restrict_to(filtered, COL_PRODUCT_NAME, &top_products)?;

        Ok(Self {
            sales_by_country,
            sales_by_category,
            sales_by_payment,
            orders_by_gender_category: Aggregator::count_by_pair(
                filtered,
                COL_GENDER,
                COL_CATEGORY,
            )?,
            payment_frequency: Aggregator::frequency_rank(filtered, COL_PAYMENT_METHOD)?,
            overall_trend: Aggregator::trend(filtered, granularity)?,
            category_trend: Aggregator::trend_by(filtered, granularity, COL_CATEGORY)?,
            top_product_trend: Aggregator::trend_by(&product_rows, granularity, COL_PRODUCT_NAME)?,
        })
    }
}
