//! Sales CSV Loader Module
//! Loads the raw sales table with Polars, coerces column types and drops
//! rows that are unusable for analysis.

use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

pub const COL_ORDER_DATE: &str = "order_date";
pub const COL_REVIEW_DATE: &str = "review_date";
pub const COL_SIGNUP_DATE: &str = "signup_date";
pub const COL_TOTAL_SALES: &str = "total_sales";
pub const COL_COUNTRY: &str = "country";
pub const COL_CATEGORY: &str = "category";
pub const COL_PAYMENT_METHOD: &str = "payment_method";
pub const COL_GENDER: &str = "gender";
pub const COL_PRODUCT_NAME: &str = "product_name";

/// Columns the source file must provide. Names are exact and case-sensitive.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    COL_ORDER_DATE,
    COL_REVIEW_DATE,
    COL_SIGNUP_DATE,
    COL_TOTAL_SALES,
    COL_COUNTRY,
    COL_CATEGORY,
    COL_PAYMENT_METHOD,
    COL_GENDER,
    COL_PRODUCT_NAME,
];

/// Columns that must be non-null for a row to survive loading.
const KEY_COLUMNS: [&str; 5] = [
    COL_ORDER_DATE,
    COL_TOTAL_SALES,
    COL_COUNTRY,
    COL_CATEGORY,
    COL_PAYMENT_METHOD,
];

/// Columns read as plain strings and coerced in [`SalesLoader::clean`].
const COERCED_COLUMNS: [&str; 4] = [
    COL_ORDER_DATE,
    COL_REVIEW_DATE,
    COL_SIGNUP_DATE,
    COL_TOTAL_SALES,
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Sales source not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Required column missing from sales source: {0}")]
    MissingColumn(String),
    #[error("Malformed sales source: {0}")]
    SourceMalformed(#[from] PolarsError),
}

/// Cleaned sales table plus row-level load diagnostics.
#[derive(Debug, Clone)]
pub struct LoadSummary {
    /// Fully-valid records, in source order.
    pub table: DataFrame,
    /// Rows in the source file before cleaning.
    pub source_rows: usize,
    /// Rows removed for unparseable or missing key fields.
    pub dropped_rows: usize,
}

impl LoadSummary {
    pub fn rows(&self) -> usize {
        self.table.height()
    }
}

/// Handles CSV file loading with Polars for high performance.
pub struct SalesLoader;

impl SalesLoader {
    /// Load a sales CSV and return the cleaned table.
    ///
    /// The three date columns and `total_sales` are read as strings and
    /// coerced afterwards so that unparseable values become nulls instead of
    /// read failures; rows with a null key column are then dropped.
    pub fn load_csv(path: &Path) -> Result<LoadSummary, LoaderError> {
        if fs::metadata(path).is_err() {
            return Err(LoaderError::SourceNotFound(path.to_path_buf()));
        }

        let overrides = Schema::from_iter(
            COERCED_COLUMNS
                .iter()
                .map(|name| Field::new((*name).into(), DataType::String)),
        );

        let raw = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_dtype_overwrite(Some(Arc::new(overrides)))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        for column in REQUIRED_COLUMNS {
            if raw.column(column).is_err() {
                return Err(LoaderError::MissingColumn(column.to_string()));
            }
        }

        let source_rows = raw.height();
        let table = Self::clean(raw.lazy()).collect()?;
        let dropped_rows = source_rows - table.height();

        log::info!(
            "loaded {} of {} rows from {}",
            table.height(),
            source_rows,
            path.display()
        );
        if dropped_rows > 0 {
            log::warn!("dropped {dropped_rows} rows with unparseable or missing key fields");
        }

        Ok(LoadSummary {
            table,
            source_rows,
            dropped_rows,
        })
    }

    /// Coerce column types and drop rows that cannot be analyzed.
    ///
    /// Dates that fail to parse and non-numeric sales figures become nulls,
    /// then any row with a null key column is removed. Row order is
    /// preserved. The drop is final; dropped rows only surface as a count.
    pub fn clean(raw: LazyFrame) -> LazyFrame {
        let date_options = StrptimeOptions {
            strict: false,
            ..Default::default()
        };

        raw.with_columns([
            col(COL_ORDER_DATE).str().to_date(date_options.clone()),
            col(COL_REVIEW_DATE).str().to_date(date_options.clone()),
            col(COL_SIGNUP_DATE).str().to_date(date_options),
            col(COL_TOTAL_SALES).cast(DataType::Float64),
        ])
        .drop_nulls(Some(KEY_COLUMNS.iter().map(|name| col(*name)).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_rows() -> DataFrame {
        df!(
            COL_ORDER_DATE => ["2023-01-05", "2023-02-10", "not a date", "2024-01-01"],
            COL_REVIEW_DATE => [Some("2023-01-20"), None, Some("2023-03-15"), Some("2024-02-01")],
            COL_SIGNUP_DATE => [Some("2022-11-01"), Some("2022-12-05"), None, Some("2023-10-10")],
            COL_TOTAL_SALES => ["100", "50", "75", "N/A"],
            COL_COUNTRY => ["US", "US", "DE", "DE"],
            COL_CATEGORY => ["A", "B", "A", "A"],
            COL_PAYMENT_METHOD => ["card", "cash", "card", "card"],
            COL_GENDER => ["F", "M", "F", "M"],
            COL_PRODUCT_NAME => ["Widget", "Gadget", "Widget", "Doohickey"],
        )
        .unwrap()
    }

    fn temp_csv(name: &str, contents: &str) -> PathBuf {
        let path =
            std::env::temp_dir().join(format!("salescope_{}_{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    const VALID_CSV: &str = "\
order_date,review_date,signup_date,total_sales,country,category,payment_method,gender,product_name
2023-01-05,2023-01-20,2022-11-01,100,US,A,card,F,Widget
2023-02-10,,2022-12-05,50,US,B,cash,M,Gadget
2024-01-01,2024-02-01,2023-10-10,200,DE,A,card,M,Widget
";

    #[test]
    fn test_clean_drops_unparseable_rows() {
        let table = SalesLoader::clean(raw_rows().lazy()).collect().unwrap();

        // "not a date" and the N/A sales row are gone; nullable review and
        // signup dates do not disqualify a row.
        assert_eq!(table.height(), 2);
        let countries: Vec<&str> = table
            .column(COL_COUNTRY)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(countries, vec!["US", "US"]);
    }

    #[test]
    fn test_clean_coerces_types() {
        let table = SalesLoader::clean(raw_rows().lazy()).collect().unwrap();

        assert_eq!(
            table.column(COL_ORDER_DATE).unwrap().dtype(),
            &DataType::Date
        );
        assert_eq!(
            table.column(COL_TOTAL_SALES).unwrap().dtype(),
            &DataType::Float64
        );
        let sales: Vec<f64> = table
            .column(COL_TOTAL_SALES)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(sales, vec![100.0, 50.0]);
    }

    #[test]
    fn test_load_csv_counts_dropped_rows() {
        let path = temp_csv(
            "dropped.csv",
            "\
order_date,review_date,signup_date,total_sales,country,category,payment_method,gender,product_name
2023-01-05,2023-01-20,2022-11-01,100,US,A,card,F,Widget
2023-02-10,,2022-12-05,N/A,US,B,cash,M,Gadget
bogus,,2022-12-05,10,US,B,cash,M,Gadget
2024-01-01,2024-02-01,2023-10-10,200,,A,card,M,Widget
",
        );

        let summary = SalesLoader::load_csv(&path).unwrap();
        assert_eq!(summary.source_rows, 4);
        assert_eq!(summary.rows(), 1);
        assert_eq!(summary.dropped_rows, 3);
    }

    #[test]
    fn test_load_csv_is_idempotent() {
        let path = temp_csv("idempotent.csv", VALID_CSV);

        let first = SalesLoader::load_csv(&path).unwrap();
        let second = SalesLoader::load_csv(&path).unwrap();
        assert!(first.table.equals(&second.table));
        assert_eq!(first.dropped_rows, second.dropped_rows);
    }

    #[test]
    fn test_load_csv_missing_source() {
        let path = std::env::temp_dir().join("salescope_does_not_exist.csv");
        match SalesLoader::load_csv(&path) {
            Err(LoaderError::SourceNotFound(reported)) => assert_eq!(reported, path),
            other => panic!("expected SourceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_csv_missing_column() {
        let path = temp_csv(
            "missing_column.csv",
            "\
order_date,review_date,signup_date,total_sales,country,category,gender,product_name
2023-01-05,2023-01-20,2022-11-01,100,US,A,F,Widget
",
        );

        match SalesLoader::load_csv(&path) {
            Err(LoaderError::MissingColumn(name)) => assert_eq!(name, COL_PAYMENT_METHOD),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }
}
