//! Data module - sales CSV loading, caching and year filtering

mod cache;
mod filter;
mod loader;

pub use cache::TableCache;
pub use filter::YearFilter;
pub use loader::{LoadSummary, LoaderError, SalesLoader};
pub use loader::{
    COL_CATEGORY, COL_COUNTRY, COL_GENDER, COL_ORDER_DATE, COL_PAYMENT_METHOD, COL_PRODUCT_NAME,
    COL_TOTAL_SALES,
};
