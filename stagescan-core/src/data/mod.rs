//! Price data: provider seam, HTTP implementation, series construction.

pub mod http;
pub mod provider;
pub mod series;

pub use http::HttpPriceProvider;
pub use provider::{FetchError, PriceProvider};
pub use series::{build_series, to_csv, PriceRow, PriceSeries, SeriesError, CSV_HEADER};
