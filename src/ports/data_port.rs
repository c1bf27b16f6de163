//! Price data access port trait.

use crate::domain::error::MacrossError;
use crate::domain::price::PriceSeries;

pub trait DataPort {
    /// Load the full series. Zero valid observations is an error, not an empty series.
    fn fetch_prices(&self) -> Result<PriceSeries, MacrossError>;

    /// Human-readable name of the source, used in log and error messages.
    fn source_name(&self) -> String;
}
