//! Market data port trait.

use crate::domain::error::AnalysisError;
use crate::domain::price_series::PricePoint;
use chrono::NaiveDate;

/// Source of daily adjusted close prices.
pub trait PricePort {
    /// Adjusted closes for `ticker` between `start_date` and `end_date`, both
    /// inclusive, in ascending date order.
    ///
    /// An empty vector is a valid answer; the loader treats it as unavailable.
    fn fetch_adjusted_close(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, AnalysisError>;
}
