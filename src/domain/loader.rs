//! Fetches price histories for a ticker set and aligns them into one table.
//!
//! Tickers that fail to load are dropped with a warning rather than aborting
//! the run; the run only fails when nothing usable is left.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::error::AnalysisError;
use crate::domain::price_series::PriceSeries;
use crate::ports::price_port::PricePort;

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    FetchFailed(String),
    NoData,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::FetchFailed(reason) => write!(f, "fetch failed: {reason}"),
            SkipReason::NoData => write!(f, "no data in range"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedPrices {
    pub prices: PriceSeries,
    pub skipped: Vec<SkippedTicker>,
}

pub fn load_prices(
    port: &dyn PricePort,
    tickers: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<LoadedPrices, AnalysisError> {
    let mut fetched = Vec::with_capacity(tickers.len());
    let mut skipped = Vec::new();

    for ticker in tickers {
        let points = match port.fetch_adjusted_close(ticker, start_date, end_date) {
            Ok(points) => points,
            Err(e) => {
                warn!(%ticker, error = %e, "skipping ticker");
                skipped.push(SkippedTicker {
                    ticker: ticker.clone(),
                    reason: SkipReason::FetchFailed(e.to_string()),
                });
                continue;
            }
        };

        let usable = points.iter().filter(|p| p.is_usable()).count();
        if usable == 0 {
            warn!(%ticker, "skipping ticker: no data in range");
            skipped.push(SkippedTicker {
                ticker: ticker.clone(),
                reason: SkipReason::NoData,
            });
            continue;
        }

        debug!(%ticker, rows = usable, "fetched prices");
        fetched.push((ticker.clone(), points));
    }

    if fetched.is_empty() {
        return Err(AnalysisError::unavailable(
            "all",
            format!("none of {} tickers returned data", tickers.len()),
        ));
    }

    if !skipped.is_empty() {
        info!(
            kept = fetched.len(),
            requested = tickers.len(),
            "continuing with a reduced ticker set"
        );
    }

    let prices = PriceSeries::align(fetched);
    if prices.len() < 2 {
        return Err(AnalysisError::unavailable(
            &prices.tickers().join(","),
            format!("only {} shared trading dates", prices.len()),
        ));
    }

    Ok(LoadedPrices { prices, skipped })
}
