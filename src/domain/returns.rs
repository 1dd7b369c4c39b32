//! Simple periodic returns derived from a price table.

use chrono::NaiveDate;

use crate::domain::error::AnalysisError;
use crate::domain::price_series::PriceSeries;
use crate::domain::weights::WeightVector;

/// Per-ticker simple returns, one row fewer than the source prices.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    tickers: Vec<String>,
    dates: Vec<NaiveDate>,
    rows: Vec<Vec<f64>>,
}

impl ReturnSeries {
    /// `price[t] / price[t-1] - 1` for every ticker. Row `t` is dated at `t`.
    pub fn from_prices(prices: &PriceSeries) -> Result<Self, AnalysisError> {
        if prices.len() < 2 {
            return Err(AnalysisError::invalid(
                "prices",
                format!("need at least 2 rows to compute returns, have {}", prices.len()),
            ));
        }

        let rows = prices
            .rows()
            .windows(2)
            .map(|w| {
                w[0].iter()
                    .zip(&w[1])
                    .map(|(prev, curr)| curr / prev - 1.0)
                    .collect()
            })
            .collect();

        Ok(Self {
            tickers: prices.tickers().to_vec(),
            dates: prices.dates()[1..].to_vec(),
            rows,
        })
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Daily return of a portfolio holding `weights` (weighted sum per row).
    pub fn portfolio_returns(&self, weights: &WeightVector) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(weights.as_slice())
                    .map(|(r, w)| r * w)
                    .sum()
            })
            .collect()
    }
}
