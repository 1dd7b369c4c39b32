//! Adjusted-close price table keyed by date and ticker.
//!
//! Rows are trading dates in strictly increasing order; columns are tickers.
//! Tickers are inner-joined: a date is kept only when every ticker has a
//! usable price on it.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::error::AnalysisError;

/// A single adjusted close observation as returned by a price port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub adjusted_close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, adjusted_close: f64) -> Self {
        Self {
            date,
            adjusted_close,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.adjusted_close.is_finite() && self.adjusted_close > 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    tickers: Vec<String>,
    dates: Vec<NaiveDate>,
    /// Row-major: `rows[t][i]` is the price of `tickers[i]` on `dates[t]`.
    rows: Vec<Vec<f64>>,
}

impl PriceSeries {
    /// Build a table directly from aligned rows.
    pub fn new(
        tickers: Vec<String>,
        dates: Vec<NaiveDate>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, AnalysisError> {
        if dates.len() != rows.len() {
            return Err(AnalysisError::invalid(
                "prices",
                format!("{} dates but {} rows", dates.len(), rows.len()),
            ));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(AnalysisError::invalid(
                "prices",
                "dates must be strictly increasing",
            ));
        }
        if let Some(row) = rows.iter().find(|r| r.len() != tickers.len()) {
            return Err(AnalysisError::invalid(
                "prices",
                format!("row has {} prices for {} tickers", row.len(), tickers.len()),
            ));
        }
        Ok(Self {
            tickers,
            dates,
            rows,
        })
    }

    /// Inner-join per-ticker price histories onto the dates they all share.
    ///
    /// Unusable points (non-positive or non-finite) are discarded first.
    /// Duplicate dates within one ticker keep the last observation.
    pub fn align(series: Vec<(String, Vec<PricePoint>)>) -> Self {
        let tickers: Vec<String> = series.iter().map(|(t, _)| t.clone()).collect();

        let by_ticker: Vec<BTreeMap<NaiveDate, f64>> = series
            .iter()
            .map(|(_, points)| {
                points
                    .iter()
                    .filter(|p| p.is_usable())
                    .map(|p| (p.date, p.adjusted_close))
                    .collect()
            })
            .collect();

        let shared: BTreeSet<NaiveDate> = match by_ticker.split_first() {
            Some((first, rest)) => first
                .keys()
                .filter(|d| rest.iter().all(|m| m.contains_key(*d)))
                .copied()
                .collect(),
            None => BTreeSet::new(),
        };

        let dates: Vec<NaiveDate> = shared.into_iter().collect();
        let rows = dates
            .iter()
            .map(|d| by_ticker.iter().map(|m| m[d]).collect())
            .collect();

        Self {
            tickers,
            dates,
            rows,
        }
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
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Column of prices for one ticker.
    pub fn column(&self, ticker: &str) -> Option<Vec<f64>> {
        let idx = self.tickers.iter().position(|t| t == ticker)?;
        Some(self.rows.iter().map(|r| r[idx]).collect())
    }

    /// Rows dated on or before `date`.
    pub fn until(&self, date: NaiveDate) -> Self {
        let end = self.dates.partition_point(|d| *d <= date);
        self.slice(0, end)
    }

    /// Rows dated on or after `date`.
    pub fn since(&self, date: NaiveDate) -> Self {
        let start = self.dates.partition_point(|d| *d < date);
        self.slice(start, self.dates.len())
    }

    fn slice(&self, start: usize, end: usize) -> Self {
        Self {
            tickers: self.tickers.clone(),
            dates: self.dates[start..end].to_vec(),
            rows: self.rows[start..end].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn points(data: &[(&str, f64)]) -> Vec<PricePoint> {
        data.iter().map(|&(s, p)| PricePoint::new(d(s), p)).collect()
    }

    #[test]
    fn align_keeps_only_shared_dates() {
        let series = PriceSeries::align(vec![
            (
                "AAA".into(),
                points(&[("2024-01-01", 10.0), ("2024-01-02", 11.0), ("2024-01-03", 12.0)]),
            ),
            (
                "BBB".into(),
                points(&[("2024-01-02", 20.0), ("2024-01-03", 21.0), ("2024-01-04", 22.0)]),
            ),
        ]);

        assert_eq!(series.dates(), &[d("2024-01-02"), d("2024-01-03")]);
        assert_eq!(series.rows(), &[vec![11.0, 20.0], vec![12.0, 21.0]]);
    }

    #[test]
    fn align_sorts_unordered_input() {
        let series = PriceSeries::align(vec![(
            "AAA".into(),
            points(&[("2024-01-03", 3.0), ("2024-01-01", 1.0), ("2024-01-02", 2.0)]),
        )]);
        assert_eq!(series.column("AAA").unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn align_drops_unusable_prices() {
        let series = PriceSeries::align(vec![(
            "AAA".into(),
            points(&[("2024-01-01", 1.0), ("2024-01-02", f64::NAN), ("2024-01-03", 0.0)]),
        )]);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn align_empty_input() {
        let series = PriceSeries::align(vec![]);
        assert!(series.is_empty());
        assert!(series.tickers().is_empty());
    }

    #[test]
    fn new_rejects_unsorted_dates() {
        let result = PriceSeries::new(
            vec!["AAA".into()],
            vec![d("2024-01-02"), d("2024-01-01")],
            vec![vec![1.0], vec![2.0]],
        );
        assert!(matches!(result, Err(AnalysisError::InvalidInput { .. })));
    }

    #[test]
    fn new_rejects_ragged_rows() {
        let result = PriceSeries::new(
            vec!["AAA".into(), "BBB".into()],
            vec![d("2024-01-01")],
            vec![vec![1.0]],
        );
        assert!(matches!(result, Err(AnalysisError::InvalidInput { .. })));
    }

    #[test]
    fn until_and_since_share_the_split_date() {
        let series = PriceSeries::align(vec![(
            "AAA".into(),
            points(&[
                ("2024-01-01", 1.0),
                ("2024-01-02", 2.0),
                ("2024-01-03", 3.0),
                ("2024-01-04", 4.0),
            ]),
        )]);

        let head = series.until(d("2024-01-02"));
        let tail = series.since(d("2024-01-02"));

        assert_eq!(head.dates(), &[d("2024-01-01"), d("2024-01-02")]);
        assert_eq!(
            tail.dates(),
            &[d("2024-01-02"), d("2024-01-03"), d("2024-01-04")]
        );
    }

    #[test]
    fn since_on_non_trading_day() {
        let series = PriceSeries::align(vec![(
            "AAA".into(),
            points(&[("2024-01-01", 1.0), ("2024-01-05", 2.0)]),
        )]);
        let tail = series.since(d("2024-01-03"));
        assert_eq!(tail.dates(), &[d("2024-01-05")]);
        assert_eq!(series.until(d("2024-01-03")).dates(), &[d("2024-01-01")]);
    }
}
