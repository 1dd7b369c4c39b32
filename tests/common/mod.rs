#![allow(dead_code)]

use chrono::NaiveDate;
use portfolio_analysis::domain::config::AnalysisConfig;
use portfolio_analysis::domain::error::AnalysisError;
use portfolio_analysis::domain::price_series::{PricePoint, PriceSeries};
use portfolio_analysis::domain::simulation::SimulationTable;
use portfolio_analysis::domain::summary::AnalysisSummary;
use portfolio_analysis::ports::price_port::PricePort;
use portfolio_analysis::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockPricePort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_points(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(ticker.to_string(), points);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn fetch_adjusted_close(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, AnalysisError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(AnalysisError::unavailable(ticker, reason.clone()));
        }
        Ok(self
            .data
            .get(ticker)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Records the file names it was asked to write; fails for names containing `fail_on`.
pub struct MemoryReportPort {
    pub written: RefCell<Vec<String>>,
    pub fail_on: Option<String>,
}

impl MemoryReportPort {
    pub fn new() -> Self {
        Self {
            written: RefCell::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn failing_on(pattern: &str) -> Self {
        Self {
            written: RefCell::new(Vec::new()),
            fail_on: Some(pattern.to_string()),
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.written.borrow().clone()
    }

    fn record(&self, name: &str) -> Result<(), AnalysisError> {
        if let Some(pattern) = &self.fail_on {
            if name.contains(pattern.as_str()) {
                return Err(AnalysisError::IoFailure {
                    path: name.to_string(),
                    reason: "disk full".to_string(),
                });
            }
        }
        self.written.borrow_mut().push(name.to_string());
        Ok(())
    }
}

impl ReportPort for MemoryReportPort {
    fn write_prices(&self, name: &str, _prices: &PriceSeries) -> Result<(), AnalysisError> {
        self.record(name)
    }

    fn write_simulations(
        &self,
        name: &str,
        _table: &SimulationTable,
        _investment: f64,
    ) -> Result<(), AnalysisError> {
        self.record(name)
    }

    fn write_summary(&self, name: &str, _summary: &AnalysisSummary) -> Result<(), AnalysisError> {
        self.record(name)
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// One point per calendar day starting at `start`.
pub fn daily_points(start: NaiveDate, closes: &[f64]) -> Vec<PricePoint> {
    start
        .iter_days()
        .zip(closes)
        .map(|(d, c)| PricePoint::new(d, *c))
        .collect()
}

/// Deterministic zig-zag walk: `drift` per day plus an alternating `swing`.
pub fn zigzag(days: usize, base: f64, drift: f64, swing: f64) -> Vec<f64> {
    let mut price = base;
    (0..days)
        .map(|i| {
            let current = price;
            let sign = if i % 3 == 0 { -1.0 } else { 1.0 };
            price *= 1.0 + drift + sign * swing;
            current
        })
        .collect()
}

pub fn analysis_config(tickers: &[&str], start: &str, end: &str) -> AnalysisConfig {
    AnalysisConfig {
        industry: "uranium".to_string(),
        tickers: tickers.iter().map(|t| t.to_string()).collect(),
        start_date: date(start),
        end_date: date(end),
        trading_days: 252,
        risk_free_rate: 0.05,
        simulations: 200,
        investment: 10_000.0,
        comparison_days: 30,
        seed: Some(42),
    }
}

/// Three tickers with 120 days of history from 2024-01-01.
pub fn three_ticker_port() -> MockPricePort {
    let start = date("2024-01-01");
    MockPricePort::new()
        .with_points("CCJ", daily_points(start, &zigzag(120, 40.0, 0.002, 0.01)))
        .with_points("UEC", daily_points(start, &zigzag(120, 6.0, 0.001, 0.03)))
        .with_points("DNN", daily_points(start, &zigzag(120, 2.0, -0.001, 0.005)))
}
