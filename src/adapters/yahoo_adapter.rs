//! Yahoo Finance chart API client implementing PricePort.
//!
//! One blocking request per ticker against `/v8/finance/chart/{ticker}`.
//! Timestamps are converted to UTC calendar dates; null adjusted closes
//! (halted or missing sessions) are skipped.

use std::time::Duration;

use chrono::{DateTime, NaiveDate};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::domain::error::AnalysisError;
use crate::domain::price_series::PricePoint;
use crate::ports::price_port::PricePort;

const USER_AGENT: &str = concat!("portfolio-analysis/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub adjclose: Vec<AdjClose>,
}

#[derive(Debug, Deserialize)]
pub struct AdjClose {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

/// Extract `(date, adjusted close)` pairs from a decoded chart response.
pub fn parse_chart(ticker: &str, response: ChartResponse) -> Result<Vec<PricePoint>, AnalysisError> {
    if let Some(err) = response.chart.error {
        return Err(AnalysisError::unavailable(
            ticker,
            format!("{}: {}", err.code, err.description),
        ));
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| AnalysisError::unavailable(ticker, "empty chart result"))?;

    let closes = match result.indicators.adjclose.into_iter().next() {
        Some(a) => a.adjclose,
        None if result.timestamp.is_empty() => return Ok(Vec::new()),
        None => return Err(AnalysisError::unavailable(ticker, "response has no adjusted closes")),
    };

    if closes.len() != result.timestamp.len() {
        return Err(AnalysisError::unavailable(
            ticker,
            format!(
                "{} timestamps but {} adjusted closes",
                result.timestamp.len(),
                closes.len()
            ),
        ));
    }

    let mut points: Vec<PricePoint> = result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let date = DateTime::from_timestamp(*ts, 0)?.date_naive();
            Some(PricePoint::new(date, close?))
        })
        .collect();

    points.sort_by_key(|p| p.date);
    points.dedup_by_key(|p| p.date);
    Ok(points)
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

pub struct YahooAdapter {
    client: Client,
    base_url: String,
}

impl YahooAdapter {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AnalysisError::unavailable("all", format!("HTTP client setup failed: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, ticker: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, ticker)
    }
}

impl PricePort for YahooAdapter {
    fn fetch_adjusted_close(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, AnalysisError> {
        let period1 = unix_midnight(start_date).to_string();
        // period2 is exclusive upstream; ask for the following midnight.
        let period2 = unix_midnight(end_date + chrono::Duration::days(1)).to_string();
        let params = [
            ("period1", period1.as_str()),
            ("period2", period2.as_str()),
            ("interval", "1d"),
            ("events", "div,splits"),
            ("includeAdjustedClose", "true"),
        ];

        let url = self.chart_url(ticker);
        debug!(%ticker, %url, "requesting chart");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .map_err(|e| AnalysisError::unavailable(ticker, format!("HTTP request failed: {e}")))?;

        let status = response.status();
        // The API reports unknown symbols as 404 with a JSON error body.
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            let text = response.text().unwrap_or_default();
            return Err(AnalysisError::unavailable(ticker, format!("{status}: {text}")));
        }

        let body: ChartResponse = response
            .json()
            .map_err(|e| AnalysisError::unavailable(ticker, format!("invalid response: {e}")))?;

        let points = parse_chart(ticker, body)?;
        Ok(points
            .into_iter()
            .filter(|p| p.date >= start_date && p.date <= end_date)
            .collect())
    }
}
