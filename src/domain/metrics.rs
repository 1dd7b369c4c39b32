//! Annualized return and downside-risk statistics for a daily return series.

/// Smallest downside deviation used as a Sortino denominator.
///
/// A portfolio with fewer than two losing days has no sample downside
/// deviation; its ratio is computed against this floor instead, which keeps
/// the value finite and still ordered by excess return.
pub const DOWNSIDE_FLOOR: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskMetrics {
    pub annual_return: f64,
    pub downside_deviation: f64,
    pub upside_deviation: f64,
    pub volatility_skewness: f64,
    pub sortino_ratio: f64,
}

impl RiskMetrics {
    pub fn compute(daily_returns: &[f64], trading_days: u32, risk_free_rate: f64) -> Self {
        let days = trading_days as f64;
        let annual_return = mean(daily_returns) * days;

        let losses: Vec<f64> = daily_returns.iter().copied().filter(|r| *r < 0.0).collect();
        let gains: Vec<f64> = daily_returns.iter().copied().filter(|r| *r >= 0.0).collect();

        let downside_deviation = sample_stddev(&losses) * days.sqrt();
        let upside_deviation = sample_stddev(&gains) * days.sqrt();

        let volatility_skewness = if downside_deviation >= DOWNSIDE_FLOOR {
            upside_deviation / downside_deviation
        } else {
            0.0
        };

        Self {
            annual_return,
            downside_deviation,
            upside_deviation,
            volatility_skewness,
            sortino_ratio: sortino(annual_return, downside_deviation, risk_free_rate),
        }
    }
}

/// `(annual_return - risk_free_rate) / downside_deviation`, with the
/// denominator clamped to [`DOWNSIDE_FLOOR`].
pub fn sortino(annual_return: f64, downside_deviation: f64, risk_free_rate: f64) -> f64 {
    (annual_return - risk_free_rate) / downside_deviation.max(DOWNSIDE_FLOOR)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1). Zero when fewer than two values.
pub fn sample_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
