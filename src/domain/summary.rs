//! Projection of the optimal allocation and comparison with realized results.

use crate::domain::metrics::RiskMetrics;
use crate::domain::returns::ReturnSeries;
use crate::domain::simulation::SimulationRecord;
use crate::domain::weights::WeightVector;

/// Dollar value after one year at the simulated annual return.
pub fn projected_value(investment: f64, annual_return: f64) -> f64 {
    investment * (1.0 + annual_return)
}

/// What a fixed allocation actually did over a window of returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealizedPerformance {
    pub total_return: f64,
    pub dollar_value: f64,
    pub metrics: RiskMetrics,
}

pub fn realized_performance(
    returns: &ReturnSeries,
    weights: &WeightVector,
    investment: f64,
    trading_days: u32,
    risk_free_rate: f64,
) -> RealizedPerformance {
    let daily = returns.portfolio_returns(weights);
    let total_return = daily.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0;
    RealizedPerformance {
        total_return,
        dollar_value: investment * (1.0 + total_return),
        metrics: RiskMetrics::compute(&daily, trading_days, risk_free_rate),
    }
}

/// One line of the side-by-side comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub metric: String,
    pub simulated: f64,
    pub actual: Option<f64>,
    pub equal_weight: Option<f64>,
}

impl ComparisonRow {
    fn new(metric: &str, simulated: f64, actual: Option<f64>, equal_weight: Option<f64>) -> Self {
        Self {
            metric: metric.to_string(),
            simulated,
            actual,
            equal_weight,
        }
    }

    /// `actual / simulated - 1`; absent when either side is missing or zero.
    pub fn pct_diff(&self) -> Option<f64> {
        match self.actual {
            Some(actual) if self.simulated != 0.0 => Some(actual / self.simulated - 1.0),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    pub investment: f64,
    pub tickers: Vec<String>,
    pub optimal: SimulationRecord,
    pub projected_value: f64,
    pub actual: RealizedPerformance,
    pub equal_weight: RealizedPerformance,
}

impl AnalysisSummary {
    pub fn build(
        tickers: Vec<String>,
        optimal: SimulationRecord,
        comparison: &ReturnSeries,
        investment: f64,
        trading_days: u32,
        risk_free_rate: f64,
    ) -> Self {
        let projected = projected_value(investment, optimal.metrics.annual_return);
        let actual = realized_performance(
            comparison,
            &optimal.weights,
            investment,
            trading_days,
            risk_free_rate,
        );
        // equal() only fails for zero assets, which the simulator already rejects
        let equal_weight = match WeightVector::equal(tickers.len()) {
            Ok(w) => realized_performance(comparison, &w, investment, trading_days, risk_free_rate),
            Err(_) => actual,
        };

        Self {
            investment,
            tickers,
            optimal,
            projected_value: projected,
            actual,
            equal_weight,
        }
    }

    /// Metric rows followed by one row per ticker weight.
    pub fn comparison_rows(&self) -> Vec<ComparisonRow> {
        let sim = &self.optimal.metrics;
        let act = &self.actual;
        let eq = &self.equal_weight;

        let mut rows = vec![
            ComparisonRow::new(
                "Dollar Amount",
                self.projected_value,
                Some(act.dollar_value),
                Some(eq.dollar_value),
            ),
            ComparisonRow::new(
                "Return PCT",
                sim.annual_return,
                Some(act.total_return),
                Some(eq.total_return),
            ),
            ComparisonRow::new(
                "Downside SD",
                sim.downside_deviation,
                Some(act.metrics.downside_deviation),
                Some(eq.metrics.downside_deviation),
            ),
            ComparisonRow::new(
                "Upside SD",
                sim.upside_deviation,
                Some(act.metrics.upside_deviation),
                Some(eq.metrics.upside_deviation),
            ),
            ComparisonRow::new(
                "Volatility Skewness",
                sim.volatility_skewness,
                Some(act.metrics.volatility_skewness),
                Some(eq.metrics.volatility_skewness),
            ),
            ComparisonRow::new(
                "Sortino",
                sim.sortino_ratio,
                Some(act.metrics.sortino_ratio),
                Some(eq.metrics.sortino_ratio),
            ),
        ];

        let equal = 1.0 / self.tickers.len().max(1) as f64;
        for (ticker, weight) in self.tickers.iter().zip(self.optimal.weights.as_slice()) {
            rows.push(ComparisonRow::new(ticker, *weight, None, Some(equal)));
        }
        rows
    }
}
