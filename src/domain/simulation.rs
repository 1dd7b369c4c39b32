//! Monte Carlo search over random long-only allocations.
//!
//! Each trial draws a [`WeightVector`], evaluates the resulting daily
//! portfolio returns and records its [`RiskMetrics`]. The optimal portfolio
//! is the trial with the highest Sortino ratio; the earliest trial wins ties.

use rand::Rng;

use crate::domain::error::AnalysisError;
use crate::domain::metrics::RiskMetrics;
use crate::domain::returns::ReturnSeries;
use crate::domain::weights::WeightVector;

pub const DEFAULT_TRADING_DAYS: u32 = 252;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    pub trading_days: u32,
    pub risk_free_rate: f64,
    pub simulations: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRecord {
    pub trial: usize,
    pub weights: WeightVector,
    pub metrics: RiskMetrics,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationTable {
    pub tickers: Vec<String>,
    pub records: Vec<SimulationRecord>,
}

impl SimulationTable {
    fn new(tickers: Vec<String>, capacity: usize) -> Self {
        Self {
            tickers,
            records: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, record: SimulationRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the record with the highest Sortino ratio, first one on ties.
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, record) in self.records.iter().enumerate() {
            let better = match best {
                None => true,
                Some(b) => record.metrics.sortino_ratio > self.records[b].metrics.sortino_ratio,
            };
            if better {
                best = Some(i);
            }
        }
        best
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub table: SimulationTable,
    pub optimal: SimulationRecord,
}

pub fn simulate<R: Rng + ?Sized>(
    returns: &ReturnSeries,
    params: &SimulationParams,
    rng: &mut R,
) -> Result<SimulationOutcome, AnalysisError> {
    if params.simulations == 0 {
        return Err(AnalysisError::invalid(
            "simulations",
            "simulation count must be positive",
        ));
    }
    if returns.tickers().is_empty() {
        return Err(AnalysisError::invalid("tickers", "ticker set is empty"));
    }
    if returns.is_empty() {
        return Err(AnalysisError::invalid("returns", "return series has no rows"));
    }
    if params.trading_days == 0 {
        return Err(AnalysisError::invalid(
            "trading_days",
            "trading days must be positive",
        ));
    }

    let n_assets = returns.tickers().len();
    let mut table = SimulationTable::new(returns.tickers().to_vec(), params.simulations);

    for trial in 0..params.simulations {
        let weights = WeightVector::random(n_assets, rng)?;
        let daily = returns.portfolio_returns(&weights);
        let metrics = RiskMetrics::compute(&daily, params.trading_days, params.risk_free_rate);
        table.push(SimulationRecord {
            trial,
            weights,
            metrics,
        });
    }

    let best = table
        .best_index()
        .ok_or_else(|| AnalysisError::invalid("simulations", "no trials recorded"))?;
    let optimal = table.records[best].clone();

    Ok(SimulationOutcome { table, optimal })
}
