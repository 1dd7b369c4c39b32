//! End-to-end portfolio analysis: load, split, simulate, summarize, export.

use rand::Rng;
use tracing::{error, info};

use crate::domain::config::AnalysisConfig;
use crate::domain::error::AnalysisError;
use crate::domain::loader::{SkippedTicker, load_prices};
use crate::domain::price_series::PriceSeries;
use crate::domain::returns::ReturnSeries;
use crate::domain::simulation::{SimulationParams, SimulationTable, simulate};
use crate::domain::summary::AnalysisSummary;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;

/// Everything a run produced, held in memory.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub file_stem: String,
    pub prices: PriceSeries,
    pub skipped: Vec<SkippedTicker>,
    pub training_rows: usize,
    pub comparison_rows: usize,
    pub simulations: SimulationTable,
    pub summary: AnalysisSummary,
}

impl AnalysisReport {
    pub fn prices_file(&self) -> String {
        format!("{}_trading_data.csv", self.file_stem)
    }

    pub fn simulations_file(&self) -> String {
        format!("{}_simulated_portfolio_results.csv", self.file_stem)
    }

    pub fn summary_file(&self) -> String {
        format!("{}_combined_results.csv", self.file_stem)
    }

    /// Write every table through `port`.
    ///
    /// A failed write is logged and the remaining tables are still attempted;
    /// the first failure is returned. The report itself is never modified.
    pub fn export(&self, port: &dyn ReportPort, include_prices: bool) -> Result<(), AnalysisError> {
        let mut first_error: Option<AnalysisError> = None;
        let mut record = |name: String, result: Result<(), AnalysisError>| match result {
            Ok(()) => info!(file = %name, "wrote output"),
            Err(e) => {
                error!(file = %name, error = %e, "failed to write output");
                first_error.get_or_insert(e);
            }
        };

        if include_prices {
            let name = self.prices_file();
            let result = port.write_prices(&name, &self.prices);
            record(name, result);
        }

        let name = self.simulations_file();
        let result = port.write_simulations(&name, &self.simulations, self.summary.investment);
        record(name, result);

        let name = self.summary_file();
        let result = port.write_summary(&name, &self.summary);
        record(name, result);

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// One configured analysis bound to its market data source.
pub struct PortfolioAnalysis<'a> {
    config: AnalysisConfig,
    prices: &'a dyn PricePort,
}

impl<'a> PortfolioAnalysis<'a> {
    pub fn new(config: AnalysisConfig, prices: &'a dyn PricePort) -> Self {
        Self { config, prices }
    }

    /// Compute the full report without touching any output.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<AnalysisReport, AnalysisError> {
        let config = &self.config;
        config.validate()?;

        info!(
            industry = %config.industry,
            tickers = config.tickers.len(),
            start = %config.start_date,
            end = %config.end_date,
            "loading prices"
        );
        let loaded = load_prices(
            self.prices,
            &config.tickers,
            config.start_date,
            config.end_date,
        )?;

        if let (Some(first), Some(last)) = (loaded.prices.first_date(), loaded.prices.last_date()) {
            info!(rows = loaded.prices.len(), %first, %last, "aligned price history");
        }

        let (training, comparison) = split_windows(&loaded.prices, config)?;
        info!(
            training = training.len(),
            comparison = comparison.len(),
            "split price history"
        );

        let training_returns = ReturnSeries::from_prices(&training)?;
        let comparison_returns = ReturnSeries::from_prices(&comparison)?;

        let params = SimulationParams {
            trading_days: config.trading_days,
            risk_free_rate: config.risk_free_rate,
            simulations: config.simulations,
        };
        info!(simulations = params.simulations, "running simulation");
        let outcome = simulate(&training_returns, &params, rng)?;

        let summary = AnalysisSummary::build(
            loaded.prices.tickers().to_vec(),
            outcome.optimal,
            &comparison_returns,
            config.investment,
            config.trading_days,
            config.risk_free_rate,
        );

        Ok(AnalysisReport {
            file_stem: config.file_stem(),
            training_rows: training.len(),
            comparison_rows: comparison.len(),
            prices: loaded.prices,
            skipped: loaded.skipped,
            simulations: outcome.table,
            summary,
        })
    }

    /// [`run`](Self::run), then export through `report`.
    pub fn execute<R: Rng + ?Sized>(
        &self,
        report: &dyn ReportPort,
        include_prices: bool,
        rng: &mut R,
    ) -> Result<AnalysisReport, AnalysisError> {
        let result = self.run(rng)?;
        result.export(report, include_prices)?;
        Ok(result)
    }
}

/// Training rows end at the comparison start; comparison rows begin there.
fn split_windows(
    prices: &PriceSeries,
    config: &AnalysisConfig,
) -> Result<(PriceSeries, PriceSeries), AnalysisError> {
    let (training, comparison) = match config.comparison_start() {
        Some(split) => (prices.until(split), prices.since(split)),
        None => (prices.clone(), prices.clone()),
    };

    let label = prices.tickers().join(",");
    if training.len() < 2 {
        return Err(AnalysisError::unavailable(
            &label,
            format!(
                "training window has {} rows, need at least 2 before the last {} days",
                training.len(),
                config.comparison_days
            ),
        ));
    }
    if comparison.len() < 2 {
        return Err(AnalysisError::unavailable(
            &label,
            format!(
                "comparison window has {} rows, need at least 2",
                comparison.len()
            ),
        ));
    }
    Ok((training, comparison))
}
