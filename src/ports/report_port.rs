//! Report output port trait.

use crate::domain::error::AnalysisError;
use crate::domain::price_series::PriceSeries;
use crate::domain::simulation::SimulationTable;
use crate::domain::summary::AnalysisSummary;

/// Sink for the tables produced by a run. `name` is a file name without
/// directory; implementations decide where it lands.
pub trait ReportPort {
    fn write_prices(&self, name: &str, prices: &PriceSeries) -> Result<(), AnalysisError>;

    /// `investment` is the amount allocated in every trial.
    fn write_simulations(
        &self,
        name: &str,
        table: &SimulationTable,
        investment: f64,
    ) -> Result<(), AnalysisError>;

    fn write_summary(&self, name: &str, summary: &AnalysisSummary) -> Result<(), AnalysisError>;
}
