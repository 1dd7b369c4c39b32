//! CSV report adapter implementing ReportPort.
//!
//! Every table is written to `<output_dir>/<name>`. The directory is created
//! on first write.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::AnalysisError;
use crate::domain::price_series::PriceSeries;
use crate::domain::simulation::SimulationTable;
use crate::domain::summary::AnalysisSummary;
use crate::ports::report_port::ReportPort;

pub const SIMULATION_COLUMNS: [&str; 7] = [
    "Trial",
    "Dollar Amount",
    "Return PCT",
    "Downside SD",
    "Upside SD",
    "Volatility Skewness",
    "Sortino",
];

pub const SUMMARY_COLUMNS: [&str; 5] = [
    "Metric",
    "Maximum Sortino Portfolio",
    "Comp Results",
    "PCT Diff",
    "Equal Weight",
];

pub struct CsvReportAdapter {
    output_dir: PathBuf,
}

impl CsvReportAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn write_rows(&self, name: &str, header: Vec<String>, rows: Vec<Vec<String>>) -> Result<(), AnalysisError> {
        let path = self.output_dir.join(name);
        let fail = |reason: String| AnalysisError::IoFailure {
            path: path.display().to_string(),
            reason,
        };

        fs::create_dir_all(&self.output_dir).map_err(|e| fail(e.to_string()))?;
        let mut writer = csv::Writer::from_path(&path).map_err(|e| fail(e.to_string()))?;
        writer.write_record(&header).map_err(|e| fail(e.to_string()))?;
        for row in rows {
            writer.write_record(&row).map_err(|e| fail(e.to_string()))?;
        }
        writer.flush().map_err(|e| fail(e.to_string()))?;
        Ok(())
    }
}

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn price_rows(prices: &PriceSeries) -> (Vec<String>, Vec<Vec<String>>) {
    let mut header = vec!["Date".to_string()];
    header.extend(prices.tickers().iter().cloned());

    let rows = prices
        .dates()
        .iter()
        .zip(prices.rows())
        .map(|(date, row)| {
            let mut out = vec![date.format("%Y-%m-%d").to_string()];
            out.extend(row.iter().map(|p| p.to_string()));
            out
        })
        .collect();
    (header, rows)
}

pub fn simulation_rows(table: &SimulationTable, investment: f64) -> (Vec<String>, Vec<Vec<String>>) {
    let mut header: Vec<String> = SIMULATION_COLUMNS.iter().map(|s| s.to_string()).collect();
    header.extend(table.tickers.iter().cloned());

    let rows = table
        .records
        .iter()
        .map(|r| {
            let m = &r.metrics;
            let mut out = vec![
                r.trial.to_string(),
                investment.to_string(),
                m.annual_return.to_string(),
                m.downside_deviation.to_string(),
                m.upside_deviation.to_string(),
                m.volatility_skewness.to_string(),
                m.sortino_ratio.to_string(),
            ];
            out.extend(r.weights.as_slice().iter().map(|w| w.to_string()));
            out
        })
        .collect();
    (header, rows)
}

pub fn summary_rows(summary: &AnalysisSummary) -> (Vec<String>, Vec<Vec<String>>) {
    let header = SUMMARY_COLUMNS.iter().map(|s| s.to_string()).collect();
    let rows = summary
        .comparison_rows()
        .into_iter()
        .map(|row| {
            vec![
                row.metric.clone(),
                row.simulated.to_string(),
                opt(row.actual),
                opt(row.pct_diff()),
                opt(row.equal_weight),
            ]
        })
        .collect();
    (header, rows)
}

impl ReportPort for CsvReportAdapter {
    fn write_prices(&self, name: &str, prices: &PriceSeries) -> Result<(), AnalysisError> {
        let (header, rows) = price_rows(prices);
        self.write_rows(name, header, rows)
    }

    fn write_simulations(
        &self,
        name: &str,
        table: &SimulationTable,
        investment: f64,
    ) -> Result<(), AnalysisError> {
        let (header, rows) = simulation_rows(table, investment);
        self.write_rows(name, header, rows)
    }

    fn write_summary(&self, name: &str, summary: &AnalysisSummary) -> Result<(), AnalysisError> {
        let (header, rows) = summary_rows(summary);
        self.write_rows(name, header, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::RiskMetrics;
    use crate::domain::simulation::SimulationRecord;
    use crate::domain::weights::WeightVector;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn prices() -> PriceSeries {
        PriceSeries::new(
            vec!["AAA".into(), "BBB".into()],
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            ],
            vec![vec![10.5, 20.0], vec![11.0, 19.5]],
        )
        .unwrap()
    }

    fn table() -> SimulationTable {
        let metrics = RiskMetrics {
            annual_return: 0.25,
            downside_deviation: 0.1,
            upside_deviation: 0.2,
            volatility_skewness: 2.0,
            sortino_ratio: 2.0,
        };
        SimulationTable {
            tickers: vec!["AAA".into(), "BBB".into()],
            records: vec![
                SimulationRecord {
                    trial: 0,
                    weights: WeightVector::new(vec![0.75, 0.25]).unwrap(),
                    metrics,
                },
                SimulationRecord {
                    trial: 1,
                    weights: WeightVector::new(vec![0.5, 0.5]).unwrap(),
                    metrics,
                },
            ],
        }
    }

    #[test]
    fn price_rows_layout() {
        let (header, rows) = price_rows(&prices());
        assert_eq!(header, vec!["Date", "AAA", "BBB"]);
        assert_eq!(rows[0], vec!["2024-01-02", "10.5", "20"]);
    }

    #[test]
    fn simulation_rows_layout() {
        let (header, rows) = simulation_rows(&table(), 1000.0);
        assert_eq!(header.len(), SIMULATION_COLUMNS.len() + 2);
        assert_eq!(&header[7..], &["AAA", "BBB"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            vec!["0", "1000", "0.25", "0.1", "0.2", "2", "2", "0.75", "0.25"]
        );
    }

    #[test]
    fn writes_file_into_created_directory() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested").join("outputs");
        let adapter = CsvReportAdapter::new(out.clone());

        adapter.write_simulations("sims.csv", &table(), 1000.0).unwrap();

        let content = fs::read_to_string(out.join("sims.csv")).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Trial,Dollar Amount,Return PCT,Downside SD,Upside SD,Volatility Skewness,Sortino,AAA,BBB"
        );
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn unwritable_location_is_io_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("occupied");
        fs::write(&blocker, "not a directory").unwrap();
        let adapter = CsvReportAdapter::new(blocker);

        let err = adapter.write_prices("prices.csv", &prices()).unwrap_err();
        assert!(matches!(err, AnalysisError::IoFailure { .. }));
    }
}
