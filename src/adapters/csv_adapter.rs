//! CSV file price adapter.
//!
//! Reads `{TICKER}.csv` files with a `date,adj_close` header from a
//! directory. Useful for offline runs and reproducible fixtures.

use crate::domain::error::AnalysisError;
use crate::domain::price_series::PricePoint;
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

impl PricePort for CsvPriceAdapter {
    fn fetch_adjusted_close(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, AnalysisError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| {
            AnalysisError::unavailable(ticker, format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result
                .map_err(|e| AnalysisError::unavailable(ticker, format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(0)
                .ok_or_else(|| AnalysisError::unavailable(ticker, "missing date column"))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                AnalysisError::unavailable(ticker, format!("invalid date format: {}", e))
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            let adjusted_close: f64 = record
                .get(1)
                .ok_or_else(|| AnalysisError::unavailable(ticker, "missing adj_close column"))?
                .trim()
                .parse()
                .map_err(|e| {
                    AnalysisError::unavailable(ticker, format!("invalid adj_close value: {}", e))
                })?;

            points.push(PricePoint::new(date, adjusted_close));
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,adj_close\n\
            2024-01-17,115.0\n\
            2024-01-15,105.0\n\
            2024-01-16,110.0\n";

        fs::write(path.join("CCJ.csv"), csv_content).unwrap();
        fs::write(path.join("UEC.csv"), "date,adj_close\n").unwrap();
        fs::write(path.join("BAD.csv"), "date,adj_close\n2024/01/15,1.0\n").unwrap();

        (dir, path)
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn fetch_returns_sorted_points() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvPriceAdapter::new(path);

        let points = adapter.fetch_adjusted_close("CCJ", d(15), d(17)).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0], PricePoint::new(d(15), 105.0));
        assert_eq!(points[2], PricePoint::new(d(17), 115.0));
    }

    #[test]
    fn fetch_filters_by_inclusive_range() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvPriceAdapter::new(path);

        let points = adapter.fetch_adjusted_close("CCJ", d(16), d(16)).unwrap();

        assert_eq!(points, vec![PricePoint::new(d(16), 110.0)]);
    }

    #[test]
    fn fetch_header_only_is_empty() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvPriceAdapter::new(path);
        assert!(adapter.fetch_adjusted_close("UEC", d(1), d(31)).unwrap().is_empty());
    }

    #[test]
    fn fetch_missing_file_is_unavailable() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvPriceAdapter::new(path);

        let result = adapter.fetch_adjusted_close("XYZ", d(1), d(31));

        assert!(matches!(result, Err(AnalysisError::DataUnavailable { ticker, .. }) if ticker == "XYZ"));
    }

    #[test]
    fn fetch_bad_date_is_unavailable() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvPriceAdapter::new(path);
        assert!(adapter.fetch_adjusted_close("BAD", d(1), d(31)).is_err());
    }
}
