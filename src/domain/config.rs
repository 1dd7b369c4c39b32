//! Run configuration and its validation.
//!
//! [`AnalysisConfig`] carries the analysis parameters; [`RunConfig`] adds the
//! data source and output settings read from the `[data]` and `[output]`
//! sections. Everything is validated before any data is fetched.

use chrono::{Days, NaiveDate};
use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::error::AnalysisError;
use crate::domain::simulation::DEFAULT_TRADING_DAYS;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.05;
pub const DEFAULT_COMPARISON_DAYS: u32 = 365;
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Descriptive label, used in output file names.
    pub industry: String,
    pub tickers: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub trading_days: u32,
    pub risk_free_rate: f64,
    pub simulations: usize,
    pub investment: f64,
    /// Trailing calendar days held out for the realized comparison. 0 disables the split.
    pub comparison_days: u32,
    pub seed: Option<u64>,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.industry.trim().is_empty() {
            return Err(AnalysisError::invalid("industry", "industry must not be empty"));
        }
        // The label becomes part of every output file name.
        if self.industry.contains(['/', '\\']) || matches!(self.industry.trim(), "." | "..") {
            return Err(AnalysisError::invalid(
                "industry",
                format!("industry '{}' must not contain path separators", self.industry),
            ));
        }
        if self.tickers.is_empty() {
            return Err(AnalysisError::invalid("tickers", "ticker list is empty"));
        }
        let mut seen = HashSet::new();
        for ticker in &self.tickers {
            if ticker.trim().is_empty() {
                return Err(AnalysisError::invalid("tickers", "empty ticker symbol"));
            }
            if !seen.insert(ticker.as_str()) {
                return Err(AnalysisError::invalid(
                    "tickers",
                    format!("duplicate ticker: {ticker}"),
                ));
            }
        }
        if self.start_date > self.end_date {
            return Err(AnalysisError::invalid(
                "start_date",
                "start_date must not be after end_date",
            ));
        }
        if let Some(split) = self.comparison_start() {
            if split < self.start_date {
                return Err(AnalysisError::invalid(
                    "comparison_days",
                    format!(
                        "a {} day comparison window starts before start_date",
                        self.comparison_days
                    ),
                ));
            }
        }
        if self.trading_days == 0 {
            return Err(AnalysisError::invalid(
                "trading_days",
                "trading_days must be positive",
            ));
        }
        if !self.risk_free_rate.is_finite() || self.risk_free_rate < 0.0 || self.risk_free_rate >= 1.0 {
            return Err(AnalysisError::invalid(
                "risk_free_rate",
                "risk_free_rate must be between 0 and 1",
            ));
        }
        if self.simulations == 0 {
            return Err(AnalysisError::invalid(
                "simulations",
                "simulations must be positive",
            ));
        }
        if !self.investment.is_finite() || self.investment <= 0.0 {
            return Err(AnalysisError::invalid(
                "investment",
                "investment must be positive",
            ));
        }
        Ok(())
    }

    /// Last date of the training window, or `None` when the split is disabled.
    ///
    /// Saturates at the earliest representable date; [`validate`](Self::validate)
    /// rejects any split before `start_date`.
    pub fn comparison_start(&self) -> Option<NaiveDate> {
        if self.comparison_days == 0 {
            return None;
        }
        Some(
            self.end_date
                .checked_sub_days(Days::new(u64::from(self.comparison_days)))
                .unwrap_or(NaiveDate::MIN),
        )
    }

    /// Prefix shared by every output file of this run.
    pub fn file_stem(&self) -> String {
        format!(
            "{}_{}_{}",
            self.industry.trim(),
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d")
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Yahoo { base_url: String, timeout_secs: u64 },
    Csv { dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub export_prices: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub analysis: AnalysisConfig,
    pub data: DataSource,
    pub output: OutputConfig,
}

impl RunConfig {
    /// Read and validate every section. Fails on the first bad value.
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, AnalysisError> {
        let analysis = build_analysis_config(config)?;
        analysis.validate()?;
        Ok(Self {
            analysis,
            data: build_data_source(config)?,
            output: build_output_config(config),
        })
    }
}

/// Split a comma-separated ticker list, trimming and uppercasing each symbol.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, AnalysisError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(AnalysisError::invalid("tickers", "empty token in ticker list"));
        }
        let ticker = trimmed.to_uppercase();
        if !seen.insert(ticker.clone()) {
            return Err(AnalysisError::invalid(
                "tickers",
                format!("duplicate ticker: {ticker}"),
            ));
        }
        tickers.push(ticker);
    }

    Ok(tickers)
}

pub fn build_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, AnalysisError> {
    let industry = required(config, "analysis", "industry")?;
    let tickers = parse_tickers(&required(config, "analysis", "tickers")?)?;
    let start_date = parse_date(config, "start_date")?;
    let end_date = parse_date(config, "end_date")?;

    let trading_days: i64 =
        parse_value(config, "analysis", "trading_days")?.unwrap_or(DEFAULT_TRADING_DAYS as i64);
    if trading_days <= 0 || trading_days > u32::MAX as i64 {
        return Err(AnalysisError::invalid(
            "trading_days",
            "trading_days must be positive",
        ));
    }

    let simulations: i64 = parse_value(config, "analysis", "simulations")?.ok_or_else(|| {
        AnalysisError::ConfigMissing {
            section: "analysis".to_string(),
            key: "simulations".to_string(),
        }
    })?;
    if simulations <= 0 {
        return Err(AnalysisError::invalid(
            "simulations",
            "simulations must be positive",
        ));
    }

    let investment: f64 = parse_value(config, "analysis", "investment")?.ok_or_else(|| {
        AnalysisError::ConfigMissing {
            section: "analysis".to_string(),
            key: "investment".to_string(),
        }
    })?;

    let comparison_days: i64 = parse_value(config, "analysis", "comparison_days")?
        .unwrap_or(DEFAULT_COMPARISON_DAYS as i64);
    if comparison_days < 0 || comparison_days > u32::MAX as i64 {
        return Err(AnalysisError::invalid(
            "comparison_days",
            "comparison_days must be non-negative",
        ));
    }

    Ok(AnalysisConfig {
        industry,
        tickers,
        start_date,
        end_date,
        trading_days: trading_days as u32,
        risk_free_rate: parse_value(config, "analysis", "risk_free_rate")?
            .unwrap_or(DEFAULT_RISK_FREE_RATE),
        simulations: simulations as usize,
        investment,
        comparison_days: comparison_days as u32,
        seed: parse_value(config, "analysis", "seed")?,
    })
}

pub fn build_data_source(config: &dyn ConfigPort) -> Result<DataSource, AnalysisError> {
    let source = config
        .get_string("data", "source")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| "yahoo".to_string());

    match source.as_str() {
        "yahoo" => {
            let timeout: i64 = parse_value(config, "data", "timeout_secs")?
                .unwrap_or(DEFAULT_TIMEOUT_SECS as i64);
            if timeout <= 0 {
                return Err(AnalysisError::invalid(
                    "timeout_secs",
                    "timeout_secs must be positive",
                ));
            }
            Ok(DataSource::Yahoo {
                base_url: config
                    .get_string("data", "yahoo_base_url")
                    .unwrap_or_else(|| DEFAULT_YAHOO_BASE_URL.to_string()),
                timeout_secs: timeout as u64,
            })
        }
        "csv" => Ok(DataSource::Csv {
            dir: PathBuf::from(required(config, "data", "csv_dir")?),
        }),
        other => Err(AnalysisError::invalid(
            "source",
            format!("unknown data source '{other}', expected yahoo or csv"),
        )),
    }
}

pub fn build_output_config(config: &dyn ConfigPort) -> OutputConfig {
    OutputConfig {
        dir: PathBuf::from(
            config
                .get_string("output", "dir")
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
        ),
        export_prices: config.get_bool("output", "export_prices", true),
    }
}

fn required(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, AnalysisError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(AnalysisError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn parse_value<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, AnalysisError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AnalysisError::invalid(key, format!("cannot parse '{}'", s.trim()))),
    }
}

fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, AnalysisError> {
    let value = required(config, "analysis", key)?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map_err(|_| AnalysisError::invalid(key, format!("invalid {key} format, expected YYYY-MM-DD")))
}
