//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::process::ExitCode;
#[cfg(feature = "yahoo")]
use std::time::Duration;

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{AnalysisReport, PortfolioAnalysis};
use crate::domain::config::{DataSource, RunConfig};
use crate::domain::error::AnalysisError;
use crate::ports::price_port::PricePort;

#[derive(Parser, Debug)]
#[command(
    name = "portfolio-analysis",
    about = "Monte Carlo Sortino portfolio optimizer",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch prices, simulate portfolios and write CSV results
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Output directory, overrides [output] dir
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// RNG seed, overrides [analysis] seed
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("portfolio_analysis=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            output,
            seed,
            dry_run,
        } => run_analysis(&config, output.as_ref(), seed, dry_run),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = AnalysisError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Load the file, apply CLI overrides and validate.
pub fn resolve_config(
    config_path: &PathBuf,
    output_override: Option<&PathBuf>,
    seed_override: Option<u64>,
) -> Result<RunConfig, ExitCode> {
    let mut adapter = load_config(config_path)?;

    if let Some(dir) = output_override {
        adapter.set("output", "dir", &dir.display().to_string());
    }
    if let Some(seed) = seed_override {
        adapter.set("analysis", "seed", &seed.to_string());
    }

    RunConfig::from_port(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

pub fn build_price_port(source: &DataSource) -> Result<Box<dyn PricePort>, AnalysisError> {
    match source {
        DataSource::Csv { dir } => Ok(Box::new(CsvPriceAdapter::new(dir.clone()))),
        #[cfg(feature = "yahoo")]
        DataSource::Yahoo {
            base_url,
            timeout_secs,
        } => {
            let adapter = crate::adapters::yahoo_adapter::YahooAdapter::new(
                base_url,
                Duration::from_secs(*timeout_secs),
            )?;
            Ok(Box::new(adapter))
        }
        #[cfg(not(feature = "yahoo"))]
        DataSource::Yahoo { .. } => Err(AnalysisError::invalid(
            "source",
            "yahoo feature is required for the yahoo data source",
        )),
    }
}

fn run_analysis(
    config_path: &PathBuf,
    output_override: Option<&PathBuf>,
    seed_override: Option<u64>,
    dry_run: bool,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let run_config = match resolve_config(config_path, output_override, seed_override) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if dry_run {
        print_resolved(&run_config);
        eprintln!("\nDry run complete: configuration is valid");
        return ExitCode::SUCCESS;
    }

    let price_port = match build_price_port(&run_config.data) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut rng = match run_config.analysis.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let analysis = PortfolioAnalysis::new(run_config.analysis.clone(), price_port.as_ref());
    let report = match analysis.run(&mut rng) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_summary(&report);

    let sink = CsvReportAdapter::new(run_config.output.dir.clone());
    match report.export(&sink, run_config.output.export_prices) {
        Ok(()) => {
            eprintln!("\nResults written to: {}", sink.output_dir().display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    match resolve_config(config_path, None, None) {
        Ok(run_config) => {
            print_resolved(&run_config);
            eprintln!("\nConfiguration is valid.");
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}

fn print_resolved(run_config: &RunConfig) {
    let a = &run_config.analysis;
    eprintln!("\nAnalysis:");
    eprintln!("  industry:        {}", a.industry);
    eprintln!("  tickers:         {}", a.tickers.join(", "));
    eprintln!("  period:          {} to {}", a.start_date, a.end_date);
    eprintln!("  trading days:    {}", a.trading_days);
    eprintln!("  risk-free rate:  {}", a.risk_free_rate);
    eprintln!("  simulations:     {}", a.simulations);
    eprintln!("  investment:      ${:.2}", a.investment);
    match a.comparison_start() {
        Some(split) => eprintln!("  comparison from: {} ({} days)", split, a.comparison_days),
        None => eprintln!("  comparison:      whole period"),
    }
    if let Some(seed) = a.seed {
        eprintln!("  seed:            {}", seed);
    }

    eprintln!("\nData:");
    match &run_config.data {
        DataSource::Yahoo { base_url, .. } => eprintln!("  source: yahoo ({})", base_url),
        DataSource::Csv { dir } => eprintln!("  source: csv ({})", dir.display()),
    }
    eprintln!("\nOutput:");
    eprintln!("  dir: {}", run_config.output.dir.display());
}

fn print_summary(report: &AnalysisReport) {
    let summary = &report.summary;

    if !report.skipped.is_empty() {
        eprintln!("\n=== Skipped Tickers ===");
        for s in &report.skipped {
            eprintln!("  {}: {}", s.ticker, s.reason);
        }
    }

    eprintln!(
        "\n=== Maximum Sortino Portfolio (trial {} of {}) ===",
        summary.optimal.trial + 1,
        report.simulations.len()
    );
    eprintln!(
        "{:<22}{:>16}{:>16}{:>12}{:>16}",
        "Metric", "Simulated", "Actual", "PCT Diff", "Equal Weight"
    );
    for row in summary.comparison_rows() {
        let fmt = |v: Option<f64>| v.map(|x| format!("{x:.4}")).unwrap_or_default();
        eprintln!(
            "{:<22}{:>16.4}{:>16}{:>12}{:>16}",
            row.metric,
            row.simulated,
            fmt(row.actual),
            fmt(row.pct_diff()),
            fmt(row.equal_weight),
        );
    }
    eprintln!(
        "\nProjected value of ${:.2}: ${:.2} (actual ${:.2})",
        summary.investment, summary.projected_value, summary.actual.dollar_value
    );
}
