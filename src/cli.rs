//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::adapters::text_report_adapter::{render_summary, TextReportAdapter};
use crate::domain::backtest::{run_backtest, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{build_backtest_config, validate_backtest_config};
use crate::domain::error::TraderError;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "ewotrader", about = "Single-asset bar backtester")]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over a CSV bar file
    Backtest {
        /// INI config; built-in defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory containing <SYMBOL>.csv
        #[arg(short, long)]
        data_dir: PathBuf,
        /// Overrides [backtest] symbol
        #[arg(long)]
        symbol: Option<String>,
        /// Write the full text report here
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the equity curve with trade markers as SVG
        #[arg(long)]
        chart: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Install the stderr log subscriber. Safe to call more than once.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);

    let outcome = match cli.command {
        Command::Backtest {
            config,
            data_dir,
            symbol,
            output,
            chart,
        } => run_backtest_command(
            config.as_deref(),
            data_dir,
            symbol,
            output.as_deref(),
            chart.as_deref(),
        ),
        Command::Validate { config } => run_validate(&config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TraderError> {
    FileConfigAdapter::from_file(path).map_err(|e| TraderError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Defaults when no file is given, otherwise the validated file contents.
pub fn resolve_config(path: Option<&Path>) -> Result<BacktestConfig, TraderError> {
    match path {
        Some(path) => {
            info!("loading config from {}", path.display());
            build_backtest_config(&load_config(path)?)
        }
        None => Ok(BacktestConfig::default()),
    }
}

fn run_backtest_command(
    config_path: Option<&Path>,
    data_dir: PathBuf,
    symbol_override: Option<String>,
    output_path: Option<&Path>,
    chart_path: Option<&Path>,
) -> Result<(), TraderError> {
    let mut config = resolve_config(config_path)?;
    if let Some(symbol) = symbol_override {
        config.symbol = symbol;
    }

    let data_port = CsvAdapter::new(data_dir);
    let result = run_backtest_pipeline(&data_port, &config)?;

    print!("{}", render_summary(&result, &config));

    if let Some(path) = output_path {
        let path_str = path.display().to_string();
        TextReportAdapter::new().write(&result, &config, &path_str)?;
        info!("report written to {}", path_str);
    }
    if let Some(path) = chart_path {
        let path_str = path.display().to_string();
        SvgChartAdapter::new().write(&result, &config, &path_str)?;
        info!("chart written to {}", path_str);
    }
    Ok(())
}

/// Fetch bars for the configured symbol and run the backtest over them.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    config: &BacktestConfig,
) -> Result<BacktestResult, TraderError> {
    let bars = data_port.fetch_bars(&config.symbol, config.start_date, config.end_date)?;
    if bars.is_empty() {
        return Err(TraderError::NoData {
            symbol: config.symbol.clone(),
        });
    }

    let first = bars[0].timestamp.date();
    let last = bars[bars.len() - 1].timestamp.date();
    info!(symbol = %config.symbol, bars = bars.len(), %first, %last, "data loaded");

    run_backtest(&bars, config)
}

fn run_validate(config_path: &Path) -> Result<(), TraderError> {
    validate_backtest_config(&load_config(config_path)?)?;
    println!("Config OK: {}", config_path.display());
    Ok(())
}
