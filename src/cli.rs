//! CLI definition and dispatch.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use crate::adapters::console_report::ConsoleReport;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{
    self as backtest_engine, BacktestConfig, BacktestResult, DEFAULT_INITIAL_BALANCE,
    DEFAULT_LONG_PERIOD, DEFAULT_SHORT_PERIOD,
};
use crate::domain::config_validation::{
    validate_backtest_config, validate_config_file, validate_monte_carlo_config,
};
use crate::domain::error::MacrossError;
use crate::domain::monte_carlo::{
    DEFAULT_PATH_LENGTH, DEFAULT_SIMULATIONS, MonteCarloConfig, MonteCarloSummary, PathRun,
    run_monte_carlo, run_single_path,
};
use crate::domain::moving_average::MovingAverageSeries;
use crate::domain::price::PriceSeries;
use crate::domain::synthetic::DEFAULT_INITIAL_PRICE;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "macross", about = "Moving-average crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Strategy parameters shared by every mode. Flags override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct StrategyArgs {
    /// Short moving-average window
    #[arg(long)]
    pub short: Option<usize>,
    /// Long moving-average window
    #[arg(long)]
    pub long: Option<usize>,
    /// Starting balance
    #[arg(long)]
    pub initial_balance: Option<f64>,
}

/// Synthetic path parameters.
#[derive(Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Periods per synthetic path
    #[arg(long)]
    pub path_length: Option<usize>,
    /// First price of every synthetic path
    #[arg(long)]
    pub initial_price: Option<f64>,
    /// Master seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct MonteCarloArgs {
    /// Number of synthetic paths
    #[arg(short = 'n', long)]
    pub simulations: Option<usize>,
    #[command(flatten)]
    pub path: PathArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Backtest against a historical price file
    Backtest {
        /// CSV price file
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        strategy: StrategyArgs,
        /// Print prices and both moving averages before the results
        #[arg(long)]
        show_averages: bool,
    },
    /// Run the strategy once over a single random-walk path
    Simulate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        strategy: StrategyArgs,
        #[command(flatten)]
        path: PathArgs,
        /// Print prices and both moving averages before the results
        #[arg(long)]
        show_averages: bool,
    },
    /// Evaluate the strategy over random-walk paths
    MonteCarlo {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        strategy: StrategyArgs,
        #[command(flatten)]
        monte_carlo: MonteCarloArgs,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            data,
            config,
            strategy,
            show_averages,
        } => run_backtest(&data, config.as_ref(), &strategy, show_averages),
        Command::Simulate {
            config,
            strategy,
            path,
            show_averages,
        } => run_simulate(config.as_ref(), &strategy, &path, show_averages),
        Command::MonteCarlo {
            config,
            strategy,
            monte_carlo,
        } => run_monte_carlo_command(config.as_ref(), &strategy, &monte_carlo),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    let adapter = FileConfigAdapter::from_file(path).map_err(|e| {
        report_error(&MacrossError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })
    })?;
    validate_config_file(&adapter).map_err(|e| report_error(&e))?;
    Ok(adapter)
}

/// Config file if given, otherwise an empty one so every value falls back to its default.
fn load_optional_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    match path {
        Some(p) => {
            eprintln!("Loading config from {}", p.display());
            load_config(p)
        }
        None => FileConfigAdapter::from_string("").map_err(|reason| {
            report_error(&MacrossError::ConfigParse {
                file: "<defaults>".into(),
                reason,
            })
        }),
    }
}

fn report_error(err: &MacrossError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

fn get_usize(config: &dyn ConfigPort, section: &str, key: &str, default: usize) -> usize {
    usize::try_from(config.get_int(section, key, default as i64)).unwrap_or(0)
}

pub fn build_backtest_config(config: &dyn ConfigPort, args: &StrategyArgs) -> BacktestConfig {
    BacktestConfig {
        short_period: args
            .short
            .unwrap_or_else(|| get_usize(config, "strategy", "short_period", DEFAULT_SHORT_PERIOD)),
        long_period: args
            .long
            .unwrap_or_else(|| get_usize(config, "strategy", "long_period", DEFAULT_LONG_PERIOD)),
        initial_balance: args.initial_balance.unwrap_or_else(|| {
            config.get_double("backtest", "initial_balance", DEFAULT_INITIAL_BALANCE)
        }),
    }
}

pub fn build_monte_carlo_config(
    config: &dyn ConfigPort,
    strategy: &StrategyArgs,
    args: &MonteCarloArgs,
) -> MonteCarloConfig {
    MonteCarloConfig {
        num_simulations: args.simulations.unwrap_or_else(|| {
            get_usize(config, "monte_carlo", "simulations", DEFAULT_SIMULATIONS)
        }),
        ..build_path_config(config, strategy, &args.path)
    }
}

/// Config for a single synthetic path. The simulation count is fixed at one.
pub fn build_path_config(
    config: &dyn ConfigPort,
    strategy: &StrategyArgs,
    args: &PathArgs,
) -> MonteCarloConfig {
    let base = build_backtest_config(config, strategy);
    let seed = args.seed.or_else(|| {
        config
            .get_string("monte_carlo", "seed")
            .and_then(|s| s.trim().parse().ok())
    });

    MonteCarloConfig {
        num_simulations: 1,
        path_length: args.path_length.unwrap_or_else(|| {
            get_usize(config, "monte_carlo", "path_length", DEFAULT_PATH_LENGTH)
        }),
        short_period: base.short_period,
        long_period: base.long_period,
        initial_balance: base.initial_balance,
        initial_price: args.initial_price.unwrap_or_else(|| {
            config.get_double("monte_carlo", "initial_price", DEFAULT_INITIAL_PRICE)
        }),
        seed,
    }
}

fn run_backtest(
    data: &PathBuf,
    config_path: Option<&PathBuf>,
    args: &StrategyArgs,
    show_averages: bool,
) -> ExitCode {
    let adapter = match load_optional_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let bt_config = build_backtest_config(&adapter, args);
    if let Err(e) = validate_backtest_config(&bt_config) {
        return report_error(&e);
    }

    eprintln!("Reading data from {}", data.display());
    let data_port = CsvAdapter::new(data.clone());
    let mut report = ConsoleReport::new(io::stdout().lock());

    match run_backtest_pipeline(&data_port, &bt_config, show_averages, &mut report) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

/// Load, backtest and report. Everything after the config is built.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    config: &BacktestConfig,
    show_averages: bool,
    report: &mut dyn ReportPort,
) -> Result<BacktestResult, MacrossError> {
    let series = data_port.fetch_prices()?;
    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        info!(
            source = %data_port.source_name(),
            observations = series.len(),
            first = %first.label,
            last = %last.label,
            "price series ready"
        );
    }

    let result = backtest_engine::run_backtest(&series, config)?;
    if show_averages {
        write_averages(&series, config, report)?;
    }
    report.write_backtest(&result.simulation.trades, &result.summary)?;
    Ok(result)
}

fn write_averages(
    series: &PriceSeries,
    config: &BacktestConfig,
    report: &mut dyn ReportPort,
) -> Result<(), MacrossError> {
    let closes = series.closes();
    let short_ma = MovingAverageSeries::compute(&closes, config.short_period);
    let long_ma = MovingAverageSeries::compute(&closes, config.long_period);
    report.write_price_table(series, &short_ma, &long_ma)
}

fn run_simulate(
    config_path: Option<&PathBuf>,
    strategy: &StrategyArgs,
    args: &PathArgs,
    show_averages: bool,
) -> ExitCode {
    let adapter = match load_optional_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let path_config = build_path_config(&adapter, strategy, args);
    let mut report = ConsoleReport::new(io::stdout().lock());

    match run_simulate_pipeline(&path_config, show_averages, &mut report) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

/// Generate one path, replay the strategy and report it.
pub fn run_simulate_pipeline(
    config: &MonteCarloConfig,
    show_averages: bool,
    report: &mut dyn ReportPort,
) -> Result<PathRun, MacrossError> {
    let run = run_single_path(config)?;
    if show_averages {
        report.write_price_table(&run.series, &run.short_ma, &run.long_ma)?;
    }
    report.write_path(&run.simulation)?;
    Ok(run)
}

fn run_monte_carlo_command(
    config_path: Option<&PathBuf>,
    strategy: &StrategyArgs,
    args: &MonteCarloArgs,
) -> ExitCode {
    let adapter = match load_optional_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let mc_config = build_monte_carlo_config(&adapter, strategy, args);
    if let Err(e) = validate_monte_carlo_config(&mc_config) {
        return report_error(&e);
    }

    eprintln!(
        "Running Monte Carlo Simulation ({} simulations)...",
        mc_config.num_simulations
    );
    let mut report = ConsoleReport::new(io::stdout());

    match run_monte_carlo_pipeline(&mc_config, &mut report) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

/// Run every trial, reporting progress as trials complete, then the summary.
pub fn run_monte_carlo_pipeline(
    config: &MonteCarloConfig,
    report: &mut (dyn ReportPort + Send),
) -> Result<MonteCarloSummary, MacrossError> {
    let summary = {
        let shared = Mutex::new(&mut *report);
        run_monte_carlo(config, |completed| {
            let Ok(mut report) = shared.lock() else {
                return;
            };
            if let Err(e) = report.write_progress(completed) {
                warn!(error = %e, "failed to write progress");
            }
        })?
    };

    report.write_monte_carlo_summary(&summary)?;
    Ok(summary)
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let defaults = StrategyArgs::default();
    let bt_config = build_backtest_config(&adapter, &defaults);
    if let Err(e) = validate_backtest_config(&bt_config) {
        return report_error(&e);
    }
    let mc_config = build_monte_carlo_config(&adapter, &defaults, &MonteCarloArgs::default());
    if let Err(e) = validate_monte_carlo_config(&mc_config) {
        return report_error(&e);
    }

    println!("Strategy:");
    println!("  short_period:    {}", bt_config.short_period);
    println!("  long_period:     {}", bt_config.long_period);
    println!("  initial_balance: {:.2}", bt_config.initial_balance);
    println!("Monte Carlo:");
    println!("  simulations:     {}", mc_config.num_simulations);
    println!("  path_length:     {}", mc_config.path_length);
    println!("  initial_price:   {:.2}", mc_config.initial_price);
    match mc_config.seed {
        Some(seed) => println!("  seed:            {}", seed),
        None => println!("  seed:            (entropy)"),
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
