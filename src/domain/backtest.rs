//! Single-path backtest pipeline.
//!
//! PriceSeries -> moving averages -> simulation -> metrics.

use tracing::info;

use super::config_validation::{validate_backtest_config, validate_windows};
use super::error::MacrossError;
use super::metrics::RunSummary;
use super::moving_average::MovingAverageSeries;
use super::portfolio::{Simulation, buy_and_hold, simulate};
use super::price::PriceSeries;

pub const DEFAULT_SHORT_PERIOD: usize = 5;
pub const DEFAULT_LONG_PERIOD: usize = 20;
pub const DEFAULT_INITIAL_BALANCE: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub short_period: usize,
    pub long_period: usize,
    pub initial_balance: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            short_period: DEFAULT_SHORT_PERIOD,
            long_period: DEFAULT_LONG_PERIOD,
            initial_balance: DEFAULT_INITIAL_BALANCE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub simulation: Simulation,
    pub summary: RunSummary,
}

/// Moving averages and simulation for one path. Shared by backtests and Monte Carlo trials.
pub fn simulate_series(
    series: &PriceSeries,
    short_period: usize,
    long_period: usize,
    initial_balance: f64,
) -> Result<Simulation, MacrossError> {
    let closes = series.closes();
    let short_ma = MovingAverageSeries::compute(&closes, short_period);
    let long_ma = MovingAverageSeries::compute(&closes, long_period);
    simulate(series, &short_ma, &long_ma, initial_balance)
}

pub fn run_backtest(
    series: &PriceSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, MacrossError> {
    validate_backtest_config(config)?;
    validate_windows(config.short_period, config.long_period, series.len())?;

    info!(
        observations = series.len(),
        short = config.short_period,
        long = config.long_period,
        "running backtest"
    );

    let simulation = simulate_series(
        series,
        config.short_period,
        config.long_period,
        config.initial_balance,
    )?;
    let baseline = buy_and_hold(series, config.initial_balance)?;
    let summary = RunSummary::compute(
        &simulation.trajectory,
        config.initial_balance,
        simulation.trade_count(),
        baseline,
    )?;

    Ok(BacktestResult {
        simulation,
        summary,
    })
}
