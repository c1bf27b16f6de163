//! Monte Carlo evaluation over synthetic random-walk paths.
//!
//! Each trial generates a fresh path, runs the crossover pipeline and records
//! the total return. Trials run on the rayon pool; every trial owns an `StdRng`
//! seeded from a list drawn up front from the master generator, so a fixed
//! master seed gives the same summary whatever the thread count.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use tracing::info;

use super::backtest::{DEFAULT_INITIAL_BALANCE, DEFAULT_LONG_PERIOD, DEFAULT_SHORT_PERIOD};
use super::config_validation::{validate_monte_carlo_config, validate_path_config};
use super::error::MacrossError;
use super::moving_average::MovingAverageSeries;
use super::portfolio::{Simulation, simulate};
use super::price::PriceSeries;
use super::synthetic::{DEFAULT_INITIAL_PRICE, generate_path};

pub const DEFAULT_SIMULATIONS: usize = 100;
pub const DEFAULT_PATH_LENGTH: usize = 252;

/// Completed-trial interval at which progress is reported.
pub const PROGRESS_INTERVAL: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloConfig {
    pub num_simulations: usize,
    pub path_length: usize,
    pub short_period: usize,
    pub long_period: usize,
    pub initial_balance: f64,
    pub initial_price: f64,
    /// Master seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        MonteCarloConfig {
            num_simulations: DEFAULT_SIMULATIONS,
            path_length: DEFAULT_PATH_LENGTH,
            short_period: DEFAULT_SHORT_PERIOD,
            long_period: DEFAULT_LONG_PERIOD,
            initial_balance: DEFAULT_INITIAL_BALANCE,
            initial_price: DEFAULT_INITIAL_PRICE,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloSummary {
    pub simulation_count: usize,
    pub avg_return_pct: f64,
    pub median_return_pct: f64,
    pub best_return_pct: f64,
    pub worst_return_pct: f64,
    pub p95_return_pct: f64,
    pub p5_return_pct: f64,
}

impl MonteCarloSummary {
    /// Aggregate per-trial returns.
    ///
    /// Index-based statistics over the ascending sort: the median is
    /// `sorted[n / 2]` (upper middle for even `n`), percentiles are
    /// `sorted[floor(n * q)]` with no interpolation.
    pub fn from_returns(mut returns: Vec<f64>) -> Result<Self, MacrossError> {
        if returns.is_empty() {
            return Err(MacrossError::InsufficientData {
                what: "Monte Carlo returns".into(),
                have: 0,
                need: 1,
            });
        }

        returns.sort_by(f64::total_cmp);
        let n = returns.len();

        Ok(MonteCarloSummary {
            simulation_count: n,
            avg_return_pct: returns.iter().sum::<f64>() / n as f64,
            median_return_pct: returns[n / 2],
            best_return_pct: returns[n - 1],
            worst_return_pct: returns[0],
            p95_return_pct: returns[percentile_index(n, 0.95)],
            p5_return_pct: returns[percentile_index(n, 0.05)],
        })
    }
}

fn percentile_index(n: usize, q: f64) -> usize {
    ((n as f64 * q) as usize).min(n - 1)
}

/// One synthetic path together with its averages and the replayed strategy.
#[derive(Debug, Clone)]
pub struct PathRun {
    pub series: PriceSeries,
    pub short_ma: MovingAverageSeries,
    pub long_ma: MovingAverageSeries,
    pub simulation: Simulation,
}

/// Master generator: seeded when a seed is configured, OS entropy otherwise.
pub fn master_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Generate a path and replay the strategy over it.
pub fn run_path<R: RngCore>(rng: &mut R, config: &MonteCarloConfig) -> Result<PathRun, MacrossError> {
    let series = generate_path(rng, config.path_length, config.initial_price);
    let closes = series.closes();
    let short_ma = MovingAverageSeries::compute(&closes, config.short_period);
    let long_ma = MovingAverageSeries::compute(&closes, config.long_period);
    let simulation = simulate(&series, &short_ma, &long_ma, config.initial_balance)?;
    Ok(PathRun {
        series,
        short_ma,
        long_ma,
        simulation,
    })
}

/// Total return of one trial on a freshly generated path.
pub fn run_trial<R: RngCore>(rng: &mut R, config: &MonteCarloConfig) -> Result<f64, MacrossError> {
    Ok(run_path(rng, config)?.simulation.total_return_pct())
}

/// A single validated path drawn from the master generator.
pub fn run_single_path(config: &MonteCarloConfig) -> Result<PathRun, MacrossError> {
    validate_path_config(config)?;
    info!(
        path_length = config.path_length,
        short = config.short_period,
        long = config.long_period,
        seed = ?config.seed,
        "simulating single path"
    );
    let mut rng = master_rng(config.seed);
    run_path(&mut rng, config)
}

/// Run every trial and aggregate. `on_progress` receives the completed count
/// each time it reaches a multiple of [`PROGRESS_INTERVAL`]; it may be called
/// from any worker thread.
pub fn run_monte_carlo<F>(
    config: &MonteCarloConfig,
    on_progress: F,
) -> Result<MonteCarloSummary, MacrossError>
where
    F: Fn(usize) + Sync,
{
    validate_monte_carlo_config(config)?;

    let mut master = master_rng(config.seed);
    let trial_seeds: Vec<u64> = (0..config.num_simulations)
        .map(|_| master.next_u64())
        .collect();

    info!(
        simulations = config.num_simulations,
        path_length = config.path_length,
        seed = ?config.seed,
        "running Monte Carlo"
    );

    let completed = AtomicUsize::new(0);
    let returns = trial_seeds
        .par_iter()
        .map(|&seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = run_trial(&mut rng, config);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % PROGRESS_INTERVAL == 0 {
                on_progress(done);
            }
            result
        })
        .collect::<Result<Vec<f64>, MacrossError>>()?;

    MonteCarloSummary::from_returns(returns)
}
