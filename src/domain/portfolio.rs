//! Single-path portfolio simulation and the buy-and-hold baseline.

use tracing::debug;

use super::error::MacrossError;
use super::moving_average::MovingAverageSeries;
use super::price::PriceSeries;
use super::signal::{PositionState, SignalEngine, Trade, first_signal_index};

/// Outcome of replaying the crossover strategy over one price path.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub initial_balance: f64,
    /// Mark-to-market balance per evaluated period.
    pub trajectory: Vec<f64>,
    pub trades: Vec<Trade>,
    pub final_state: PositionState,
}

impl Simulation {
    pub fn final_balance(&self) -> f64 {
        self.trajectory
            .last()
            .copied()
            .unwrap_or(self.initial_balance)
    }

    pub fn total_return_pct(&self) -> f64 {
        (self.final_balance() - self.initial_balance) / self.initial_balance * 100.0
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }
}

/// Replay the strategy period by period.
///
/// At each evaluated index the period's return is applied using the position
/// held coming into it, the balance is recorded, and only then is the crossover
/// checked. A trade decided at `i` therefore earns its first return at `i + 1`.
pub fn simulate(
    series: &PriceSeries,
    short_ma: &MovingAverageSeries,
    long_ma: &MovingAverageSeries,
    initial_balance: f64,
) -> Result<Simulation, MacrossError> {
    let observations = series.observations();
    // Every evaluated period needs a predecessor close.
    let start = first_signal_index(short_ma.period, long_ma.period).max(1);

    let mut engine = SignalEngine::new();
    let mut balance = initial_balance;
    let mut trajectory = Vec::with_capacity(observations.len().saturating_sub(start));
    let mut trades = Vec::new();

    for i in start..observations.len() {
        let prev_close = observations[i - 1].close;
        if prev_close <= 0.0 {
            return Err(MacrossError::NonPositiveClose {
                index: i,
                prior_index: i - 1,
                close: prev_close,
            });
        }

        let obs = &observations[i];
        if engine.state() == PositionState::Long {
            balance *= obs.close / prev_close;
        }
        trajectory.push(balance);

        if let Some(action) = engine.step(short_ma.values[i], long_ma.values[i]) {
            debug!(index = i, label = %obs.label, %action, price = obs.close, "position change");
            trades.push(Trade {
                index: i,
                label: obs.label.clone(),
                action,
                price: obs.close,
            });
        }
    }

    Ok(Simulation {
        initial_balance,
        trajectory,
        trades,
        final_state: engine.state(),
    })
}

/// Balance from holding the instrument from the first to the last observation.
pub fn buy_and_hold(series: &PriceSeries, initial_balance: f64) -> Result<f64, MacrossError> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => {
            return Err(MacrossError::InsufficientData {
                what: "buy-and-hold baseline".into(),
                have: 0,
                need: 1,
            });
        }
    };

    if first.close <= 0.0 {
        return Err(MacrossError::NonPositiveClose {
            index: series.len() - 1,
            prior_index: 0,
            close: first.close,
        });
    }

    Ok(initial_balance * (last.close / first.close))
}
