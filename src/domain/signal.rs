//! Crossover signal state machine.
//!
//! One step per index from the first point where both averages are valid.
//! Flat -> Long on short > long, Long -> Flat on short < long, ties hold.

use std::fmt;

use super::moving_average::MovingAverageSeries;
use super::price::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub index: usize,
    pub label: String,
    pub action: Action,
    pub price: f64,
}

/// First index at which both averages have a full window.
///
/// The signal loop starts here rather than at `max - 1`, matching how both the
/// historical and the synthetic pipelines treat the long window as the readiness gate.
pub fn first_signal_index(short_period: usize, long_period: usize) -> usize {
    short_period.max(long_period)
}

#[derive(Debug, Clone, Default)]
pub struct SignalEngine {
    state: PositionState,
}

impl SignalEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PositionState {
        self.state
    }

    /// Advance one period. Returns the action taken, if any.
    pub fn step(&mut self, short_ma: f64, long_ma: f64) -> Option<Action> {
        match self.state {
            PositionState::Flat if short_ma > long_ma => {
                self.state = PositionState::Long;
                Some(Action::Buy)
            }
            PositionState::Long if short_ma < long_ma => {
                self.state = PositionState::Flat;
                Some(Action::Sell)
            }
            _ => None,
        }
    }
}

/// Full trade log for a series without tracking balances.
pub fn generate_signals(
    series: &PriceSeries,
    short_ma: &MovingAverageSeries,
    long_ma: &MovingAverageSeries,
) -> Vec<Trade> {
    let mut engine = SignalEngine::new();
    let mut trades = Vec::new();
    let start = first_signal_index(short_ma.period, long_ma.period);

    for (i, obs) in series.observations().iter().enumerate().skip(start) {
        if let Some(action) = engine.step(short_ma.values[i], long_ma.values[i]) {
            trades.push(Trade {
                index: i,
                label: obs.label.clone(),
                action,
                price: obs.close,
            });
        }
    }

    trades
}
