//! Report output port trait.

use crate::domain::error::MacrossError;
use crate::domain::metrics::RunSummary;
use crate::domain::monte_carlo::MonteCarloSummary;
use crate::domain::moving_average::MovingAverageSeries;
use crate::domain::portfolio::Simulation;
use crate::domain::price::PriceSeries;
use crate::domain::signal::Trade;

/// Port for presenting run results.
pub trait ReportPort {
    fn write_trade(&mut self, trade: &Trade) -> Result<(), MacrossError>;

    fn write_run_summary(&mut self, summary: &RunSummary) -> Result<(), MacrossError>;

    fn write_progress(&mut self, completed: usize) -> Result<(), MacrossError>;

    /// One row per observation: price and both averages, absent during warmup.
    fn write_price_table(
        &mut self,
        series: &PriceSeries,
        short_ma: &MovingAverageSeries,
        long_ma: &MovingAverageSeries,
    ) -> Result<(), MacrossError>;

    /// Closing balance block of a single synthetic path.
    fn write_path_result(&mut self, simulation: &Simulation) -> Result<(), MacrossError>;

    fn write_monte_carlo_summary(&mut self, summary: &MonteCarloSummary)
    -> Result<(), MacrossError>;

    /// Default implementation: every trade in order, then the summary.
    fn write_backtest(&mut self, trades: &[Trade], summary: &RunSummary) -> Result<(), MacrossError> {
        for trade in trades {
            self.write_trade(trade)?;
        }
        self.write_run_summary(summary)
    }

    /// Trades of a single synthetic path, then its closing balance.
    fn write_path(&mut self, simulation: &Simulation) -> Result<(), MacrossError> {
        for trade in &simulation.trades {
            self.write_trade(trade)?;
        }
        self.write_path_result(simulation)
    }
}
