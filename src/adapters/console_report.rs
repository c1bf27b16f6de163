//! Plain-text console report adapter.

use std::io::Write;

use crate::domain::error::MacrossError;
use crate::domain::metrics::RunSummary;
use crate::domain::monte_carlo::MonteCarloSummary;
use crate::domain::moving_average::MovingAverageSeries;
use crate::domain::portfolio::Simulation;
use crate::domain::price::PriceSeries;
use crate::domain::signal::Trade;
use crate::ports::report_port::ReportPort;

const RULE: &str = "--------------------------------";
const NOT_AVAILABLE: &str = "N/A";

fn average_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:>15.2}", v),
        None => format!("{:>15}", NOT_AVAILABLE),
    }
}

/// Writes reports as text to any writer; the CLI hands it stdout.
pub struct ConsoleReport<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportPort for ConsoleReport<W> {
    fn write_trade(&mut self, trade: &Trade) -> Result<(), MacrossError> {
        writeln!(
            self.out,
            "{}: {} at {:.2}",
            trade.label, trade.action, trade.price
        )?;
        Ok(())
    }

    fn write_run_summary(&mut self, s: &RunSummary) -> Result<(), MacrossError> {
        let out = &mut self.out;
        writeln!(out)?;
        writeln!(out, "Backtest Results:")?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "Initial Balance: ${:.2}", s.initial_balance)?;
        writeln!(out, "Final Balance: ${:.2}", s.final_balance)?;
        writeln!(out, "Total Return: {:.2}%", s.total_return_pct)?;
        writeln!(out, "Number of Trades: {}", s.trade_count)?;
        writeln!(out, "Average Daily Return: {:.4}%", s.avg_daily_return_pct)?;
        writeln!(out, "Annualized Volatility: {:.2}%", s.annualized_volatility_pct)?;
        writeln!(out, "Sharpe Ratio: {:.2}", s.sharpe_ratio)?;
        writeln!(out, "Max Drawdown: {:.2}%", s.max_drawdown_pct)?;
        writeln!(out)?;
        writeln!(out, "Buy and Hold Comparison:")?;
        writeln!(out, "{RULE}")?;
        writeln!(
            out,
            "Buy and Hold Final Balance: ${:.2}",
            s.buy_and_hold_final_balance
        )?;
        writeln!(out, "Buy and Hold Return: {:.2}%", s.buy_and_hold_return_pct)?;
        writeln!(out, "Strategy vs Buy and Hold: {:.2}%", s.excess_return_pct())?;
        Ok(())
    }

    fn write_progress(&mut self, completed: usize) -> Result<(), MacrossError> {
        writeln!(self.out, "Completed {} simulations...", completed)?;
        Ok(())
    }

    fn write_price_table(
        &mut self,
        series: &PriceSeries,
        short_ma: &MovingAverageSeries,
        long_ma: &MovingAverageSeries,
    ) -> Result<(), MacrossError> {
        let out = &mut self.out;
        writeln!(out)?;
        writeln!(out, "Price Data and Moving Averages:")?;
        writeln!(
            out,
            "{:>10}{:>15}{:>15}{:>15}",
            "Day", "Price", "Short MA", "Long MA"
        )?;
        for (i, obs) in series.observations().iter().enumerate() {
            writeln!(
                out,
                "{:>10}{:>15.2}{}{}",
                i,
                obs.close,
                average_cell(short_ma.get(i)),
                average_cell(long_ma.get(i))
            )?;
        }
        Ok(())
    }

    fn write_path_result(&mut self, simulation: &Simulation) -> Result<(), MacrossError> {
        let out = &mut self.out;
        writeln!(out)?;
        writeln!(out, "Final Results:")?;
        writeln!(out, "Initial Balance: ${:.2}", simulation.initial_balance)?;
        writeln!(out, "Final Balance: ${:.2}", simulation.final_balance())?;
        writeln!(out, "Return: {:.2}%", simulation.total_return_pct())?;
        Ok(())
    }

    fn write_monte_carlo_summary(
        &mut self,
        s: &MonteCarloSummary,
    ) -> Result<(), MacrossError> {
        let out = &mut self.out;
        writeln!(out)?;
        writeln!(out, "Monte Carlo Simulation Results:")?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "Number of Simulations: {}", s.simulation_count)?;
        writeln!(out, "Average Return: {:.2}%", s.avg_return_pct)?;
        writeln!(out, "Median Return: {:.2}%", s.median_return_pct)?;
        writeln!(out, "Best Return: {:.2}%", s.best_return_pct)?;
        writeln!(out, "Worst Return: {:.2}%", s.worst_return_pct)?;
        writeln!(out, "95th Percentile: {:.2}%", s.p95_return_pct)?;
        writeln!(out, "5th Percentile: {:.2}%", s.p5_return_pct)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::{Action, PositionState};

    fn render<F: FnOnce(&mut ConsoleReport<Vec<u8>>)>(f: F) -> String {
        let mut report = ConsoleReport::new(Vec::new());
        f(&mut report);
        String::from_utf8(report.into_inner()).unwrap()
    }

    fn sample_summary() -> RunSummary {
        RunSummary {
            initial_balance: 10_000.0,
            final_balance: 11_234.567,
            total_return_pct: 12.34567,
            trade_count: 7,
            avg_daily_return_pct: 0.046_123,
            annualized_volatility_pct: 18.456,
            sharpe_ratio: 0.634,
            max_drawdown_pct: 8.5,
            buy_and_hold_final_balance: 12_000.0,
            buy_and_hold_return_pct: 20.0,
        }
    }

    #[test]
    fn trade_line_format() {
        let text = render(|r| {
            r.write_trade(&Trade {
                index: 20,
                label: "2024-03-01".into(),
                action: Action::Buy,
                price: 822.789,
            })
            .unwrap()
        });
        assert_eq!(text, "2024-03-01: BUY at 822.79\n");
    }

    #[test]
    fn run_summary_precision() {
        let text = render(|r| r.write_run_summary(&sample_summary()).unwrap());
        assert!(text.contains("Initial Balance: $10000.00\n"));
        assert!(text.contains("Final Balance: $11234.57\n"));
        assert!(text.contains("Total Return: 12.35%\n"));
        assert!(text.contains("Number of Trades: 7\n"));
        assert!(text.contains("Average Daily Return: 0.0461%\n"));
        assert!(text.contains("Annualized Volatility: 18.46%\n"));
        assert!(text.contains("Sharpe Ratio: 0.63\n"));
        assert!(text.contains("Max Drawdown: 8.50%\n"));
        assert!(text.contains("Buy and Hold Final Balance: $12000.00\n"));
        assert!(text.contains("Buy and Hold Return: 20.00%\n"));
        assert!(text.contains("Strategy vs Buy and Hold: -7.65%\n"));
    }

    #[test]
    fn non_finite_sharpe_is_printed_as_is() {
        let summary = RunSummary {
            sharpe_ratio: f64::NAN,
            ..sample_summary()
        };
        let text = render(|r| r.write_run_summary(&summary).unwrap());
        assert!(text.contains("Sharpe Ratio: NaN\n"));
    }

    #[test]
    fn backtest_writes_trades_then_summary() {
        let trades = vec![
            Trade {
                index: 20,
                label: "Day 20".into(),
                action: Action::Buy,
                price: 120.0,
            },
            Trade {
                index: 30,
                label: "Day 30".into(),
                action: Action::Sell,
                price: 110.5,
            },
        ];
        let text = render(|r| r.write_backtest(&trades, &sample_summary()).unwrap());
        assert!(text.starts_with("Day 20: BUY at 120.00\nDay 30: SELL at 110.50\n"));
        assert!(text.contains("Backtest Results:"));
    }

    #[test]
    fn progress_line() {
        let text = render(|r| r.write_progress(30).unwrap());
        assert_eq!(text, "Completed 30 simulations...\n");
    }

    #[test]
    fn monte_carlo_summary_format() {
        let summary = MonteCarloSummary {
            simulation_count: 100,
            avg_return_pct: 1.234,
            median_return_pct: 0.5,
            best_return_pct: 45.678,
            worst_return_pct: -30.001,
            p95_return_pct: 25.0,
            p5_return_pct: -18.1,
        };
        let text = render(|r| r.write_monte_carlo_summary(&summary).unwrap());
        assert!(text.contains("Number of Simulations: 100\n"));
        assert!(text.contains("Average Return: 1.23%\n"));
        assert!(text.contains("Median Return: 0.50%\n"));
        assert!(text.contains("Best Return: 45.68%\n"));
        assert!(text.contains("Worst Return: -30.00%\n"));
        assert!(text.contains("95th Percentile: 25.00%\n"));
        assert!(text.contains("5th Percentile: -18.10%\n"));
    }

    #[test]
    fn price_table_marks_warmup() {
        let series = PriceSeries::from_closes(&[10.0, 11.0, 12.0, 13.5]);
        let closes = series.closes();
        let short_ma = MovingAverageSeries::compute(&closes, 2);
        let long_ma = MovingAverageSeries::compute(&closes, 3);
        let text = render(|r| r.write_price_table(&series, &short_ma, &long_ma).unwrap());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "Price Data and Moving Averages:");
        assert_eq!(
            lines[2],
            "       Day          Price       Short MA        Long MA"
        );
        assert_eq!(
            lines[3],
            "         0          10.00            N/A            N/A"
        );
        assert_eq!(
            lines[4],
            "         1          11.00          10.50            N/A"
        );
        assert_eq!(
            lines[6],
            "         3          13.50          12.75          12.17"
        );
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn path_writes_trades_then_final_results() {
        let simulation = Simulation {
            initial_balance: 10_000.0,
            trajectory: vec![10_000.0, 10_250.0, 10_512.3],
            trades: vec![Trade {
                index: 20,
                label: "Day 20".into(),
                action: Action::Buy,
                price: 101.234,
            }],
            final_state: PositionState::Long,
        };
        let text = render(|r| r.write_path(&simulation).unwrap());
        assert_eq!(
            text,
            "Day 20: BUY at 101.23\n\nFinal Results:\nInitial Balance: $10000.00\n\
             Final Balance: $10512.30\nReturn: 5.12%\n"
        );
    }
}
