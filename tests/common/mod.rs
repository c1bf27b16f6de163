#![allow(dead_code)]

use macross::domain::error::MacrossError;
use macross::domain::metrics::RunSummary;
use macross::domain::monte_carlo::MonteCarloSummary;
use macross::domain::moving_average::MovingAverageSeries;
use macross::domain::portfolio::Simulation;
pub use macross::domain::price::{PriceObservation, PriceSeries};
use macross::domain::signal::Trade;
use macross::ports::data_port::DataPort;
use macross::ports::report_port::ReportPort;

pub struct MockDataPort {
    pub series: Option<PriceSeries>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            series: None,
            error: None,
        }
    }

    pub fn with_closes(mut self, closes: &[f64]) -> Self {
        self.series = Some(PriceSeries::from_closes(closes));
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(&self) -> Result<PriceSeries, MacrossError> {
        if let Some(reason) = &self.error {
            return Err(MacrossError::DataLoad {
                path: self.source_name(),
                reason: reason.clone(),
            });
        }
        match &self.series {
            Some(series) if !series.is_empty() => Ok(series.clone()),
            _ => Err(MacrossError::NoData {
                source_name: self.source_name(),
            }),
        }
    }

    fn source_name(&self) -> String {
        "mock".to_string()
    }
}

/// Report port that records everything it is given.
#[derive(Default)]
pub struct RecordingReport {
    pub trades: Vec<Trade>,
    pub run_summaries: Vec<RunSummary>,
    pub progress: Vec<usize>,
    pub monte_carlo: Vec<MonteCarloSummary>,
    /// Per table: (price, short, long) rows.
    pub price_tables: Vec<Vec<(f64, Option<f64>, Option<f64>)>>,
    pub path_results: Vec<Simulation>,
}

impl ReportPort for RecordingReport {
    fn write_trade(&mut self, trade: &Trade) -> Result<(), MacrossError> {
        self.trades.push(trade.clone());
        Ok(())
    }

    fn write_run_summary(&mut self, summary: &RunSummary) -> Result<(), MacrossError> {
        self.run_summaries.push(summary.clone());
        Ok(())
    }

    fn write_progress(&mut self, completed: usize) -> Result<(), MacrossError> {
        self.progress.push(completed);
        Ok(())
    }

    fn write_price_table(
        &mut self,
        series: &PriceSeries,
        short_ma: &MovingAverageSeries,
        long_ma: &MovingAverageSeries,
    ) -> Result<(), MacrossError> {
        let rows = series
            .observations()
            .iter()
            .enumerate()
            .map(|(i, obs)| (obs.close, short_ma.get(i), long_ma.get(i)))
            .collect();
        self.price_tables.push(rows);
        Ok(())
    }

    fn write_path_result(&mut self, simulation: &Simulation) -> Result<(), MacrossError> {
        self.path_results.push(simulation.clone());
        Ok(())
    }

    fn write_monte_carlo_summary(
        &mut self,
        summary: &MonteCarloSummary,
    ) -> Result<(), MacrossError> {
        self.monte_carlo.push(summary.clone());
        Ok(())
    }
}

/// `count` closes starting at `start`, moving by `step` each period.
pub fn linear_closes(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + step * i as f64).collect()
}

pub fn rising_series() -> Vec<f64> {
    linear_closes(100.0, 1.0, 25)
}

/// Up for `up` periods, then down for `down` periods.
pub fn peak_closes(up: usize, down: usize) -> Vec<f64> {
    let mut closes = linear_closes(100.0, 1.0, up);
    let top = closes[up - 1];
    closes.extend((1..=down).map(|i| top - 1.5 * i as f64));
    closes
}

pub const CSV_HEADER: &str = "Price,Close,High,Low,Open,Volume\nTicker,TEST,TEST,TEST,TEST,TEST\nDate,,,,,\n";

/// CSV content in the historical file layout, one row per close.
pub fn csv_content(closes: &[f64]) -> String {
    let mut content = CSV_HEADER.to_string();
    for (i, close) in closes.iter().enumerate() {
        content.push_str(&format!(
            "2024-01-{:02},{},{},{},{},{}\n",
            (i % 28) + 1,
            close,
            close + 1.0,
            close - 1.0,
            close,
            1000 + i
        ));
    }
    content
}
