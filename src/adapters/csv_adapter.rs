//! CSV price file adapter.
//!
//! Layout: three header lines, then one observation per line:
//! `label, close, high, low, open, volume[, ...]`.
//! Lines with fewer than six fields are skipped, unparsable numbers become 0,
//! and observations whose close is not positive are dropped.

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::domain::error::MacrossError;
use crate::domain::price::{PriceObservation, PriceSeries};
use crate::ports::data_port::DataPort;

pub const HEADER_LINES: usize = 3;
pub const MIN_FIELDS: usize = 6;

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Parse file content that has already been read.
    pub fn parse(content: &str) -> Vec<PriceObservation> {
        Self::parse_bytes(content.as_bytes())
    }

    /// Parse raw file bytes. Quotes carry no meaning and each line stands on
    /// its own, so a malformed line only costs that line.
    pub fn parse_bytes(content: &[u8]) -> Vec<PriceObservation> {
        let body = skip_lines(content, HEADER_LINES);

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::All)
            .from_reader(body);

        let mut observations = Vec::new();

        for result in rdr.byte_records() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "unreadable record, skipping");
                    continue;
                }
            };
            let line = record
                .position()
                .map(|p| p.line() as usize + HEADER_LINES)
                .unwrap_or(0);

            if record.len() < MIN_FIELDS {
                warn!(line, fields = record.len(), "line has insufficient columns, skipping");
                continue;
            }

            let field = |i: usize| record.get(i).unwrap_or_default();
            let observation = PriceObservation {
                label: String::from_utf8_lossy(field(0)).into_owned(),
                close: parse_price(field(1), line, "close"),
                high: parse_price(field(2), line, "high"),
                low: parse_price(field(3), line, "low"),
                open: parse_price(field(4), line, "open"),
                volume: parse_volume(field(5), line),
            };

            if observation.close > 0.0 {
                observations.push(observation);
            }
        }

        observations
    }
}

/// Everything after the first `n` lines.
fn skip_lines(content: &[u8], n: usize) -> &[u8] {
    let mut rest = content;
    for _ in 0..n {
        match rest.iter().position(|&b| b == b'\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return &[],
        }
    }
    rest
}

impl DataPort for CsvAdapter {
    fn fetch_prices(&self) -> Result<PriceSeries, MacrossError> {
        let content = fs::read(&self.path).map_err(|e| MacrossError::DataLoad {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        let observations = Self::parse_bytes(&content);
        if observations.is_empty() {
            return Err(MacrossError::NoData {
                source_name: self.source_name(),
            });
        }

        info!(
            count = observations.len(),
            source = %self.path.display(),
            "loaded price observations"
        );
        Ok(PriceSeries::new(observations))
    }

    fn source_name(&self) -> String {
        self.path.display().to_string()
    }
}

fn parse_price(raw: &[u8], line: usize, column: &str) -> f64 {
    let raw = String::from_utf8_lossy(raw);
    if raw.is_empty() {
        return 0.0;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            warn!(line, column, value = %raw, "unparsable number, using 0");
            0.0
        }
    }
}

fn parse_volume(raw: &[u8], line: usize) -> u64 {
    let raw = String::from_utf8_lossy(raw);
    if raw.is_empty() {
        return 0;
    }
    if let Ok(v) = raw.parse::<u64>() {
        return v;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v as u64,
        _ => {
            warn!(line, column = "volume", value = %raw, "unparsable volume, using 0");
            0
        }
    }
}
