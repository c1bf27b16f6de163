//! Trailing simple moving average.
//!
//! SMA(n)[i] = sum(C[i-j] for j in 0..n) / n
//! Warmup: the first (n-1) points hold 0.0 and are not valid averages.

/// Mean of the `period` values ending at `index`, or `0.0` before the window fills.
///
/// Values are summed from `index` backwards; every series in this crate is built
/// through this function so results stay bit-identical.
pub fn moving_average(series: &[f64], period: usize, index: usize) -> f64 {
    if period == 0 || index + 1 < period {
        return 0.0;
    }

    let mut sum = 0.0;
    for j in 0..period {
        sum += series[index - j];
    }
    sum / period as f64
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverageSeries {
    pub period: usize,
    pub values: Vec<f64>,
}

impl MovingAverageSeries {
    pub fn compute(closes: &[f64], period: usize) -> Self {
        let values = (0..closes.len())
            .map(|i| moving_average(closes, period, i))
            .collect();
        MovingAverageSeries { period, values }
    }

    /// Index of the first point with a full window.
    pub fn warmup(&self) -> usize {
        self.period.saturating_sub(1)
    }

    pub fn is_valid(&self, index: usize) -> bool {
        index >= self.warmup() && index < self.values.len()
    }

    /// The average at `index`, or `None` during warmup.
    pub fn get(&self, index: usize) -> Option<f64> {
        if self.is_valid(index) {
            Some(self.values[index])
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
