//! Price observations and the series the engine runs over.

#[derive(Debug, Clone, PartialEq)]
pub struct PriceObservation {
    pub label: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceObservation {
    /// Observation where every price field equals `close`.
    pub fn from_close(label: impl Into<String>, close: f64) -> Self {
        PriceObservation {
            label: label.into(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        }
    }
}

/// Chronologically ordered observations for one instrument.
///
/// Built once and read-only afterwards; all derived series are recomputed from it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSeries {
    observations: Vec<PriceObservation>,
}

impl PriceSeries {
    pub fn new(observations: Vec<PriceObservation>) -> Self {
        PriceSeries { observations }
    }

    /// Series labelled `Day 0`, `Day 1`, ... from bare closes.
    pub fn from_closes(closes: &[f64]) -> Self {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceObservation::from_close(format!("Day {}", i), close))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PriceObservation> {
        self.observations.get(index)
    }

    pub fn observations(&self) -> &[PriceObservation] {
        &self.observations
    }

    pub fn first(&self) -> Option<&PriceObservation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&PriceObservation> {
        self.observations.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.close).collect()
    }
}

impl FromIterator<PriceObservation> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = PriceObservation>>(iter: I) -> Self {
        PriceSeries::new(iter.into_iter().collect())
    }
}
