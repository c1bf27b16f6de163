//! Random-walk price paths for Monte Carlo trials.
//!
//! P[0] = initial_price
//! P[i] = P[i-1] * (1 + z * 2.0 / 100), z ~ N(0, 1)

use rand::Rng;
use rand_distr::StandardNormal;

use super::price::{PriceObservation, PriceSeries};

pub const DEFAULT_INITIAL_PRICE: f64 = 100.0;

/// Standard deviation of the daily move, in percentage points.
pub const DAILY_CHANGE_STDDEV_PCT: f64 = 2.0;

/// Generate `num_days` observations. The caller owns the generator, so seeding is its choice.
pub fn generate_path<R: Rng>(rng: &mut R, num_days: usize, initial_price: f64) -> PriceSeries {
    let mut observations = Vec::with_capacity(num_days);
    let mut price = initial_price;

    for day in 0..num_days {
        if day > 0 {
            let z: f64 = rng.sample(StandardNormal);
            let change = z * DAILY_CHANGE_STDDEV_PCT;
            price *= 1.0 + change / 100.0;
        }
        observations.push(PriceObservation::from_close(format!("Day {}", day), price));
    }

    PriceSeries::new(observations)
}
