//! Performance metrics for a single run.

use super::error::MacrossError;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub initial_balance: f64,
    pub final_balance: f64,
    pub total_return_pct: f64,
    pub trade_count: usize,
    pub avg_daily_return_pct: f64,
    pub annualized_volatility_pct: f64,
    /// Not special-cased: zero volatility yields NaN or an infinity.
    pub sharpe_ratio: f64,
    pub max_drawdown_pct: f64,
    pub buy_and_hold_final_balance: f64,
    pub buy_and_hold_return_pct: f64,
}

impl RunSummary {
    pub fn compute(
        trajectory: &[f64],
        initial_balance: f64,
        trade_count: usize,
        buy_and_hold_final_balance: f64,
    ) -> Result<Self, MacrossError> {
        let returns = period_returns(trajectory);
        if returns.is_empty() {
            return Err(MacrossError::InsufficientData {
                what: "period returns".into(),
                have: trajectory.len(),
                need: 2,
            });
        }

        let final_balance = trajectory[trajectory.len() - 1];
        let total_return_pct = (final_balance - initial_balance) / initial_balance * 100.0;

        let (avg_return, volatility) = compute_volatility(&returns);
        let sharpe_ratio = (avg_return * TRADING_DAYS_PER_YEAR) / volatility;

        let buy_and_hold_return_pct =
            (buy_and_hold_final_balance - initial_balance) / initial_balance * 100.0;

        Ok(RunSummary {
            initial_balance,
            final_balance,
            total_return_pct,
            trade_count,
            avg_daily_return_pct: avg_return * 100.0,
            annualized_volatility_pct: volatility * 100.0,
            sharpe_ratio,
            max_drawdown_pct: compute_drawdown(trajectory) * 100.0,
            buy_and_hold_final_balance,
            buy_and_hold_return_pct,
        })
    }

    /// Strategy return minus buy-and-hold return, in percentage points.
    pub fn excess_return_pct(&self) -> f64 {
        self.total_return_pct - self.buy_and_hold_return_pct
    }
}

/// `r[k] = v[k] / v[k-1] - 1` for every consecutive pair.
pub fn period_returns(trajectory: &[f64]) -> Vec<f64> {
    trajectory.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Mean return and annualized population standard deviation.
fn compute_volatility(returns: &[f64]) -> (f64, f64) {
    let n = returns.len() as f64;
    let mean: f64 = returns.iter().sum::<f64>() / n;
    let variance: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Largest peak-to-trough decline as a fraction of the peak.
fn compute_drawdown(trajectory: &[f64]) -> f64 {
    let Some(&first) = trajectory.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &value in trajectory {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            let dd = (peak - value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn total_return_positive() {
        let summary = RunSummary::compute(&[10_000.0, 11_000.0], 10_000.0, 1, 10_000.0).unwrap();
        assert_relative_eq!(summary.total_return_pct, 10.0, epsilon = 1e-9);
        assert_eq!(summary.final_balance, 11_000.0);
        assert_eq!(summary.trade_count, 1);
    }

    #[test]
    fn total_return_negative() {
        let summary = RunSummary::compute(&[10_000.0, 9_000.0], 10_000.0, 2, 10_000.0).unwrap();
        assert_relative_eq!(summary.total_return_pct, -10.0, epsilon = 1e-9);
    }

    #[test]
    fn period_returns_skip_first_point() {
        let returns = period_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns[1], -0.10, epsilon = 1e-12);
    }

    #[test]
    fn volatility_is_population_stddev_annualized() {
        // returns: +10%, -10% -> mean 0, population stddev 0.1
        let summary = RunSummary::compute(&[100.0, 110.0, 99.0], 100.0, 0, 100.0).unwrap();
        assert_relative_eq!(summary.avg_daily_return_pct, 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            summary.annualized_volatility_pct,
            0.1 * 252.0_f64.sqrt() * 100.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(summary.sharpe_ratio, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn sharpe_ratio_known_value() {
        // returns: +2%, 0% -> mean 1%, stddev 1%
        let summary = RunSummary::compute(&[100.0, 102.0, 102.0], 100.0, 0, 100.0).unwrap();
        let vol = 0.01 * 252.0_f64.sqrt();
        assert_relative_eq!(summary.sharpe_ratio, 0.01 * 252.0 / vol, epsilon = 1e-9);
        assert_relative_eq!(summary.avg_daily_return_pct, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_volatility_with_flat_balance_is_nan() {
        let summary =
            RunSummary::compute(&[10_000.0, 10_000.0, 10_000.0], 10_000.0, 0, 10_000.0).unwrap();
        assert_eq!(summary.annualized_volatility_pct, 0.0);
        assert!(summary.sharpe_ratio.is_nan());
    }

    #[test]
    fn zero_volatility_with_constant_growth_is_infinite() {
        let summary = RunSummary::compute(&[100.0, 200.0, 400.0], 100.0, 0, 100.0).unwrap();
        assert_eq!(summary.annualized_volatility_pct, 0.0);
        assert!(summary.sharpe_ratio.is_infinite());
        assert!(summary.sharpe_ratio > 0.0);
    }

    #[test]
    fn single_point_trajectory_is_insufficient() {
        let err = RunSummary::compute(&[10_000.0], 10_000.0, 0, 10_000.0).unwrap_err();
        assert!(matches!(
            err,
            MacrossError::InsufficientData { have: 1, need: 2, .. }
        ));
    }

    #[test]
    fn empty_trajectory_is_insufficient() {
        assert!(RunSummary::compute(&[], 10_000.0, 0, 10_000.0).is_err());
    }

    #[test]
    fn buy_and_hold_return_from_baseline() {
        let summary = RunSummary::compute(&[10_000.0, 10_500.0], 10_000.0, 1, 12_000.0).unwrap();
        assert_relative_eq!(summary.buy_and_hold_return_pct, 20.0, epsilon = 1e-9);
        assert_relative_eq!(summary.excess_return_pct(), 5.0 - 20.0, epsilon = 1e-9);
    }

    #[test]
    fn max_drawdown() {
        let dd = compute_drawdown(&[100.0, 110.0, 90.0, 95.0, 80.0, 100.0]);
        assert_relative_eq!(dd, (110.0 - 80.0) / 110.0, epsilon = 1e-12);
    }

    #[test]
    fn max_drawdown_monotonic_rise_is_zero() {
        assert_eq!(compute_drawdown(&[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(compute_drawdown(&[]), 0.0);
    }
}
