//! Configuration validation.
//!
//! Runs before any computation: INI values are checked key by key, and the
//! assembled configs are checked against the data they will run over.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::MacrossError;
use crate::domain::monte_carlo::MonteCarloConfig;
use crate::ports::config_port::ConfigPort;

/// Check every recognised key that is present in a config file.
pub fn validate_config_file(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    validate_positive_int(config, "strategy", "short_period")?;
    validate_positive_int(config, "strategy", "long_period")?;
    validate_positive_float(config, "backtest", "initial_balance")?;
    validate_positive_int(config, "monte_carlo", "simulations")?;
    validate_positive_int(config, "monte_carlo", "path_length")?;
    validate_positive_float(config, "monte_carlo", "initial_price")?;
    validate_seed(config)?;
    Ok(())
}

pub fn validate_backtest_config(config: &BacktestConfig) -> Result<(), MacrossError> {
    validate_periods(config.short_period, config.long_period)?;
    validate_initial_balance("backtest", config.initial_balance)?;
    Ok(())
}

pub fn validate_monte_carlo_config(config: &MonteCarloConfig) -> Result<(), MacrossError> {
    if config.num_simulations == 0 {
        return Err(MacrossError::config_invalid(
            "monte_carlo",
            "simulations",
            "simulations must be at least 1",
        ));
    }
    validate_path_config(config)
}

/// Everything one synthetic path needs; the simulation count is not consulted.
pub fn validate_path_config(config: &MonteCarloConfig) -> Result<(), MacrossError> {
    if config.initial_price.is_nan() || config.initial_price <= 0.0 {
        return Err(MacrossError::config_invalid(
            "monte_carlo",
            "initial_price",
            "initial_price must be positive",
        ));
    }
    validate_initial_balance("monte_carlo", config.initial_balance)?;
    validate_windows(config.short_period, config.long_period, config.path_length).map_err(
        |e| match e {
            MacrossError::ConfigInvalid { key, reason, .. } if key == "window" => {
                MacrossError::config_invalid("monte_carlo", "path_length", reason)
            }
            other => other,
        },
    )
}

/// Both periods positive and the longer one leaving at least one evaluated period.
pub fn validate_windows(
    short_period: usize,
    long_period: usize,
    available: usize,
) -> Result<(), MacrossError> {
    validate_periods(short_period, long_period)?;
    let window = short_period.max(long_period);
    if window >= available {
        return Err(MacrossError::config_invalid(
            "strategy",
            "window",
            format!(
                "window of {} periods needs more than {} observations",
                window, available
            ),
        ));
    }
    Ok(())
}

fn validate_periods(short_period: usize, long_period: usize) -> Result<(), MacrossError> {
    if short_period == 0 {
        return Err(MacrossError::config_invalid(
            "strategy",
            "short_period",
            "short_period must be at least 1",
        ));
    }
    if long_period == 0 {
        return Err(MacrossError::config_invalid(
            "strategy",
            "long_period",
            "long_period must be at least 1",
        ));
    }
    Ok(())
}

fn validate_initial_balance(section: &str, value: f64) -> Result<(), MacrossError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(MacrossError::config_invalid(
            section,
            "initial_balance",
            "initial_balance must be positive",
        ));
    }
    Ok(())
}

fn validate_positive_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), MacrossError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if v >= 1 => Ok(()),
        Ok(_) => Err(MacrossError::config_invalid(
            section,
            key,
            format!("{} must be at least 1", key),
        )),
        Err(_) => Err(MacrossError::config_invalid(
            section,
            key,
            format!("'{}' is not an integer", raw),
        )),
    }
}

fn validate_positive_float(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), MacrossError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v > 0.0 && v.is_finite() => Ok(()),
        Ok(_) => Err(MacrossError::config_invalid(
            section,
            key,
            format!("{} must be positive", key),
        )),
        Err(_) => Err(MacrossError::config_invalid(
            section,
            key,
            format!("'{}' is not a number", raw),
        )),
    }
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    let Some(raw) = config.get_string("monte_carlo", "seed") else {
        return Ok(());
    };
    raw.trim().parse::<u64>().map(|_| ()).map_err(|_| {
        MacrossError::config_invalid(
            "monte_carlo",
            "seed",
            format!("'{}' is not a non-negative integer", raw),
        )
    })
}
