//! Core domain types and logic.

pub mod price;
pub mod moving_average;
pub mod signal;
pub mod portfolio;
pub mod metrics;
pub mod synthetic;
pub mod backtest;
pub mod monte_carlo;
pub mod config_validation;
pub mod error;
