//! Core domain types and the backtest engine.

pub mod ohlcv;
pub mod position;
pub mod portfolio;
pub mod execution;
pub mod indicator;
pub mod indicator_engine;
pub mod signal;
pub mod backtest;
pub mod metrics;
pub mod strategy;
pub mod config_validation;
pub mod error;
