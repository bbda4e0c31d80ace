//! ewotrader: single-asset, bar-based strategy backtester.
//!
//! Hexagonal architecture: the backtest engine lives in [`domain`], port traits
//! in [`ports`], concrete I/O (CSV bars, INI config, text reports) in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
