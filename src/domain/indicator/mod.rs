//! Incremental technical indicators.
//!
//! This module provides:
//! - `Sma`, `Ema`, `Rsi`, `Stochastic`: stateful indicators fed one bar at a time
//! - `IndicatorPeriods`: lookback lengths for every indicator the strategy reads
//! - `IndicatorSnapshot`: read-only view of all values after one bar

pub mod ema;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use ema::Ema;
pub use rsi::Rsi;
pub use sma::Sma;
pub use stochastic::{Stochastic, StochasticValue};

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPeriods {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi: usize,
    pub rsi_fast: usize,
    pub rsi_slow: usize,
    pub sma: usize,
    pub ewo_fast: usize,
    pub ewo_slow: usize,
    pub stoch_period: usize,
    pub stoch_period_dfast: usize,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        IndicatorPeriods {
            ema_fast: 8,
            ema_slow: 16,
            rsi: 14,
            rsi_fast: 4,
            rsi_slow: 20,
            sma: 15,
            ewo_fast: 50,
            ewo_slow: 200,
            stoch_period: 5,
            stoch_period_dfast: 3,
        }
    }
}

impl IndicatorPeriods {
    /// Number of bars before every entry-rule input has a value.
    pub fn warmup_bars(&self) -> usize {
        [
            self.ema_fast,
            self.ema_slow,
            self.rsi + 1,
            self.rsi_fast + 1,
            // slow RSI is compared against its previous value
            self.rsi_slow + 2,
            self.sma,
            self.ewo_fast,
            self.ewo_slow,
            self.stoch_period,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

/// Indicator values after the bar at `bar_index`.
///
/// `None` means the indicator is still warming up.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub bar_index: usize,
    pub close: f64,
    pub low: f64,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub rsi: Option<f64>,
    pub rsi_fast: Option<f64>,
    pub rsi_slow: Option<f64>,
    pub rsi_slow_prev: Option<f64>,
    pub sma: Option<f64>,
    pub ewo: Option<f64>,
    pub momentum: Option<f64>,
    pub fast_k: Option<f64>,
    pub fast_d: Option<f64>,
}

impl IndicatorSnapshot {
    /// True once every value the entry rules read is available.
    pub fn is_ready(&self) -> bool {
        [
            self.ema_fast,
            self.ema_slow,
            self.rsi,
            self.rsi_fast,
            self.rsi_slow,
            self.rsi_slow_prev,
            self.sma,
            self.ewo,
            self.momentum,
        ]
        .iter()
        .all(Option::is_some)
    }
}
