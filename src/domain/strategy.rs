//! Strategy parameters: every threshold the entry and exit rules compare against.

use super::indicator::IndicatorPeriods;

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParams {
    /// Rule A: fast RSI must be below this.
    pub fast_rsi_entry_max: f64,
    /// Rule A: RSI must be below this.
    pub rsi_entry_max: f64,
    /// Rule A: EWO must be above this.
    pub ewo_min: f64,
    /// Rule A: close must be below EMA-fast times this.
    pub ema_low_band: f64,
    /// Rule A: close must be below EMA-slow times this.
    pub ema_high_band: f64,
    /// Rule B: fast RSI must be below this.
    pub fast_rsi_32_max: f64,
    /// Rule B: RSI must be above this.
    pub rsi_32_min: f64,
    /// Rule B: close must be below SMA times this.
    pub sma15_band: f64,
    /// Rule B: momentum ratio must be below this.
    pub momentum_32_max: f64,
    /// Exit when %K rises above this.
    pub exit_fast_k_max: f64,
    /// Fraction of cash committed on entry.
    pub order_size_pct: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams {
            fast_rsi_entry_max: 50.0,
            rsi_entry_max: 30.0,
            ewo_min: -1.238,
            ema_low_band: 0.956,
            ema_high_band: 0.986,
            fast_rsi_32_max: 63.0,
            rsi_32_min: 16.0,
            sma15_band: 0.932,
            momentum_32_max: -0.8,
            exit_fast_k_max: 75.0,
            order_size_pct: 0.95,
        }
    }
}

/// Everything that defines the strategy for one run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Strategy {
    pub params: StrategyParams,
    pub periods: IndicatorPeriods,
}
