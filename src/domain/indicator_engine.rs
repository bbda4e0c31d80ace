//! Indicator engine: owns all indicator state for one run.
//!
//! `update` must be called exactly once per bar in chronological order.
//! Calling it out of order or skipping bars yields meaningless values; the
//! driver validates ordering before bars reach the engine.

use super::indicator::{Ema, IndicatorPeriods, IndicatorSnapshot, Rsi, Sma, Stochastic};
use super::ohlcv::Bar;

#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    ema_fast: Ema,
    ema_slow: Ema,
    rsi: Rsi,
    rsi_fast: Rsi,
    rsi_slow: Rsi,
    sma: Sma,
    ewo_fast: Ema,
    ewo_slow: Ema,
    stochastic: Stochastic,
    prev_close: Option<f64>,
    prev_rsi_slow: Option<f64>,
}

impl IndicatorEngine {
    pub fn new(periods: &IndicatorPeriods) -> Self {
        IndicatorEngine {
            ema_fast: Ema::new(periods.ema_fast),
            ema_slow: Ema::new(periods.ema_slow),
            rsi: Rsi::new(periods.rsi),
            rsi_fast: Rsi::new(periods.rsi_fast),
            rsi_slow: Rsi::new(periods.rsi_slow),
            sma: Sma::new(periods.sma),
            ewo_fast: Ema::new(periods.ewo_fast),
            ewo_slow: Ema::new(periods.ewo_slow),
            stochastic: Stochastic::new(periods.stoch_period, periods.stoch_period_dfast),
            prev_close: None,
            prev_rsi_slow: None,
        }
    }

    /// Feed one bar and return the snapshot for it.
    pub fn update(&mut self, bar_index: usize, bar: &Bar) -> IndicatorSnapshot {
        let close = bar.close;

        let ema_fast = self.ema_fast.update(close);
        let ema_slow = self.ema_slow.update(close);
        let rsi = self.rsi.update(close);
        let rsi_fast = self.rsi_fast.update(close);
        let rsi_slow = self.rsi_slow.update(close);
        let sma = self.sma.update(close);

        let ewo = match (self.ewo_fast.update(close), self.ewo_slow.update(close)) {
            (Some(fast), Some(slow)) => Some((fast - slow) / bar.low * 100.0),
            _ => None,
        };

        let momentum = self.prev_close.map(|prev| (close - prev) / close);

        let stoch = self.stochastic.update(bar.high, bar.low, close);

        let rsi_slow_prev = self.prev_rsi_slow;
        self.prev_rsi_slow = rsi_slow;
        self.prev_close = Some(close);

        IndicatorSnapshot {
            bar_index,
            close,
            low: bar.low,
            ema_fast,
            ema_slow,
            rsi,
            rsi_fast,
            rsi_slow,
            rsi_slow_prev,
            sma,
            ewo,
            momentum,
            fast_k: stoch.map(|s| s.k),
            fast_d: stoch.and_then(|s| s.d),
        }
    }
}
