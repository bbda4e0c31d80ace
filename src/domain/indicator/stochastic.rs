//! Fast Stochastic oscillator, updated one bar at a time.
//!
//! %K = 100 * (close - lowest_low(n)) / (highest_high(n) - lowest_low(n))
//! %D = SMA(%K, d)
//!
//! A flat window (highest_high == lowest_low) yields %K = 0.
//! Warmup: %K after n bars, %D after n + d - 1 bars.

use std::collections::VecDeque;

use super::sma::Sma;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticValue {
    pub k: f64,
    pub d: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Stochastic {
    period: usize,
    highs: VecDeque<f64>,
    lows: VecDeque<f64>,
    d_line: Sma,
    current: Option<StochasticValue>,
}

impl Stochastic {
    pub fn new(period: usize, period_dfast: usize) -> Self {
        let period = period.max(1);
        Stochastic {
            period,
            highs: VecDeque::with_capacity(period),
            lows: VecDeque::with_capacity(period),
            d_line: Sma::new(period_dfast),
            current: None,
        }
    }

    pub fn update(&mut self, high: f64, low: f64, close: f64) -> Option<StochasticValue> {
        if self.highs.len() == self.period {
            self.highs.pop_front();
            self.lows.pop_front();
        }
        self.highs.push_back(high);
        self.lows.push_back(low);

        if self.highs.len() < self.period {
            return None;
        }

        let highest = self.highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lowest = self.lows.iter().copied().fold(f64::INFINITY, f64::min);
        let range = highest - lowest;

        let k = if range > 0.0 {
            100.0 * (close - lowest) / range
        } else {
            0.0
        };
        let d = self.d_line.update(k);

        self.current = Some(StochasticValue { k, d });
        self.current
    }

    pub fn value(&self) -> Option<StochasticValue> {
        self.current
    }

    pub fn is_ready(&self) -> bool {
        self.current.is_some()
    }
}
