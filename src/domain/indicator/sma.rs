//! Simple Moving Average, updated one value at a time.
//!
//! SMA[i] = mean of the last n inputs. Warmup: first (n-1) inputs yield `None`.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    window: VecDeque<f64>,
    current: Option<f64>,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Sma {
            period,
            window: VecDeque::with_capacity(period),
            current: None,
        }
    }

    pub fn update(&mut self, value: f64) -> Option<f64> {
        if self.window.len() == self.period {
            self.window.pop_front();
        }
        self.window.push_back(value);

        // Summed front to back on every update so the result does not drift.
        if self.window.len() == self.period {
            let sum: f64 = self.window.iter().sum();
            self.current = Some(sum / self.period as f64);
        }
        self.current
    }

    pub fn value(&self) -> Option<f64> {
        self.current
    }

    pub fn is_ready(&self) -> bool {
        self.current.is_some()
    }

    pub fn period(&self) -> usize {
        self.period
    }
}
