//! RSI (Relative Strength Index), updated one close at a time.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: n changes are needed, so the first n closes yield `None`.

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    prev_close: Option<f64>,
    avg_gain: f64,
    avg_loss: f64,
    changes: usize,
    current: Option<f64>,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Rsi {
            period: period.max(1),
            prev_close: None,
            avg_gain: 0.0,
            avg_loss: 0.0,
            changes: 0,
            current: None,
        }
    }

    pub fn update(&mut self, close: f64) -> Option<f64> {
        let Some(prev) = self.prev_close.replace(close) else {
            return None;
        };

        let change = close - prev;
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };
        let n = self.period as f64;

        self.changes += 1;
        if self.changes < self.period {
            self.avg_gain += gain;
            self.avg_loss += loss;
            return None;
        }

        if self.changes == self.period {
            self.avg_gain = (self.avg_gain + gain) / n;
            self.avg_loss = (self.avg_loss + loss) / n;
        } else {
            self.avg_gain = (self.avg_gain * (n - 1.0) + gain) / n;
            self.avg_loss = (self.avg_loss * (n - 1.0) + loss) / n;
        }

        self.current = Some(rsi_from_averages(self.avg_gain, self.avg_loss));
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

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feed(rsi: &mut Rsi, closes: &[f64]) -> Vec<Option<f64>> {
        closes.iter().map(|&c| rsi.update(c)).collect()
    }

    #[test]
    fn rsi_single_close() {
        let mut rsi = Rsi::new(14);
        assert!(rsi.update(100.0).is_none());
        assert!(!rsi.is_ready());
    }

    #[test]
    fn rsi_warmup_period() {
        let closes: Vec<f64> = (1..=15).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let mut rsi = Rsi::new(14);
        let out = feed(&mut rsi, &closes);

        for (i, v) in out.iter().enumerate().take(14) {
            assert!(v.is_none(), "close {} should be warming up", i);
        }
        assert!(out[14].is_some(), "close 14 should be valid");
    }

    #[test]
    fn rsi_all_gains_no_losses() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let mut rsi = Rsi::new(14);
        let out = feed(&mut rsi, &closes);
        let v = out[14].unwrap();
        assert!((v - 100.0).abs() < f64::EPSILON, "RSI should be 100 when all gains");
    }

    #[test]
    fn rsi_all_losses_no_gains() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let mut rsi = Rsi::new(14);
        let out = feed(&mut rsi, &closes);
        let v = out[14].unwrap();
        assert!(v.abs() < f64::EPSILON, "RSI should be 0 when all losses");
    }

    #[test]
    fn rsi_flat_prices_is_100() {
        let mut rsi = Rsi::new(4);
        let out = feed(&mut rsi, &[50.0; 10]);
        assert_eq!(out[9], Some(100.0));
    }

    #[test]
    fn rsi_wilder_smoothing_step() {
        // Period 2: changes +2, -1 seed the averages, then +3 is smoothed in.
        let mut rsi = Rsi::new(2);
        feed(&mut rsi, &[10.0, 12.0, 11.0]);
        let seeded = rsi.value().unwrap();
        // avg_gain = 1.0, avg_loss = 0.5 → RS = 2 → RSI = 66.67
        assert!((seeded - (100.0 - 100.0 / 3.0)).abs() < 1e-12);

        let next = rsi.update(14.0).unwrap();
        // avg_gain = (1.0 + 3.0) / 2 = 2.0, avg_loss = 0.5 / 2 = 0.25 → RS = 8
        assert!((next - (100.0 - 100.0 / 9.0)).abs() < 1e-12);
    }

    #[test]
    fn rsi_known_calculation() {
        let closes = [
            44.0, 44.25, 44.50, 43.75, 44.50, 44.25, 44.75, 45.25, 45.50, 45.25, 45.50, 46.0,
            46.25, 46.0, 46.50,
        ];
        let mut rsi = Rsi::new(14);
        let out = feed(&mut rsi, &closes);
        let v = out[14].unwrap();
        assert!(v > 50.0 && v < 100.0, "RSI should be in bullish territory");
    }

    proptest! {
        #[test]
        fn rsi_always_bounded(closes in prop::collection::vec(1.0f64..1000.0, 2..200), period in 1usize..30) {
            let mut rsi = Rsi::new(period);
            for c in closes {
                if let Some(v) = rsi.update(c) {
                    prop_assert!((0.0..=100.0).contains(&v), "RSI {} out of range", v);
                }
            }
        }
    }
}
