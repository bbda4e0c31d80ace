//! Exponential Moving Average, updated one value at a time.
//!
//! k = 2/(n+1), seed with the SMA of the first n inputs, then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) inputs yield `None`.

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    k: f64,
    seed_sum: f64,
    seen: usize,
    current: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Ema {
            period,
            k: 2.0 / (period as f64 + 1.0),
            seed_sum: 0.0,
            seen: 0,
            current: None,
        }
    }

    pub fn update(&mut self, value: f64) -> Option<f64> {
        match self.current {
            Some(prev) => {
                self.current = Some(value * self.k + prev * (1.0 - self.k));
            }
            None => {
                self.seed_sum += value;
                self.seen += 1;
                if self.seen == self.period {
                    self.current = Some(self.seed_sum / self.period as f64);
                }
            }
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
