//! OHLCV bar representation and per-bar consistency checks.

use chrono::NaiveDateTime;

use super::error::TraderError;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Check OHLC consistency and ordering against the previous bar.
    ///
    /// Prices must be finite and positive, `high`/`low` must bound `open` and
    /// `close`, and timestamps must be strictly increasing.
    pub fn validate(&self, index: usize, prev: Option<&Bar>) -> Result<(), TraderError> {
        let malformed = |reason: String| TraderError::MalformedBar {
            index,
            timestamp: self.timestamp,
            reason,
        };

        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (name, value) in prices {
            if !value.is_finite() || value <= 0.0 {
                return Err(malformed(format!("{name} must be a positive number, got {value}")));
            }
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(malformed(format!("volume must be non-negative, got {}", self.volume)));
        }
        if self.high < self.low {
            return Err(malformed(format!("high {} below low {}", self.high, self.low)));
        }
        if self.high < self.open.max(self.close) {
            return Err(malformed(format!(
                "high {} below open/close {}",
                self.high,
                self.open.max(self.close)
            )));
        }
        if self.low > self.open.min(self.close) {
            return Err(malformed(format!(
                "low {} above open/close {}",
                self.low,
                self.open.min(self.close)
            )));
        }
        if let Some(prev) = prev {
            if self.timestamp <= prev.timestamp {
                return Err(malformed(format!(
                    "timestamp not after previous bar ({})",
                    prev.timestamp
                )));
            }
        }
        Ok(())
    }
}
