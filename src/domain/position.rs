//! Open position and completed round-trip records.

use chrono::NaiveDateTime;
use std::fmt;

/// Which entry rule set opened a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRule {
    VolatilityBreakout,
    MeanReversionPullback,
}

impl fmt::Display for EntryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryRule::VolatilityBreakout => write!(f, "volatility-breakout"),
            EntryRule::MeanReversionPullback => write!(f, "mean-reversion-pullback"),
        }
    }
}

/// A long position. Only one can be open at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub size: f64,
    pub entry_price: f64,
    pub entry_bar_index: usize,
    pub entry_timestamp: NaiveDateTime,
    /// Notional plus commission paid on entry.
    pub entry_cost: f64,
    pub entry_rule: Option<EntryRule>,
}

impl Position {
    pub fn market_value(&self, price: f64) -> f64 {
        self.size * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.size * (price - self.entry_price)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub entry_bar_index: usize,
    pub exit_bar_index: usize,
    pub entry_timestamp: NaiveDateTime,
    pub exit_timestamp: NaiveDateTime,
    pub entry_price: f64,
    pub exit_price: f64,
    pub size: f64,
    /// Notional plus commission paid on entry.
    pub entry_cost: f64,
    /// Exit proceeds after commission minus `entry_cost`.
    pub pnl: f64,
    pub entry_rule: Option<EntryRule>,
}

impl TradeRecord {
    pub fn bars_held(&self) -> usize {
        self.exit_bar_index - self.entry_bar_index
    }

    /// Net return on the cash committed at entry, in percent.
    pub fn return_pct(&self) -> f64 {
        if self.entry_cost > 0.0 {
            self.pnl / self.entry_cost * 100.0
        } else {
            0.0
        }
    }
}
