//! Cash account, open position and the run's append-only logs.

use chrono::NaiveDateTime;

use super::position::{Position, TradeRecord};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Account {
    pub cash: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub equity: f64,
}

/// An entry that could not be filled. The bar is treated as a Hold.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedEntry {
    pub bar_index: usize,
    pub timestamp: NaiveDateTime,
    pub required: f64,
    pub available: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub account: Account,
    pub initial_cash: f64,
    pub position: Option<Position>,
    pub trades: Vec<TradeRecord>,
    pub equity_curve: Vec<EquityPoint>,
    pub rejected_entries: Vec<RejectedEntry>,
}

impl Portfolio {
    pub fn new(initial_cash: f64) -> Self {
        Portfolio {
            account: Account { cash: initial_cash },
            initial_cash,
            position: None,
            trades: Vec::new(),
            equity_curve: Vec::new(),
            rejected_entries: Vec::new(),
        }
    }

    pub fn cash(&self) -> f64 {
        self.account.cash
    }

    pub fn is_open(&self) -> bool {
        self.position.is_some()
    }

    pub fn record_trade(&mut self, trade: TradeRecord) {
        self.trades.push(trade);
    }

    pub fn record_rejection(&mut self, rejection: RejectedEntry) {
        self.rejected_entries.push(rejection);
    }

    pub fn record_equity(&mut self, timestamp: NaiveDateTime, equity: f64) {
        self.equity_curve.push(EquityPoint { timestamp, equity });
    }

    /// Cash plus the open position marked at `price`.
    pub fn total_equity(&self, price: f64) -> f64 {
        let position_value = self
            .position
            .as_ref()
            .map_or(0.0, |pos| pos.market_value(price));
        self.account.cash + position_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn sample_position() -> Position {
        Position {
            size: 10.0,
            entry_price: 100.0,
            entry_bar_index: 0,
            entry_timestamp: ts(1),
            entry_cost: 1001.0,
            entry_rule: None,
        }
    }

    #[test]
    fn new_portfolio() {
        let portfolio = Portfolio::new(10_000.0);
        assert!((portfolio.cash() - 10_000.0).abs() < f64::EPSILON);
        assert!((portfolio.initial_cash - 10_000.0).abs() < f64::EPSILON);
        assert!(!portfolio.is_open());
        assert!(portfolio.trades.is_empty());
        assert!(portfolio.equity_curve.is_empty());
        assert!(portfolio.rejected_entries.is_empty());
    }

    #[test]
    fn record_equity() {
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.record_equity(ts(15), 10_500.0);
        assert_eq!(portfolio.equity_curve.len(), 1);
        assert_eq!(portfolio.equity_curve[0].timestamp, ts(15));
        assert!((portfolio.equity_curve[0].equity - 10_500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_equity_flat_is_cash() {
        let portfolio = Portfolio::new(10_000.0);
        assert!((portfolio.total_equity(123.0) - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_equity_marks_position_to_market() {
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.account.cash = 8_999.0;
        portfolio.position = Some(sample_position());
        assert!((portfolio.total_equity(110.0) - 10_099.0).abs() < 1e-9);
    }

    #[test]
    fn record_rejection() {
        let mut portfolio = Portfolio::new(10.0);
        portfolio.record_rejection(RejectedEntry {
            bar_index: 4,
            timestamp: ts(5),
            required: 12.0,
            available: 10.0,
        });
        assert_eq!(portfolio.rejected_entries.len(), 1);
        assert_eq!(portfolio.rejected_entries[0].bar_index, 4);
    }
}
