//! Order execution and fill simulation.
//!
//! Every decision fills immediately and completely at the current bar's
//! close. There is no slippage, no partial fill and no order queue; this is a
//! deliberate simplification, not a realistic market model.

use tracing::{debug, warn};

use super::ohlcv::Bar;
use super::portfolio::{Portfolio, RejectedEntry};
use super::position::{EntryRule, Position, TradeRecord};
use super::signal::Decision;

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    /// Fraction of notional charged on each fill (0.001 = 0.1%).
    pub commission_rate: f64,
    /// Fraction of available cash committed on entry.
    pub order_size_pct: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            commission_rate: 0.001,
            order_size_pct: 0.95,
        }
    }
}

pub fn calculate_commission(notional: f64, config: &ExecutionConfig) -> f64 {
    notional * config.commission_rate
}

/// Result of an entry attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryResult {
    Entered {
        size: f64,
        price: f64,
        notional: f64,
        commission: f64,
    },
    InsufficientCash {
        required: f64,
        available: f64,
    },
    AlreadyOpen,
}

/// Open a long position sized as a fraction of current cash.
///
/// 1. notional = cash * order_size_pct
/// 2. size = notional / close
/// 3. commission = notional * commission_rate
/// 4. Reject if notional + commission exceeds cash or size is not positive
/// 5. Deduct notional + commission and open the position at close
pub fn enter_long(
    portfolio: &mut Portfolio,
    bar: &Bar,
    bar_index: usize,
    entry_rule: Option<EntryRule>,
    config: &ExecutionConfig,
) -> EntryResult {
    if portfolio.is_open() {
        return EntryResult::AlreadyOpen;
    }

    let available = portfolio.cash();
    let price = bar.close;
    let notional = available * config.order_size_pct;
    let size = notional / price;
    let commission = calculate_commission(notional, config);
    let required = notional + commission;

    if !(size > 0.0) || required > available {
        return EntryResult::InsufficientCash {
            required,
            available,
        };
    }

    portfolio.account.cash -= required;
    portfolio.position = Some(Position {
        size,
        entry_price: price,
        entry_bar_index: bar_index,
        entry_timestamp: bar.timestamp,
        entry_cost: required,
        entry_rule,
    });

    EntryResult::Entered {
        size,
        price,
        notional,
        commission,
    }
}

/// Close the open position at the bar's close and append the trade record.
///
/// Returns `None` when there is nothing to close.
pub fn exit_position(
    portfolio: &mut Portfolio,
    bar: &Bar,
    bar_index: usize,
    config: &ExecutionConfig,
) -> Option<TradeRecord> {
    let position = portfolio.position.take()?;

    let proceeds = position.size * bar.close;
    let commission = calculate_commission(proceeds, config);
    let net = proceeds - commission;

    portfolio.account.cash += net;

    let trade = TradeRecord {
        entry_bar_index: position.entry_bar_index,
        exit_bar_index: bar_index,
        entry_timestamp: position.entry_timestamp,
        exit_timestamp: bar.timestamp,
        entry_price: position.entry_price,
        exit_price: bar.close,
        size: position.size,
        entry_cost: position.entry_cost,
        pnl: net - position.entry_cost,
        entry_rule: position.entry_rule,
    };
    portfolio.record_trade(trade.clone());
    Some(trade)
}

/// What happened to a decision on one bar.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Entered(EntryResult),
    Exited(TradeRecord),
    /// Entry downgraded to Hold; recorded as a rejected entry.
    Rejected(RejectedEntry),
    /// Hold, Enter while open, or Exit while flat.
    Ignored,
}

pub fn execute(
    decision: Decision,
    portfolio: &mut Portfolio,
    bar: &Bar,
    bar_index: usize,
    config: &ExecutionConfig,
) -> ExecutionOutcome {
    match decision {
        Decision::Hold => ExecutionOutcome::Ignored,
        Decision::Enter(rule) => match enter_long(portfolio, bar, bar_index, Some(rule), config) {
            entered @ EntryResult::Entered { .. } => {
                debug!(bar_index, rule = %rule, ?entered, "entered long");
                ExecutionOutcome::Entered(entered)
            }
            EntryResult::InsufficientCash {
                required,
                available,
            } => {
                warn!(bar_index, required, available, "entry rejected: insufficient cash");
                let rejection = RejectedEntry {
                    bar_index,
                    timestamp: bar.timestamp,
                    required,
                    available,
                };
                portfolio.record_rejection(rejection.clone());
                ExecutionOutcome::Rejected(rejection)
            }
            EntryResult::AlreadyOpen => ExecutionOutcome::Ignored,
        },
        Decision::Exit => match exit_position(portfolio, bar, bar_index, config) {
            Some(trade) => {
                debug!(bar_index, pnl = trade.pnl, "closed position");
                ExecutionOutcome::Exited(trade)
            }
            None => ExecutionOutcome::Ignored,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn bar_at(day: u32, close: f64) -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        }
    }

    fn config(commission_rate: f64, order_size_pct: f64) -> ExecutionConfig {
        ExecutionConfig {
            commission_rate,
            order_size_pct,
        }
    }

    #[test]
    fn commission_is_fraction_of_notional() {
        assert_relative_eq!(calculate_commission(10_000.0, &config(0.001, 1.0)), 10.0);
        assert_eq!(calculate_commission(10_000.0, &config(0.0, 1.0)), 0.0);
    }

    #[test]
    fn enter_long_sizes_from_cash() {
        let mut portfolio = Portfolio::new(10_000.0);
        let cfg = config(0.001, 0.95);
        let result = enter_long(&mut portfolio, &bar_at(1, 200.0), 7, None, &cfg);

        match result {
            EntryResult::Entered {
                size,
                price,
                notional,
                commission,
            } => {
                assert_relative_eq!(notional, 9_500.0, epsilon = 1e-9);
                assert_relative_eq!(size, 47.5, epsilon = 1e-9);
                assert_relative_eq!(price, 200.0);
                assert_relative_eq!(commission, 9.5, epsilon = 1e-9);
            }
            other => panic!("expected entry, got {other:?}"),
        }
        assert_relative_eq!(portfolio.cash(), 10_000.0 - 9_500.0 - 9.5, epsilon = 1e-9);
        let pos = portfolio.position.as_ref().unwrap();
        assert_eq!(pos.entry_bar_index, 7);
        assert_relative_eq!(pos.entry_cost, 9_509.5, epsilon = 1e-9);
    }

    #[test]
    fn enter_long_full_cash_with_commission_is_rejected() {
        let mut portfolio = Portfolio::new(1_000.0);
        let result = enter_long(&mut portfolio, &bar_at(1, 10.0), 0, None, &config(0.01, 1.0));
        match result {
            EntryResult::InsufficientCash {
                required,
                available,
            } => {
                assert_relative_eq!(required, 1_010.0);
                assert_relative_eq!(available, 1_000.0);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(!portfolio.is_open());
        assert_relative_eq!(portfolio.cash(), 1_000.0);
    }

    #[test]
    fn enter_long_with_no_cash_is_rejected() {
        let mut portfolio = Portfolio::new(0.0);
        let result = enter_long(&mut portfolio, &bar_at(1, 10.0), 0, None, &config(0.0, 0.5));
        assert!(matches!(result, EntryResult::InsufficientCash { .. }));
    }

    #[test]
    fn enter_while_open_is_noop() {
        let mut portfolio = Portfolio::new(10_000.0);
        let cfg = config(0.001, 0.5);
        enter_long(&mut portfolio, &bar_at(1, 100.0), 0, None, &cfg);
        let cash = portfolio.cash();
        let outcome = execute(
            Decision::Enter(EntryRule::VolatilityBreakout),
            &mut portfolio,
            &bar_at(2, 90.0),
            1,
            &cfg,
        );
        assert_eq!(outcome, ExecutionOutcome::Ignored);
        assert_eq!(portfolio.cash(), cash);
        assert_eq!(portfolio.position.as_ref().unwrap().entry_bar_index, 0);
    }

    #[test]
    fn exit_while_flat_is_noop() {
        let mut portfolio = Portfolio::new(10_000.0);
        let outcome = execute(
            Decision::Exit,
            &mut portfolio,
            &bar_at(1, 100.0),
            0,
            &ExecutionConfig::default(),
        );
        assert_eq!(outcome, ExecutionOutcome::Ignored);
        assert!(portfolio.trades.is_empty());
        assert_eq!(portfolio.cash(), 10_000.0);
    }

    #[test]
    fn round_trip_pnl_includes_both_commissions() {
        let mut portfolio = Portfolio::new(10_000.0);
        let cfg = config(0.001, 0.5);
        enter_long(&mut portfolio, &bar_at(1, 100.0), 3, None, &cfg);
        let trade = exit_position(&mut portfolio, &bar_at(5, 110.0), 9, &cfg).unwrap();

        let notional = 5_000.0;
        let entry_cost = notional * 1.001;
        let size = notional / 100.0;
        let net = size * 110.0 * (1.0 - 0.001);

        assert_eq!(trade.entry_bar_index, 3);
        assert_eq!(trade.exit_bar_index, 9);
        assert_relative_eq!(trade.size, size, epsilon = 1e-9);
        assert_relative_eq!(trade.pnl, net - entry_cost, epsilon = 1e-9);
        assert_relative_eq!(trade.entry_cost, entry_cost, epsilon = 1e-9);
        assert_relative_eq!(portfolio.cash(), 10_000.0 - entry_cost + net, epsilon = 1e-9);
        assert!(!portfolio.is_open());
        assert_eq!(portfolio.trades.len(), 1);
    }

    #[test]
    fn round_trip_unchanged_price_no_commission_is_flat() {
        let mut portfolio = Portfolio::new(10_000.0);
        let cfg = config(0.0, 0.95);
        enter_long(&mut portfolio, &bar_at(1, 37.0), 0, None, &cfg);
        let trade = exit_position(&mut portfolio, &bar_at(2, 37.0), 1, &cfg).unwrap();
        assert_relative_eq!(trade.pnl, 0.0, epsilon = 1e-9);
        assert_relative_eq!(portfolio.cash(), 10_000.0, epsilon = 1e-9);
    }

    #[test]
    fn rejected_entry_is_recorded() {
        let mut portfolio = Portfolio::new(100.0);
        let outcome = execute(
            Decision::Enter(EntryRule::MeanReversionPullback),
            &mut portfolio,
            &bar_at(3, 10.0),
            2,
            &config(0.5, 1.0),
        );
        match outcome {
            ExecutionOutcome::Rejected(rejection) => assert_eq!(rejection.bar_index, 2),
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(portfolio.rejected_entries.len(), 1);
        assert!(!portfolio.is_open());
    }

    proptest! {
        #[test]
        fn cash_never_negative(
            steps in prop::collection::vec((any::<bool>(), 1.0f64..1_000.0), 1..100),
            order_size_pct in 0.01f64..1.0,
            commission_rate in 0.0f64..0.05,
        ) {
            let mut portfolio = Portfolio::new(10_000.0);
            let cfg = config(commission_rate, order_size_pct);
            for (i, (enter, price)) in steps.into_iter().enumerate() {
                let decision = if enter {
                    Decision::Enter(EntryRule::VolatilityBreakout)
                } else {
                    Decision::Exit
                };
                let bar = bar_at(1, price);
                execute(decision, &mut portfolio, &bar, i, &cfg);
                prop_assert!(portfolio.cash() >= 0.0, "cash {} went negative", portfolio.cash());
            }
        }
    }
}
