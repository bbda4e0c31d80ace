//! Signal evaluation: a pure function from one indicator snapshot to a decision.
//!
//! While flat, two independent rule sets are OR-combined:
//! - Rule A (volatility breakout): fast RSI, RSI, EWO and two EMA bands.
//! - Rule B (mean-reversion pullback): falling slow RSI, fast RSI, RSI floor,
//!   SMA band and a negative momentum ratio.
//!
//! Entries are held back until every rule input has left warm-up.
//! While open, the only exit is %K rising above `exit_fast_k_max`.

use super::indicator::IndicatorSnapshot;
use super::position::{EntryRule, Position};
use super::strategy::StrategyParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Enter(EntryRule),
    Exit,
    Hold,
}

pub fn decide(
    snapshot: &IndicatorSnapshot,
    position: Option<&Position>,
    params: &StrategyParams,
) -> Decision {
    match position {
        None => match entry_rule(snapshot, params) {
            Some(rule) => Decision::Enter(rule),
            None => Decision::Hold,
        },
        Some(_) => {
            if exit_signal(snapshot, params) {
                Decision::Exit
            } else {
                Decision::Hold
            }
        }
    }
}

/// First entry rule set that holds, Rule A before Rule B.
pub fn entry_rule(snapshot: &IndicatorSnapshot, params: &StrategyParams) -> Option<EntryRule> {
    if !snapshot.is_ready() {
        return None;
    }
    if volatility_breakout(snapshot, params)? {
        return Some(EntryRule::VolatilityBreakout);
    }
    if mean_reversion_pullback(snapshot, params)? {
        return Some(EntryRule::MeanReversionPullback);
    }
    None
}

pub fn exit_signal(snapshot: &IndicatorSnapshot, params: &StrategyParams) -> bool {
    snapshot
        .fast_k
        .is_some_and(|k| k > params.exit_fast_k_max)
}

fn volatility_breakout(s: &IndicatorSnapshot, p: &StrategyParams) -> Option<bool> {
    let close = s.close;
    Some(
        s.rsi_fast? < p.fast_rsi_entry_max
            && close < s.ema_fast? * p.ema_low_band
            && s.ewo? > p.ewo_min
            && close < s.ema_slow? * p.ema_high_band
            && s.rsi? < p.rsi_entry_max,
    )
}

fn mean_reversion_pullback(s: &IndicatorSnapshot, p: &StrategyParams) -> Option<bool> {
    let close = s.close;
    Some(
        s.rsi_slow? < s.rsi_slow_prev?
            && s.rsi_fast? < p.fast_rsi_32_max
            && s.rsi? > p.rsi_32_min
            && close < s.sma? * p.sma15_band
            && s.momentum? < p.momentum_32_max,
    )
}
