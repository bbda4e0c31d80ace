#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use ewotrader::domain::backtest::BacktestConfig;
use ewotrader::domain::error::TraderError;
use ewotrader::domain::indicator::IndicatorPeriods;
pub use ewotrader::domain::ohlcv::Bar;
use ewotrader::domain::strategy::{Strategy, StrategyParams};
use ewotrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Bar>, TraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| {
                        let day = b.timestamp.date();
                        start_date.is_none_or(|s| day >= s) && end_date.is_none_or(|e| day <= e)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Midnight of day `i` counted from 2024-01-01.
pub fn ts(i: usize) -> NaiveDateTime {
    date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap() + chrono::Duration::days(i as i64)
}

/// Bar that opens at `prev_close` and closes at `close`, with the range
/// spanning exactly those two prices.
pub fn make_bar(i: usize, prev_close: f64, close: f64) -> Bar {
    Bar {
        timestamp: ts(i),
        open: prev_close,
        high: prev_close.max(close),
        low: prev_close.min(close),
        close,
        volume: 1000.0,
    }
}

/// Chain of bars through `closes`, each opening at the previous close.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    let mut prev = closes.first().copied().unwrap_or(0.0);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let bar = make_bar(i, prev, close);
            prev = close;
            bar
        })
        .collect()
}

pub fn constant_bars(n: usize, price: f64) -> Vec<Bar> {
    bars_from_closes(&vec![price; n])
}

/// Short lookbacks so a hand-built path gets through warm-up in five bars.
pub fn short_periods() -> IndicatorPeriods {
    IndicatorPeriods {
        ema_fast: 2,
        ema_slow: 3,
        rsi: 2,
        rsi_fast: 2,
        rsi_slow: 3,
        sma: 2,
        ewo_fast: 2,
        ewo_slow: 3,
        stoch_period: 3,
        stoch_period_dfast: 2,
    }
}

/// Short periods and a loose EWO floor so a steady decline triggers the
/// volatility-breakout entry.
pub fn breakout_config() -> BacktestConfig {
    BacktestConfig {
        strategy: Strategy {
            params: StrategyParams {
                ewo_min: -50.0,
                ..StrategyParams::default()
            },
            periods: short_periods(),
        },
        ..BacktestConfig::default()
    }
}

/// Bar index where the decline in `breakout_path` first satisfies Rule A.
pub const BREAKOUT_ENTRY_INDEX: usize = 4;
/// Bar index of the rally that pushes %K to 100.
pub const BREAKOUT_EXIT_INDEX: usize = 7;

/// Seven bars falling 10% each, then a rally back to 100.
///
/// With `breakout_config` the inputs are all ready at bar 4. Both RSIs sit
/// at 0 there and close is more than 4.4% under the fast EMA, so the entry
/// fires. %K stays at 0 until the rally bar closes at the top of the range.
pub fn breakout_path() -> Vec<Bar> {
    let mut closes: Vec<f64> = (0..7).map(|i| 100.0 * 0.9_f64.powi(i)).collect();
    closes.push(100.0);
    bars_from_closes(&closes)
}

/// Deterministic oscillating series long enough for the default warm-up.
pub fn wave_bars(n: usize) -> Vec<Bar> {
    let closes: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 + 0.05 * t + 12.0 * (t / 9.0).sin() + 5.0 * (t / 2.3).cos()
        })
        .collect();
    bars_from_closes(&closes)
}

pub fn bars_to_csv(bars: &[Bar]) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Volume\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.timestamp.format("%Y-%m-%d"),
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume
        ));
    }
    out
}

/// Short periods with Rule A switched off (no RSI is below zero) and the
/// pullback floors loosened so one sharp drop after a climb qualifies.
pub fn pullback_config() -> BacktestConfig {
    BacktestConfig {
        strategy: Strategy {
            params: StrategyParams {
                fast_rsi_entry_max: 0.0,
                rsi_32_min: 5.0,
                momentum_32_max: -0.1,
                ..StrategyParams::default()
            },
            periods: short_periods(),
        },
        ..BacktestConfig::default()
    }
}

pub const PULLBACK_ENTRY_INDEX: usize = 5;
pub const PULLBACK_EXIT_INDEX: usize = 6;

/// Climb by 2 from 100 to 108, drop to 90, then rally to 110.
///
/// At the drop the slow RSI falls from 100 to about 18, both short RSIs sit
/// at 10, close is below 0.932 of the 2-bar SMA (99) and the momentum ratio
/// is -0.2. The rally closes at the top of the 3-bar range, so %K is 100.
pub fn pullback_path() -> Vec<Bar> {
    bars_from_closes(&[100.0, 102.0, 104.0, 106.0, 108.0, 90.0, 110.0])
}
