//! Backtest driver: one sequential pass over the bar stream.
//!
//! Per bar, in order: validate, update indicators, decide, execute, then
//! append a mark-to-market equity sample. All state is created here at run
//! start, so concurrent or repeated runs never share anything.

use chrono::NaiveDate;
use tracing::{debug, info};

use super::error::TraderError;
use super::execution::{execute, ExecutionConfig};
use super::indicator_engine::IndicatorEngine;
use super::metrics::Metrics;
use super::ohlcv::Bar;
use super::portfolio::{Account, EquityPoint, Portfolio, RejectedEntry};
use super::position::{Position, TradeRecord};
use super::signal::decide;
use super::strategy::Strategy;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub symbol: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub initial_cash: f64,
    pub commission_rate: f64,
    /// Periods per year used to annualize the Sharpe ratio.
    pub annualization: Option<f64>,
    pub strategy: Strategy,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            symbol: "BTC-USD".to_string(),
            start_date: None,
            end_date: None,
            initial_cash: 10_000.0,
            commission_rate: 0.001,
            annualization: None,
            strategy: Strategy::default(),
        }
    }
}

impl BacktestConfig {
    pub fn execution_config(&self) -> ExecutionConfig {
        ExecutionConfig {
            commission_rate: self.commission_rate,
            order_size_pct: self.strategy.params.order_size_pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub account: Account,
    /// Still open when the bars ran out; valued in the last equity sample.
    pub open_position: Option<Position>,
    /// Close of the final bar; `None` for an empty run.
    pub last_close: Option<f64>,
    pub trades: Vec<TradeRecord>,
    pub equity_curve: Vec<EquityPoint>,
    pub rejected_entries: Vec<RejectedEntry>,
    pub metrics: Metrics,
    pub bars_processed: usize,
}

/// Run the strategy over `bars`.
///
/// The only error is a malformed bar, which aborts the run.
pub fn run_backtest(bars: &[Bar], config: &BacktestConfig) -> Result<BacktestResult, TraderError> {
    let strategy = &config.strategy;
    let exec_config = config.execution_config();
    let mut engine = IndicatorEngine::new(&strategy.periods);
    let mut portfolio = Portfolio::new(config.initial_cash);

    info!(
        bars = bars.len(),
        initial_cash = config.initial_cash,
        warmup = strategy.periods.warmup_bars(),
        "starting backtest"
    );

    let mut prev: Option<&Bar> = None;
    for (bar_index, bar) in bars.iter().enumerate() {
        bar.validate(bar_index, prev)?;

        let snapshot = engine.update(bar_index, bar);
        let decision = decide(&snapshot, portfolio.position.as_ref(), &strategy.params);
        execute(decision, &mut portfolio, bar, bar_index, &exec_config);

        let equity = portfolio.total_equity(bar.close);
        portfolio.record_equity(bar.timestamp, equity);
        debug_assert!(portfolio.cash() >= 0.0);

        prev = Some(bar);
    }

    let metrics = Metrics::compute(
        &portfolio.trades,
        &portfolio.equity_curve,
        portfolio.initial_cash,
        config.annualization,
    );

    if let Some(pos) = &portfolio.position {
        debug!(entry_bar_index = pos.entry_bar_index, "position still open at end of data");
    }
    info!(
        trades = metrics.total_trades,
        final_equity = metrics.final_equity,
        rejected = portfolio.rejected_entries.len(),
        "backtest complete"
    );

    Ok(BacktestResult {
        account: portfolio.account,
        open_position: portfolio.position,
        last_close: bars.last().map(|b| b.close),
        trades: portfolio.trades,
        equity_curve: portfolio.equity_curve,
        rejected_entries: portfolio.rejected_entries,
        metrics,
        bars_processed: bars.len(),
    })
}
