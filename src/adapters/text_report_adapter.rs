//! Plain-text report adapter implementing ReportPort.
//!
//! `render_summary` is the console summary printed after every run; the file
//! report adds monthly returns and the full trade list.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;

use chrono::Datelike;

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::TraderError;
use crate::domain::portfolio::EquityPoint;
use crate::ports::report_port::ReportPort;

/// Starting/final value, return, trade count, win rate, Sharpe and drawdown.
pub fn render_summary(result: &BacktestResult, config: &BacktestConfig) -> String {
    let m = &result.metrics;
    let mut out = String::new();

    let _ = writeln!(out, "Symbol: {}", config.symbol);
    let _ = writeln!(out, "Bars processed: {}", result.bars_processed);
    let _ = writeln!(out, "Starting Portfolio Value: ${:.2}", config.initial_cash);
    let _ = writeln!(out, "Final Portfolio Value: ${:.2}", m.final_equity);
    let _ = writeln!(out, "Total Return: {:.2}%", m.total_return_pct);
    let _ = writeln!(
        out,
        "Total Trades: {}, Win Rate: {:.2}%",
        m.total_trades,
        m.win_rate * 100.0
    );
    match m.sharpe_ratio {
        Some(sharpe) => {
            let _ = writeln!(out, "Sharpe Ratio: {:.2}", sharpe);
        }
        None => {
            let _ = writeln!(out, "Sharpe Ratio: n/a");
        }
    }
    let _ = writeln!(out, "Max Drawdown: {:.2}%", m.max_drawdown_pct);
    if !result.rejected_entries.is_empty() {
        let _ = writeln!(out, "Rejected Entries: {}", result.rejected_entries.len());
    }
    if let Some(pos) = &result.open_position {
        let _ = writeln!(
            out,
            "Open Position: {:.6} @ {:.2} since bar {}",
            pos.size, pos.entry_price, pos.entry_bar_index
        );
        if let Some(last) = result.last_close {
            let _ = writeln!(out, "Unrealized PnL: {:.2}", pos.unrealized_pnl(last));
        }
    }
    out
}

pub fn render_trades(result: &BacktestResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<19}  {:<19}  {:>12}  {:>12}  {:>14}  {:>12}  {:>9}  {}",
        "#", "Entry", "Exit", "Entry Px", "Exit Px", "Size", "PnL", "Return", "Rule"
    );
    for (i, t) in result.trades.iter().enumerate() {
        let rule = t.entry_rule.map(|r| r.to_string()).unwrap_or_default();
        let _ = writeln!(
            out,
            "{:>4}  {:<19}  {:<19}  {:>12.2}  {:>12.2}  {:>14.6}  {:>12.2}  {:>8.2}%  {}",
            i + 1,
            t.entry_timestamp.format("%Y-%m-%d %H:%M:%S"),
            t.exit_timestamp.format("%Y-%m-%d %H:%M:%S"),
            t.entry_price,
            t.exit_price,
            t.size,
            t.pnl,
            t.return_pct(),
            rule
        );
    }
    out
}

/// Compounded return per calendar month, in percent.
fn compute_monthly_returns(equity_curve: &[EquityPoint]) -> BTreeMap<(i32, u32), f64> {
    let mut monthly: BTreeMap<(i32, u32), f64> = BTreeMap::new();

    for window in equity_curve.windows(2) {
        let prev = &window[0];
        let curr = &window[1];
        let return_rate = if prev.equity > 0.0 {
            (curr.equity - prev.equity) / prev.equity
        } else {
            0.0
        };
        let key = (curr.timestamp.year(), curr.timestamp.month());
        *monthly.entry(key).or_insert(0.0) += (1.0 + return_rate).ln();
    }

    monthly
        .into_iter()
        .map(|(key, log_sum)| (key, (log_sum.exp() - 1.0) * 100.0))
        .collect()
}

pub fn render_report(result: &BacktestResult, config: &BacktestConfig) -> String {
    let m = &result.metrics;
    let mut out = String::new();

    out.push_str("== Summary ==\n");
    out.push_str(&render_summary(result, config));

    out.push_str("\n== Trade Statistics ==\n");
    let _ = writeln!(out, "Wins / Losses / Breakeven: {} / {} / {}", m.wins, m.losses, m.breakeven);
    let _ = writeln!(out, "Gross Profit: {:.2}", m.gross_profit);
    let _ = writeln!(out, "Gross Loss: {:.2}", m.gross_loss);
    let _ = writeln!(out, "Profit Factor: {:.2}", m.profit_factor);
    let _ = writeln!(out, "Average Win: {:.2}", m.avg_win);
    let _ = writeln!(out, "Average Loss: {:.2}", m.avg_loss);
    let _ = writeln!(out, "Largest Win: {:.2}", m.largest_win);
    let _ = writeln!(out, "Largest Loss: {:.2}", m.largest_loss);
    let _ = writeln!(out, "Average Bars Held: {:.1}", m.avg_bars_held);
    let _ = writeln!(out, "Max Drawdown Duration: {} bars", m.max_drawdown_duration);

    let monthly = compute_monthly_returns(&result.equity_curve);
    if !monthly.is_empty() {
        out.push_str("\n== Monthly Returns ==\n");
        for ((year, month), ret) in &monthly {
            let _ = writeln!(out, "{year}-{month:02}  {ret:>8.2}%");
        }
    }

    out.push_str("\n== Trades ==\n");
    out.push_str(&render_trades(result));
    out
}

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
        output_path: &str,
    ) -> Result<(), TraderError> {
        fs::write(output_path, render_report(result, config)).map_err(|e| TraderError::Report {
            reason: format!("failed to write {}: {}", output_path, e),
        })
    }
}
