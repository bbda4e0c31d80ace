//! Performance metrics over a finished run's trade log and equity curve.

use super::portfolio::EquityPoint;
use super::position::TradeRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
    /// Fraction of trades with positive pnl (0.0 when there are no trades).
    pub win_rate: f64,
    /// `None` when fewer than two equity samples or zero return volatility.
    pub sharpe_ratio: Option<f64>,
    /// Largest peak-to-trough decline, in percent.
    pub max_drawdown_pct: f64,
    /// Longest run of bars spent below a prior equity peak.
    pub max_drawdown_duration: usize,
    pub final_equity: f64,
    pub total_return_pct: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub avg_bars_held: f64,
}

impl Metrics {
    /// Pure function of its inputs; calling it twice yields identical results.
    ///
    /// `annualization` scales the per-bar Sharpe ratio by its square root
    /// (e.g. 365 for daily crypto bars). `None` leaves it per-bar.
    pub fn compute(
        trades: &[TradeRecord],
        equity_curve: &[EquityPoint],
        initial_cash: f64,
        annualization: Option<f64>,
    ) -> Self {
        let final_equity = equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(initial_cash);

        let total_return_pct = if initial_cash > 0.0 {
            (final_equity - initial_cash) / initial_cash * 100.0
        } else {
            0.0
        };

        let (max_drawdown, max_drawdown_duration) = compute_drawdown(equity_curve);
        let sharpe_ratio = compute_sharpe(equity_curve, annualization);

        let mut wins = 0usize;
        let mut losses = 0usize;
        let mut breakeven = 0usize;
        let mut gross_profit = 0.0_f64;
        let mut gross_loss = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;
        let mut total_bars_held = 0usize;

        for trade in trades {
            let pnl = trade.pnl;
            if pnl > 0.0 {
                wins += 1;
                gross_profit += pnl;
                largest_win = largest_win.max(pnl);
            } else if pnl < 0.0 {
                losses += 1;
                gross_loss += pnl.abs();
                largest_loss = largest_loss.max(pnl.abs());
            } else {
                breakeven += 1;
            }
            total_bars_held += trade.bars_held();
        }

        let total_trades = trades.len();
        let win_rate = if total_trades > 0 {
            wins as f64 / total_trades as f64
        } else {
            0.0
        };

        let profit_factor = if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else if gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let avg_win = if wins > 0 {
            gross_profit / wins as f64
        } else {
            0.0
        };

        let avg_loss = if losses > 0 {
            gross_loss / losses as f64
        } else {
            0.0
        };

        let avg_bars_held = if total_trades > 0 {
            total_bars_held as f64 / total_trades as f64
        } else {
            0.0
        };

        Metrics {
            total_trades,
            wins,
            losses,
            breakeven,
            win_rate,
            sharpe_ratio,
            max_drawdown_pct: max_drawdown * 100.0,
            max_drawdown_duration,
            final_equity,
            total_return_pct,
            gross_profit,
            gross_loss,
            profit_factor,
            avg_win,
            avg_loss,
            largest_win,
            largest_loss,
            avg_bars_held,
        }
    }
}

/// Single forward pass tracking the running peak. Returns (fraction, bars).
fn compute_drawdown(equity_curve: &[EquityPoint]) -> (f64, usize) {
    let Some(first) = equity_curve.first() else {
        return (0.0, 0);
    };

    let mut peak = first.equity;
    let mut max_dd = 0.0_f64;
    let mut max_dd_duration = 0usize;
    let mut current_dd_duration = 0usize;

    for point in equity_curve {
        if point.equity >= peak {
            peak = point.equity;
            current_dd_duration = 0;
        } else if peak > 0.0 {
            let dd = (peak - point.equity) / peak;
            max_dd = max_dd.max(dd);
            current_dd_duration += 1;
            max_dd_duration = max_dd_duration.max(current_dd_duration);
        }
    }

    (max_dd, max_dd_duration)
}

fn compute_sharpe(equity_curve: &[EquityPoint], annualization: Option<f64>) -> Option<f64> {
    if equity_curve.len() < 2 {
        return None;
    }

    let returns: Vec<f64> = equity_curve
        .windows(2)
        .map(|w| {
            let prev = w[0].equity;
            let curr = w[1].equity;
            if prev > 0.0 {
                (curr - prev) / prev
            } else {
                0.0
            }
        })
        .collect();

    let n = returns.len() as f64;
    let mean: f64 = returns.iter().sum::<f64>() / n;
    let variance: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev == 0.0 || !stddev.is_finite() {
        return None;
    }

    let sharpe = mean / stddev;
    Some(match annualization {
        Some(periods) => sharpe * periods.sqrt(),
        None => sharpe,
    })
}
