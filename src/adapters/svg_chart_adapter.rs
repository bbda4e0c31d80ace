//! SVG equity chart with trade markers, implementing ReportPort.
//!
//! The equity curve holds one sample per bar, so a bar index doubles as the
//! x position. Entries are drawn as green up-triangles, exits as red
//! down-triangles, and a position still open at the end gets an entry marker only.

use std::fmt::Write as _;
use std::fs;

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::TraderError;
use crate::ports::report_port::ReportPort;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 320.0;
const PADDING: f64 = 48.0;
const MARKER: f64 = 5.0;

/// Maps bar index and equity onto the plot area.
struct Scale {
    min_equity: f64,
    scale_x: f64,
    scale_y: f64,
}

impl Scale {
    fn new(equity: &[f64]) -> Self {
        let min_equity = equity.iter().copied().fold(f64::INFINITY, f64::min);
        let max_equity = equity.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let plot_width = WIDTH - 2.0 * PADDING;
        let plot_height = HEIGHT - 2.0 * PADDING;
        let range = max_equity - min_equity;

        Scale {
            min_equity,
            scale_x: if equity.len() > 1 {
                plot_width / (equity.len() - 1) as f64
            } else {
                0.0
            },
            scale_y: if range > 0.0 { plot_height / range } else { 1.0 },
        }
    }

    fn x(&self, bar_index: usize) -> f64 {
        PADDING + bar_index as f64 * self.scale_x
    }

    fn y(&self, equity: f64) -> f64 {
        HEIGHT - PADDING - (equity - self.min_equity) * self.scale_y
    }
}

fn marker(out: &mut String, class: &str, x: f64, y: f64, up: bool) {
    let (tip, base) = if up { (y - MARKER, y + MARKER) } else { (y + MARKER, y - MARKER) };
    let _ = writeln!(
        out,
        r#"  <polygon class="{class}" points="{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}"/>"#,
        x,
        tip,
        x - MARKER,
        base,
        x + MARKER,
        base
    );
}

pub fn render_equity_chart(result: &BacktestResult, config: &BacktestConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH:.0}" height="{HEIGHT:.0}" viewBox="0 0 {WIDTH:.0} {HEIGHT:.0}">"#
    );
    let _ = writeln!(
        out,
        "  <style>.equity{{fill:none;stroke:#1f4e9c;stroke-width:1.5}} .entry{{fill:#2e8b57}} .exit{{fill:#c0392b}} .axis{{stroke:#444}} text{{font:12px sans-serif}}</style>"
    );
    let _ = writeln!(out, r#"  <rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        out,
        r#"  <text x="{PADDING:.0}" y="24">{} equity</text>"#,
        config.symbol
    );

    if result.equity_curve.is_empty() {
        let _ = writeln!(
            out,
            r#"  <text x="{PADDING:.0}" y="{:.0}">No equity data available.</text>"#,
            HEIGHT / 2.0
        );
        out.push_str("</svg>\n");
        return out;
    }

    let equity: Vec<f64> = result.equity_curve.iter().map(|p| p.equity).collect();
    let scale = Scale::new(&equity);
    let bottom = HEIGHT - PADDING;

    let _ = writeln!(
        out,
        r#"  <line class="axis" x1="{PADDING:.0}" y1="{PADDING:.0}" x2="{PADDING:.0}" y2="{bottom:.0}"/>"#
    );
    let _ = writeln!(
        out,
        r#"  <line class="axis" x1="{PADDING:.0}" y1="{bottom:.0}" x2="{:.0}" y2="{bottom:.0}"/>"#,
        WIDTH - PADDING
    );

    let points: Vec<String> = equity
        .iter()
        .enumerate()
        .map(|(i, &e)| format!("{:.1},{:.1}", scale.x(i), scale.y(e)))
        .collect();
    let _ = writeln!(
        out,
        r#"  <polyline class="equity" points="{}"/>"#,
        points.join(" ")
    );

    let at = |bar_index: usize| equity.get(bar_index).map(|&e| (scale.x(bar_index), scale.y(e)));
    for trade in &result.trades {
        if let Some((x, y)) = at(trade.entry_bar_index) {
            marker(&mut out, "entry", x, y, true);
        }
        if let Some((x, y)) = at(trade.exit_bar_index) {
            marker(&mut out, "exit", x, y, false);
        }
    }
    if let Some((x, y)) = result.open_position.as_ref().and_then(|p| at(p.entry_bar_index)) {
        marker(&mut out, "entry", x, y, true);
    }

    out.push_str("</svg>\n");
    out
}

pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SvgChartAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for SvgChartAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
        output_path: &str,
    ) -> Result<(), TraderError> {
        fs::write(output_path, render_equity_chart(result, config)).map_err(|e| {
            TraderError::Report {
                reason: format!("failed to write chart {}: {}", output_path, e),
            }
        })
    }
}
