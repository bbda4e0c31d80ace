//! Report generation port trait.

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::TraderError;

/// Port for writing backtest reports.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
        output_path: &str,
    ) -> Result<(), TraderError>;
}
