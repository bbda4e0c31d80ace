//! Bar data provider port trait.

use crate::domain::error::TraderError;
use crate::domain::ohlcv::Bar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `symbol` in chronological order, optionally limited to an
    /// inclusive date window.
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Bar>, TraderError>;
}
