//! CSV file data adapter.
//!
//! Reads `<base_path>/<symbol>.csv` with a `Date,Open,High,Low,Close,Volume`
//! header, the layout of a typical market-data download. Column names are
//! matched case-insensitively and extra columns (e.g. `Adj Close`) are ignored.
//! Rows with an empty price or volume field are skipped. Rows must be in
//! chronological order; a row dated before its predecessor is a data error.
//! Equal timestamps pass through and are rejected by the backtest driver.

use crate::domain::error::TraderError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn data_error(reason: String) -> TraderError {
    TraderError::Data { reason }
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DDTHH:MM:SS`.
fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, TraderError> {
    let raw = raw.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
        .map_err(|e| data_error(format!("invalid date '{}': {}", raw, e)))
}

fn parse_field(record: &csv::StringRecord, idx: usize, name: &str) -> Result<Option<f64>, TraderError> {
    let raw = record
        .get(idx)
        .ok_or_else(|| data_error(format!("missing {} column", name)))?
        .trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|e| data_error(format!("invalid {} value '{}': {}", name, raw, e)))
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Bar>, TraderError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| data_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| data_error(format!("CSV header error: {}", e)))?
            .clone();

        let mut indices = [0usize; 6];
        for (slot, column) in indices.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(column))
                .ok_or_else(|| data_error(format!("missing {} column", column)))?;
        }
        let [date_idx, open_idx, high_idx, low_idx, close_idx, volume_idx] = indices;

        let mut bars = Vec::new();
        let mut skipped = 0usize;
        let mut prev_timestamp: Option<NaiveDateTime> = None;

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| data_error(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(date_idx)
                .ok_or_else(|| data_error("missing date column".into()))?;
            let timestamp = parse_timestamp(date_str)?;
            if let Some(prev) = prev_timestamp.filter(|&prev| timestamp < prev) {
                return Err(data_error(format!(
                    "{}: row {} ({}) is earlier than the previous row ({})",
                    path.display(),
                    row + 1,
                    timestamp,
                    prev
                )));
            }
            prev_timestamp = Some(timestamp);

            let day = timestamp.date();
            if start_date.is_some_and(|s| day < s) || end_date.is_some_and(|e| day > e) {
                continue;
            }

            let fields = (
                parse_field(&record, open_idx, "open")?,
                parse_field(&record, high_idx, "high")?,
                parse_field(&record, low_idx, "low")?,
                parse_field(&record, close_idx, "close")?,
                parse_field(&record, volume_idx, "volume")?,
            );
            let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = fields else {
                skipped += 1;
                continue;
            };

            bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        if skipped > 0 {
            debug!(symbol, skipped, "skipped rows with missing fields");
        }

        Ok(bars)
    }
}
