//! Configuration validation and assembly.
//!
//! Every key is optional; missing keys fall back to the reference
//! parameterization in `BacktestConfig::default()`. Present keys must parse,
//! and every number must be finite.

use chrono::NaiveDate;

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::TraderError;
use crate::domain::indicator::IndicatorPeriods;
use crate::domain::strategy::{Strategy, StrategyParams};
use crate::ports::config_port::ConfigPort;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TraderError> {
    build_backtest_config(config).map(|_| ())
}

/// Read, validate and assemble a `BacktestConfig`.
pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, TraderError> {
    let defaults = BacktestConfig::default();

    let symbol = match config.get_string("backtest", "symbol") {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        Some(_) => {
            return Err(TraderError::invalid("backtest", "symbol", "symbol must not be empty"));
        }
        None => defaults.symbol,
    };

    let start_date = parse_optional_date(config, "start_date")?;
    let end_date = parse_optional_date(config, "end_date")?;
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start >= end {
            return Err(TraderError::invalid(
                "backtest",
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }

    let initial_cash = read_double(config, "backtest", "initial_cash", defaults.initial_cash)?;
    if !(initial_cash > 0.0) {
        return Err(TraderError::invalid(
            "backtest",
            "initial_cash",
            "initial_cash must be positive",
        ));
    }

    let commission_rate =
        read_double(config, "backtest", "commission_rate", defaults.commission_rate)?;
    if !(0.0..1.0).contains(&commission_rate) {
        return Err(TraderError::invalid(
            "backtest",
            "commission_rate",
            "commission_rate must be in [0, 1)",
        ));
    }

    let annualization = match config.get_string("backtest", "annualization") {
        None => None,
        Some(raw) => {
            let value: f64 = raw.trim().parse().map_err(|_| {
                TraderError::invalid("backtest", "annualization", format!("not a number: {raw}"))
            })?;
            if !(value > 0.0 && value.is_finite()) {
                return Err(TraderError::invalid(
                    "backtest",
                    "annualization",
                    "annualization must be a positive finite number",
                ));
            }
            Some(value)
        }
    };

    Ok(BacktestConfig {
        symbol,
        start_date,
        end_date,
        initial_cash,
        commission_rate,
        annualization,
        strategy: Strategy {
            params: build_strategy_params(config)?,
            periods: build_indicator_periods(config)?,
        },
    })
}

pub fn build_strategy_params(config: &dyn ConfigPort) -> Result<StrategyParams, TraderError> {
    let d = StrategyParams::default();
    let get = |key: &str, default: f64| read_double(config, "strategy", key, default);

    let params = StrategyParams {
        fast_rsi_entry_max: get("fast_rsi_entry_max", d.fast_rsi_entry_max)?,
        rsi_entry_max: get("rsi_entry_max", d.rsi_entry_max)?,
        ewo_min: get("ewo_min", d.ewo_min)?,
        ema_low_band: get("ema_low_band", d.ema_low_band)?,
        ema_high_band: get("ema_high_band", d.ema_high_band)?,
        fast_rsi_32_max: get("fast_rsi_32_max", d.fast_rsi_32_max)?,
        rsi_32_min: get("rsi_32_min", d.rsi_32_min)?,
        sma15_band: get("sma15_band", d.sma15_band)?,
        momentum_32_max: get("momentum_32_max", d.momentum_32_max)?,
        exit_fast_k_max: get("exit_fast_k_max", d.exit_fast_k_max)?,
        order_size_pct: get("order_size_pct", d.order_size_pct)?,
    };

    if !(params.order_size_pct > 0.0 && params.order_size_pct <= 1.0) {
        return Err(TraderError::invalid(
            "strategy",
            "order_size_pct",
            "order_size_pct must be in (0, 1]",
        ));
    }

    let bands = [
        ("ema_low_band", params.ema_low_band),
        ("ema_high_band", params.ema_high_band),
        ("sma15_band", params.sma15_band),
    ];
    for (key, value) in bands {
        if !(value > 0.0) {
            return Err(TraderError::invalid("strategy", key, format!("{key} must be positive")));
        }
    }

    Ok(params)
}

pub fn build_indicator_periods(config: &dyn ConfigPort) -> Result<IndicatorPeriods, TraderError> {
    let d = IndicatorPeriods::default();
    let get = |key: &str, default: usize| -> Result<usize, TraderError> {
        let value = config.get_int("indicators", key, default as i64)?;
        if value < 1 {
            return Err(TraderError::invalid(
                "indicators",
                key,
                format!("{key} must be at least 1"),
            ));
        }
        Ok(value as usize)
    };

    let periods = IndicatorPeriods {
        ema_fast: get("ema_fast", d.ema_fast)?,
        ema_slow: get("ema_slow", d.ema_slow)?,
        rsi: get("rsi", d.rsi)?,
        rsi_fast: get("rsi_fast", d.rsi_fast)?,
        rsi_slow: get("rsi_slow", d.rsi_slow)?,
        sma: get("sma", d.sma)?,
        ewo_fast: get("ewo_fast", d.ewo_fast)?,
        ewo_slow: get("ewo_slow", d.ewo_slow)?,
        stoch_period: get("stoch_period", d.stoch_period)?,
        stoch_period_dfast: get("stoch_period_dfast", d.stoch_period_dfast)?,
    };

    if periods.ewo_fast >= periods.ewo_slow {
        return Err(TraderError::invalid(
            "indicators",
            "ewo_fast",
            "ewo_fast must be shorter than ewo_slow",
        ));
    }

    Ok(periods)
}

/// Reads a number and rejects `inf` and `nan`, which parse successfully.
fn read_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, TraderError> {
    let value = config.get_double(section, key, default)?;
    if !value.is_finite() {
        return Err(TraderError::invalid(
            section,
            key,
            format!("{key} must be a finite number, got {value}"),
        ));
    }
    Ok(value)
}

fn parse_optional_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, TraderError> {
    match config.get_string("backtest", key) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                TraderError::invalid(
                    "backtest",
                    key,
                    format!("invalid {key} format, expected YYYY-MM-DD"),
                )
            }),
    }
}
