//! CAGR and annualized volatility over a NAV series.
//!
//! Both figures are reported in percent: a `cagr` of `10.0` means 10 % per
//! year, matching the percent daily returns the volatility is built from.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::store::{self, StoreError};
use crate::{NavDate, NavSeries};

/// Average calendar days per year used to annualize growth.
pub const DAYS_PER_YEAR: f64 = 365.25;
/// Trading days per year used to annualize volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalcError {
    #[error("insufficient data: {observations} observation(s), at least 2 required")]
    InsufficientData { observations: usize },

    #[error("degenerate window: {start} to {end} spans {days} day(s)")]
    DegenerateWindow {
        start: NavDate,
        end: NavDate,
        days: i64,
    },

    #[error("{field} is not finite")]
    NonFinite { field: &'static str },
}

impl CalcError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => "calc.insufficient_data",
            Self::DegenerateWindow { .. } => "calc.degenerate_window",
            Self::NonFinite { .. } => "calc.non_finite",
        }
    }
}

/// Growth and risk summary for a NAV series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Compound annual growth rate, percent.
    pub cagr: f64,
    /// Annualized sample standard deviation of daily returns, percent.
    pub volatility: f64,
    pub observations: usize,
    /// Daily returns that entered the volatility estimate.
    pub return_count: usize,
    pub start_date: NavDate,
    pub end_date: NavDate,
    pub elapsed_days: i64,
}

/// Step-over-step percentage change, `(nav_t / nav_{t-1} - 1) * 100`.
///
/// The first observation has no predecessor and yields no return; non-finite
/// results are dropped.
pub fn daily_returns(series: &NavSeries) -> Vec<f64> {
    series
        .observations()
        .windows(2)
        .map(|pair| (pair[1].nav / pair[0].nav - 1.0) * 100.0)
        .filter(|value| value.is_finite())
        .collect()
}

pub fn compute_metrics(series: &NavSeries) -> Result<Metrics, CalcError> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() >= 2 => (first, last),
        _ => {
            return Err(CalcError::InsufficientData {
                observations: series.len(),
            })
        }
    };

    let elapsed_days = first.date.days_until(last.date);
    if elapsed_days <= 0 {
        return Err(CalcError::DegenerateWindow {
            start: first.date,
            end: last.date,
            days: elapsed_days,
        });
    }

    let growth = last.nav / first.nav;
    let cagr = (growth.powf(DAYS_PER_YEAR / elapsed_days as f64) - 1.0) * 100.0;
    if !cagr.is_finite() {
        return Err(CalcError::NonFinite { field: "cagr" });
    }

    let returns = daily_returns(series);
    let volatility = sample_std_dev(&returns) * TRADING_DAYS_PER_YEAR.sqrt();
    if !volatility.is_finite() {
        return Err(CalcError::NonFinite {
            field: "volatility",
        });
    }

    debug!(
        observations = series.len(),
        returns = returns.len(),
        elapsed_days,
        cagr,
        volatility,
        "computed fund metrics"
    );

    Ok(Metrics {
        cagr,
        volatility,
        observations: series.len(),
        return_count: returns.len(),
        start_date: first.date,
        end_date: last.date,
        elapsed_days,
    })
}

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Calc(#[from] CalcError),
}

impl MetricsError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Store(error) => error.code(),
            Self::Calc(error) => error.code(),
        }
    }
}

/// Read a persisted series and compute its metrics.
pub fn compute_metrics_from_file(path: impl AsRef<Path>) -> Result<Metrics, MetricsError> {
    let series = store::read_series(path)?;
    Ok(compute_metrics(&series)?)
}

/// Sample standard deviation (divides by `n - 1`). Fewer than two values carry
/// no dispersion information and yield `0.0`.
fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}
