//! Behavior tests for CAGR and annualized volatility.

use approx::assert_relative_eq;
use fundflow_core::{
    compute_metrics, CalcError, NavDate, NavObservation, NavSeries, TRADING_DAYS_PER_YEAR,
};
use time::macros::date;
use time::Date;

fn series(points: &[(Date, f64)]) -> NavSeries {
    let observations = points
        .iter()
        .map(|(day, nav)| NavObservation::new(NavDate::new(*day), *nav).expect("valid observation"))
        .collect();
    NavSeries::new(observations).expect("ordered series")
}

// =============================================================================
// Metrics: growth
// =============================================================================

#[test]
fn when_nav_grows_ten_percent_over_a_year_cagr_is_about_ten_percent() {
    // Given: NAV 100 on one date and 110 exactly 365 days later
    let nav = series(&[(date!(2021 - 01 - 01), 100.0), (date!(2022 - 01 - 01), 110.0)]);

    // When: Metrics are computed
    let metrics = compute_metrics(&nav).expect("metrics");

    // Then: CAGR uses a 365.25-day year and is reported in percent
    let expected = (1.1_f64.powf(365.25 / 365.0) - 1.0) * 100.0;
    assert_relative_eq!(metrics.cagr, expected, epsilon = 1e-9);
    assert_relative_eq!(metrics.cagr, 10.0, epsilon = 0.01);
    assert_eq!(metrics.elapsed_days, 365);
    assert_eq!(metrics.observations, 2);
}

#[test]
fn when_nav_falls_cagr_is_negative() {
    // Given: NAV halves over two years
    let nav = series(&[(date!(2020 - 01 - 01), 20.0), (date!(2022 - 01 - 01), 10.0)]);

    // When: Metrics are computed
    let metrics = compute_metrics(&nav).expect("metrics");

    // Then: CAGR is roughly -29.3%
    assert!(metrics.cagr < 0.0);
    assert_relative_eq!(metrics.cagr, -29.3, epsilon = 0.1);
}

// =============================================================================
// Metrics: volatility
// =============================================================================

#[test]
fn when_nav_is_flat_volatility_and_cagr_are_zero() {
    // Given: Ten consecutive days at the same NAV
    let start = date!(2024 - 03 - 01);
    let points = (0..10)
        .map(|offset| (start + time::Duration::days(offset), 25.0))
        .collect::<Vec<_>>();
    let nav = series(&points);

    // When: Metrics are computed
    let metrics = compute_metrics(&nav).expect("metrics");

    // Then: There is no growth and no dispersion
    assert_relative_eq!(metrics.volatility, 0.0);
    assert_relative_eq!(metrics.cagr, 0.0);
    assert_eq!(metrics.return_count, 9);
}

#[test]
fn when_returns_alternate_volatility_is_sample_std_dev_annualized() {
    // Given: Daily returns of +10%, -10%, +10%
    let nav = series(&[
        (date!(2024 - 01 - 01), 100.0),
        (date!(2024 - 01 - 02), 110.0),
        (date!(2024 - 01 - 03), 99.0),
        (date!(2024 - 01 - 04), 108.9),
    ]);

    // When: Metrics are computed
    let metrics = compute_metrics(&nav).expect("metrics");

    // Then: Sample std dev of [10, -10, 10] scaled by sqrt(252)
    let mean: f64 = 10.0 / 3.0;
    let variance = ((10.0 - mean).powi(2) * 2.0 + (-10.0 - mean).powi(2)) / 2.0;
    let expected = f64::sqrt(variance) * TRADING_DAYS_PER_YEAR.sqrt();
    assert_relative_eq!(metrics.volatility, expected, epsilon = 1e-6);
    assert_eq!(metrics.return_count, 3);
}

#[test]
fn when_only_one_return_exists_volatility_is_zero() {
    // Given: Exactly two observations, so a single daily return
    let nav = series(&[(date!(2024 - 01 - 01), 10.0), (date!(2024 - 01 - 02), 10.5)]);

    // When: Metrics are computed
    let metrics = compute_metrics(&nav).expect("metrics");

    // Then: Volatility is defined as zero and the return count says why
    assert_relative_eq!(metrics.volatility, 0.0);
    assert_eq!(metrics.return_count, 1);
}

// =============================================================================
// Metrics: rejected inputs
// =============================================================================

#[test]
fn when_series_has_one_observation_system_reports_insufficient_data() {
    // Given: A single NAV point
    let nav = series(&[(date!(2024 - 01 - 01), 10.0)]);

    // When: Metrics are computed
    let error = compute_metrics(&nav).expect_err("too short");

    // Then: The error is explicit rather than a NaN
    assert!(matches!(error, CalcError::InsufficientData { observations: 1 }));
    assert_eq!(error.code(), "calc.insufficient_data");
}

#[test]
fn when_series_is_empty_system_reports_insufficient_data() {
    let nav = NavSeries::new(Vec::new()).expect("empty series");

    let error = compute_metrics(&nav).expect_err("empty");

    assert!(matches!(error, CalcError::InsufficientData { observations: 0 }));
}

#[test]
fn when_first_and_last_share_a_date_system_reports_degenerate_window() {
    // Given: Two observations on the same day
    let nav = series(&[(date!(2024 - 01 - 01), 10.0), (date!(2024 - 01 - 01), 11.0)]);

    // When: Metrics are computed
    let error = compute_metrics(&nav).expect_err("zero-length window");

    // Then: No division by a zero-day span is attempted
    assert!(matches!(error, CalcError::DegenerateWindow { days: 0, .. }));
    assert_eq!(error.code(), "calc.degenerate_window");
}
