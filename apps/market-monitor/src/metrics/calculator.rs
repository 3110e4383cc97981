//! Metrics engine operations.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::constants::MIN_VOLATILITY_WINDOW;
use super::error::MetricsError;
use super::math::{annualization_factor, std_dev};
use crate::domain::market_data::PriceTable;
use crate::domain::performance::{
    CumulativeSeries, OutperformanceSeries, ReturnSeries, SeriesPoint, VolatilitySeries,
};

/// Close-to-close returns in table order.
///
/// Trading-calendar gaps are not filled: each return compares against the
/// previous row present in the table. The first row has no predecessor and
/// is dropped, so tables with fewer than two rows yield an empty series.
#[must_use]
pub fn compute_returns(table: &PriceTable) -> ReturnSeries {
    let points = table
        .bars()
        .windows(2)
        .map(|pair| {
            let (prev, curr) = (&pair[0], &pair[1]);
            SeriesPoint::new(curr.date, simple_return(prev.close, curr.close))
        })
        .collect();

    ReturnSeries::from_ordered(points)
}

/// `curr / prev - 1`, exact in decimal unless the ratio overflows it.
///
/// Closes are positive by table invariant, so the f64 fallback is finite.
fn simple_return(prev: Decimal, curr: Decimal) -> f64 {
    curr.checked_div(prev)
        .and_then(|ratio| (ratio - Decimal::ONE).to_f64())
        .unwrap_or_else(|| {
            let prev = prev.to_f64().unwrap_or(f64::NAN);
            let curr = curr.to_f64().unwrap_or(f64::NAN);
            curr / prev - 1.0
        })
}

/// Compounded performance: `prod(1 + r_i) - 1` up to each date.
///
/// Any finite return is accepted, including losses beyond -100%.
#[must_use]
pub fn compute_cumulative_performance(returns: &ReturnSeries) -> CumulativeSeries {
    let mut growth = 1.0_f64;
    let points = returns
        .iter()
        .map(|point| {
            growth *= 1.0 + point.value;
            SeriesPoint::new(point.date, growth - 1.0)
        })
        .collect();

    CumulativeSeries::from_ordered(points)
}

/// Asset return minus benchmark return on the dates both series share.
///
/// Dates present in only one series are dropped; disjoint inputs give an
/// empty series.
#[must_use]
pub fn compute_outperformance(
    asset: &ReturnSeries,
    benchmark: &ReturnSeries,
) -> OutperformanceSeries {
    let (asset, benchmark) = (asset.points(), benchmark.points());
    let mut points = Vec::with_capacity(asset.len().min(benchmark.len()));
    let (mut i, mut j) = (0, 0);

    while i < asset.len() && j < benchmark.len() {
        let (a, b) = (asset[i], benchmark[j]);
        match a.date.cmp(&b.date) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                points.push(SeriesPoint::new(a.date, a.value - b.value));
                i += 1;
                j += 1;
            }
        }
    }

    OutperformanceSeries::from_ordered(points)
}

/// Annualized rolling volatility over the trailing `window` returns.
///
/// Uses the sample standard deviation scaled by `sqrt(252)`. The first
/// `window - 1` dates lack a full window and are left out of the result
/// rather than reported as zero.
pub fn compute_rolling_volatility(
    returns: &ReturnSeries,
    window: usize,
) -> Result<VolatilitySeries, MetricsError> {
    validate_window(window)?;

    let values: Vec<f64> = returns.values().collect();
    let scale = annualization_factor();

    let points = values
        .windows(window)
        .zip(returns.points().iter().skip(window - 1))
        .filter_map(|(slice, point)| {
            std_dev(slice).map(|std| SeriesPoint::new(point.date, std * scale))
        })
        .collect();

    Ok(VolatilitySeries::from_ordered(points))
}

/// Deepest fall of cumulative performance below its running peak.
///
/// Single pass with constant state. The result is never positive; empty and
/// single-point series return `0.0`.
#[must_use]
pub fn compute_max_drawdown(cumulative: &CumulativeSeries) -> f64 {
    let mut values = cumulative.values();
    let Some(first) = values.next() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_drawdown = 0.0_f64;
    for value in values {
        peak = peak.max(value);
        max_drawdown = max_drawdown.min(value - peak);
    }

    max_drawdown
}

/// Check a rolling window length.
pub fn validate_window(window: usize) -> Result<(), MetricsError> {
    if window < MIN_VOLATILITY_WINDOW {
        return Err(MetricsError::InvalidParameter {
            name: "window",
            reason: format!("must be at least {MIN_VOLATILITY_WINDOW}, got {window}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;
    use crate::domain::market_data::PriceBar;

    const EPS: f64 = 1e-12;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
    }

    fn table(closes: &[f64]) -> PriceTable {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, close)| {
                let close = Decimal::try_from(*close).unwrap();
                PriceBar {
                    date: day(i as i64),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: Decimal::ONE_HUNDRED,
                }
            })
            .collect();
        PriceTable::new(bars).unwrap()
    }

    fn returns(values: &[f64]) -> ReturnSeries {
        ReturnSeries::from_pairs(values.iter().enumerate().map(|(i, v)| (day(i as i64), *v)))
            .unwrap()
    }

    fn cumulative(values: &[f64]) -> CumulativeSeries {
        CumulativeSeries::from_pairs(values.iter().enumerate().map(|(i, v)| (day(i as i64), *v)))
            .unwrap()
    }

    #[test]
    fn returns_are_close_to_close_changes() {
        let series = compute_returns(&table(&[100.0, 102.0, 101.0, 105.0]));

        assert_eq!(series.len(), 3);
        let values: Vec<f64> = series.values().collect();
        assert!((values[0] - 0.02).abs() < EPS);
        assert!((values[1] - (101.0 / 102.0 - 1.0)).abs() < EPS);
        assert!((values[2] - (105.0 / 101.0 - 1.0)).abs() < EPS);
        assert_eq!(series.first().map(|p| p.date), Some(day(1)));
    }

    #[test_case(&[] as &[f64] ; "empty table")]
    #[test_case(&[100.0] ; "single row")]
    fn short_tables_give_empty_returns(closes: &[f64]) {
        assert!(compute_returns(&table(closes)).is_empty());
    }

    #[test]
    fn returns_follow_table_order_across_gaps() {
        let bars = [(0, 100), (3, 110)]
            .iter()
            .map(|(offset, close)| {
                let close = Decimal::new(*close, 0);
                PriceBar {
                    date: day(*offset),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: Decimal::ZERO,
                }
            })
            .collect();
        let series = compute_returns(&PriceTable::new(bars).unwrap());

        assert_eq!(series.len(), 1);
        assert_eq!(series.points()[0].date, day(3));
        assert!((series.points()[0].value - 0.1).abs() < EPS);
    }

    #[test]
    fn zero_returns_compound_to_zero() {
        let cum = compute_cumulative_performance(&returns(&[0.0, 0.0, 0.0]));
        assert_eq!(cum.len(), 3);
        assert!(cum.values().all(|v| v == 0.0));
    }

    #[test]
    fn cumulative_final_matches_product() {
        let rs = [0.01, -0.02, 0.03, 0.015, -0.007];
        let expected = rs.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0;

        let cum = compute_cumulative_performance(&returns(&rs));

        let Some(last) = cum.last_value() else {
            panic!("cumulative series should not be empty");
        };
        assert!((last - expected).abs() < EPS);
        assert_eq!(cum.first().map(|p| p.date), Some(day(0)));
    }

    #[test]
    fn cumulative_of_empty_is_empty() {
        assert!(compute_cumulative_performance(&ReturnSeries::empty()).is_empty());
    }

    #[test]
    fn total_loss_compounds_to_minus_one() {
        let cum = compute_cumulative_performance(&returns(&[0.1, -1.0, 0.5]));
        assert!(cum.values().skip(1).all(|v| (v + 1.0).abs() < EPS));
    }

    #[test]
    fn loss_beyond_total_stays_finite() {
        let cum = compute_cumulative_performance(&returns(&[0.1, -1.5, 0.2]));

        let values: Vec<f64> = cum.values().collect();
        assert!(values.iter().all(|v| v.is_finite()));
        assert!((values[0] - 0.1).abs() < EPS);
        assert!((values[1] + 1.55).abs() < EPS);
        assert!((values[2] + 1.66).abs() < EPS);
        assert!((compute_max_drawdown(&cum) + 1.76).abs() < EPS);
    }

    #[test]
    fn returns_survive_decimal_overflow() {
        let bars = [Decimal::new(1, 28), Decimal::new(1_000_000, 0)]
            .iter()
            .enumerate()
            .map(|(i, close)| PriceBar {
                date: day(i as i64),
                open: *close,
                high: *close,
                low: *close,
                close: *close,
                volume: Decimal::ONE,
            })
            .collect();

        let series = compute_returns(&PriceTable::new(bars).unwrap());

        assert_eq!(series.len(), 1);
        let value = series.points()[0].value;
        assert!(value.is_finite());
        assert!(value > 1e33);
    }

    #[test]
    fn price_scenario_ends_five_percent_up() {
        let rets = compute_returns(&table(&[100.0, 102.0, 101.0, 105.0]));
        let cum = compute_cumulative_performance(&rets);

        let Some(last) = cum.last_value() else {
            panic!("cumulative series should not be empty");
        };
        assert!((last - 0.05).abs() < 1e-9);
    }

    #[test]
    fn outperformance_against_itself_is_zero() {
        let rs = returns(&[0.01, -0.03, 0.02]);
        let diff = compute_outperformance(&rs, &rs);

        assert_eq!(diff.len(), 3);
        assert!(diff.values().all(|v| v == 0.0));
    }

    #[test]
    fn outperformance_uses_date_intersection() {
        let asset = ReturnSeries::from_pairs([(day(0), 0.05), (day(1), 0.02), (day(3), 0.01)])
            .unwrap();
        let benchmark =
            ReturnSeries::from_pairs([(day(1), 0.01), (day(2), 0.04), (day(3), 0.03)]).unwrap();

        let diff = compute_outperformance(&asset, &benchmark);

        let dates: Vec<_> = diff.dates().collect();
        assert_eq!(dates, vec![day(1), day(3)]);
        let values: Vec<f64> = diff.values().collect();
        assert!((values[0] - 0.01).abs() < EPS);
        assert!((values[1] + 0.02).abs() < EPS);
    }

    #[test]
    fn outperformance_of_disjoint_series_is_empty() {
        let asset = ReturnSeries::from_pairs([(day(0), 0.01), (day(2), 0.01)]).unwrap();
        let benchmark = ReturnSeries::from_pairs([(day(1), 0.01), (day(3), 0.01)]).unwrap();

        assert!(compute_outperformance(&asset, &benchmark).is_empty());
    }

    #[test]
    fn rolling_volatility_starts_at_full_window() {
        let rs = returns(&[0.01, -0.02, 0.03, 0.01]);
        let vol = compute_rolling_volatility(&rs, 3).unwrap();

        assert_eq!(vol.len(), 2);
        assert_eq!(vol.first().map(|p| p.date), Some(day(2)));

        let window = [0.01, -0.02, 0.03];
        let mean = window.iter().sum::<f64>() / 3.0;
        let var = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 2.0;
        let expected = var.sqrt() * 252.0_f64.sqrt();
        assert!((vol.points()[0].value - expected).abs() < EPS);
    }

    #[test]
    fn rolling_volatility_of_constant_returns_is_zero() {
        let vol = compute_rolling_volatility(&returns(&[0.01; 5]), 2).unwrap();
        assert_eq!(vol.len(), 4);
        assert!(vol.values().all(|v| v.abs() < EPS));
    }

    #[test]
    fn rolling_volatility_short_input_is_empty() {
        let vol = compute_rolling_volatility(&returns(&[0.01, 0.02]), 30).unwrap();
        assert!(vol.is_empty());
    }

    #[test_case(0 ; "zero")]
    #[test_case(1 ; "one")]
    fn rolling_volatility_rejects_small_window(window: usize) {
        let err = compute_rolling_volatility(&returns(&[0.01, 0.02, 0.03]), window).unwrap_err();
        assert!(matches!(
            err,
            MetricsError::InvalidParameter { name: "window", .. }
        ));
    }

    #[test]
    fn drawdown_from_peak_to_trough() {
        let dd = compute_max_drawdown(&cumulative(&[0.0, 0.1, -0.05, 0.2]));
        assert!((dd + 0.15).abs() < EPS);
    }

    #[test_case(&[] as &[f64] ; "empty")]
    #[test_case(&[0.3] ; "single point")]
    #[test_case(&[0.0, 0.01, 0.05, 0.2] ; "increasing")]
    #[test_case(&[0.1, 0.1, 0.1] ; "flat")]
    fn drawdown_is_zero_without_decline(values: &[f64]) {
        assert_eq!(compute_max_drawdown(&cumulative(values)), 0.0);
    }

    #[test]
    fn drawdown_takes_deepest_of_several() {
        let dd = compute_max_drawdown(&cumulative(&[0.0, 0.2, 0.1, 0.3, -0.1, 0.0]));
        assert!((dd + 0.4).abs() < EPS);
    }

    #[test]
    fn annualization_uses_trading_days() {
        assert!((annualization_factor().powi(2) - 252.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn returns_have_one_fewer_point(closes in prop::collection::vec(1.0f64..1_000.0, 2..60)) {
            let t = table(&closes);
            let rets = compute_returns(&t);
            prop_assert_eq!(rets.len(), t.len() - 1);
        }

        #[test]
        fn drawdown_never_positive(rs in prop::collection::vec(-0.2f64..0.2, 0..80)) {
            let cum = compute_cumulative_performance(&returns(&rs));
            prop_assert!(compute_max_drawdown(&cum) <= 0.0);
        }

        #[test]
        fn volatility_length_matches_full_windows(
            rs in prop::collection::vec(-0.1f64..0.1, 0..80),
            window in 2usize..10,
        ) {
            let vol = compute_rolling_volatility(&returns(&rs), window).unwrap();
            prop_assert_eq!(vol.len(), rs.len().saturating_sub(window - 1));
            prop_assert!(vol.values().all(|v| v >= 0.0));
        }
    }
}
