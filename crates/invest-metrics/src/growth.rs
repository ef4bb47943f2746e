//! Period-over-period growth and compound annual growth rate.
//!
//! Every function takes its inputs in chronological terms (`previous` before
//! `latest`, `beginning` before `ending`). Callers are responsible for reading
//! statement series through [`StatementSeries::chronological`] first.
//!
//! [`StatementSeries::chronological`]: invest_core::StatementSeries::chronological

use crate::metric::Metric;

/// Growth from `previous` to `latest`: `(latest - previous) / |previous|`.
///
/// Dividing by the absolute value keeps the sign meaningful when the prior
/// period was negative: a loss shrinking from -50 to -25 is +50 %, not -50 %.
/// Unavailable when `previous` is zero or either input is non-finite.
#[must_use]
pub fn growth_rate(previous: f64, latest: f64) -> Metric {
    if !previous.is_finite() || !latest.is_finite() || previous == 0.0 {
        return Metric::Unavailable;
    }
    Metric::new((latest - previous) / previous.abs())
}

/// Compound annual growth rate over `periods` years: `(ending/beginning)^(1/periods) - 1`.
///
/// Unavailable when `beginning` is not strictly positive, `ending` is negative,
/// or `periods` is zero.
#[must_use]
pub fn cagr(beginning: f64, ending: f64, periods: usize) -> Metric {
    compound_rate(beginning, ending, periods as f64)
}

fn compound_rate(beginning: f64, ending: f64, years: f64) -> Metric {
    if years <= 0.0 || !beginning.is_finite() || !ending.is_finite() {
        return Metric::Unavailable;
    }
    if beginning <= 0.0 || ending < 0.0 {
        return Metric::Unavailable;
    }
    Metric::new((ending / beginning).powf(1.0 / years) - 1.0)
}

/// Growth of the newest value against the same period one year earlier.
///
/// `values` is chronological. With annual data this is the latest period
/// against the one before it; with quarterly data (`periods_per_year == 4`)
/// the latest quarter against the same quarter a year back. Unavailable when
/// either end is missing.
#[must_use]
pub fn year_over_year(values: &[Option<f64>], periods_per_year: usize) -> Metric {
    let step = periods_per_year.max(1);
    let Some(latest_idx) = values.len().checked_sub(1) else {
        return Metric::Unavailable;
    };
    let Some(prior_idx) = latest_idx.checked_sub(step) else {
        return Metric::Unavailable;
    };
    match (values[prior_idx], values[latest_idx]) {
        (Some(previous), Some(latest)) => growth_rate(previous, latest),
        _ => Metric::Unavailable,
    }
}

/// CAGR across a chronological window of optional values.
///
/// Uses the oldest and newest periods that carry a value; the period count is
/// their distance in the window, so a gap in the middle does not shorten it.
/// The count is converted to years with `periods_per_year`, which makes the
/// result an annual rate for quarterly windows too.
#[must_use]
pub fn window_cagr(values: &[Option<f64>], periods_per_year: usize) -> Metric {
    let mut present = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.filter(|x| x.is_finite()).map(|x| (i, x)));

    let Some((first_idx, beginning)) = present.next() else {
        return Metric::Unavailable;
    };
    let Some((last_idx, ending)) = present.last() else {
        return Metric::Unavailable;
    };

    let years = (last_idx - first_idx) as f64 / periods_per_year.max(1) as f64;
    compound_rate(beginning, ending, years)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(metric: Metric, expected: f64) -> bool {
        metric.value().is_some_and(|v| (v - expected).abs() < 1e-9)
    }

    #[test]
    fn test_growth_with_negative_prior_period() {
        assert!(approx(growth_rate(-50.0, -25.0), 0.5));
        assert!(approx(growth_rate(-50.0, -75.0), -0.5));
        assert!(approx(growth_rate(100.0, 120.0), 0.2));
        assert!(approx(growth_rate(100.0, 80.0), -0.2));
    }

    #[test]
    fn test_growth_from_zero_is_unavailable() {
        assert_eq!(growth_rate(0.0, 10.0), Metric::Unavailable);
        assert_eq!(growth_rate(f64::NAN, 10.0), Metric::Unavailable);
    }

    #[test]
    fn test_cagr_round_trip() {
        let ending = 100.0 * 1.1_f64.powi(5);
        assert!(approx(cagr(100.0, ending, 5), 0.10));
    }

    #[test]
    fn test_cagr_guards() {
        assert_eq!(cagr(0.0, 100.0, 3), Metric::Unavailable);
        assert_eq!(cagr(-10.0, 100.0, 3), Metric::Unavailable);
        assert_eq!(cagr(100.0, -1.0, 3), Metric::Unavailable);
        assert_eq!(cagr(100.0, 200.0, 0), Metric::Unavailable);
        assert!(approx(cagr(100.0, 0.0, 2), -1.0));
    }

    #[test]
    fn test_window_cagr_spans_gaps() {
        let values = [
            Some(100.0),
            None,
            Some(115.0),
            Some(125.0),
            Some(135.0),
            Some(100.0 * 1.1_f64.powi(5)),
        ];
        assert!(approx(window_cagr(&values, 1), 0.10));

        let values = [None, Some(100.0), None, Some(121.0)];
        assert!(approx(window_cagr(&values, 1), 0.10));
    }

    #[test]
    fn test_window_cagr_needs_two_points() {
        assert_eq!(window_cagr(&[], 1), Metric::Unavailable);
        assert_eq!(window_cagr(&[Some(100.0)], 1), Metric::Unavailable);
        assert_eq!(window_cagr(&[None, Some(100.0), None], 1), Metric::Unavailable);
    }

    #[test]
    fn test_window_cagr_annualizes_quarters() {
        // Eight quarters of 2.5 % growth is two years of 1.025^4 - 1.
        let values: Vec<Option<f64>> = (0..9).map(|i| Some(100.0 * 1.025_f64.powi(i))).collect();
        assert!(approx(window_cagr(&values, 4), 1.025_f64.powi(4) - 1.0));
        assert!(approx(window_cagr(&values, 1), 0.025));
    }

    #[test]
    fn test_year_over_year_steps_back_one_year() {
        let annual = [Some(80.0), Some(100.0)];
        assert!(approx(year_over_year(&annual, 1), 0.25));

        // Latest quarter against the same quarter a year earlier, not the last one.
        let quarters = [Some(100.0), Some(90.0), Some(95.0), Some(110.0), Some(120.0)];
        assert!(approx(year_over_year(&quarters, 4), 0.2));

        assert_eq!(year_over_year(&quarters[1..], 4), Metric::Unavailable);
        assert_eq!(year_over_year(&[], 1), Metric::Unavailable);
        assert_eq!(year_over_year(&[None, Some(100.0)], 1), Metric::Unavailable);
    }
}
