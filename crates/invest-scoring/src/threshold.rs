//! Piecewise threshold tables mapping a metric value to points.

use invest_metrics::MetricId;
use serde::Serialize;

/// Which side of a boundary earns the points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Bands are checked with `value > boundary`, boundaries descending.
    HigherIsBetter,
    /// Bands are checked with `value < boundary`, boundaries ascending.
    LowerIsBetter,
}

/// Ordered `(boundary, points)` bands with a floor.
///
/// Lookup walks the bands in order and returns the points of the first band the
/// value clears. A value that clears none earns `floor`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ThresholdTable {
    direction: Direction,
    bands: &'static [(f64, f64)],
    floor: f64,
    valid_above: Option<f64>,
}

impl ThresholdTable {
    /// Table where larger values score better.
    #[must_use]
    pub const fn higher_is_better(bands: &'static [(f64, f64)]) -> Self {
        Self { direction: Direction::HigherIsBetter, bands, floor: 0.0, valid_above: None }
    }

    /// Table where smaller values score better.
    #[must_use]
    pub const fn lower_is_better(bands: &'static [(f64, f64)]) -> Self {
        Self { direction: Direction::LowerIsBetter, bands, floor: 0.0, valid_above: None }
    }

    /// Points earned when no band is cleared.
    #[must_use]
    pub const fn with_floor(mut self, floor: f64) -> Self {
        self.floor = floor;
        self
    }

    /// Values at or below `bound` earn zero points regardless of the bands.
    ///
    /// Used for multiples where a non-positive value is itself a bad sign, such as
    /// a P/E computed from a loss.
    #[must_use]
    pub const fn valid_above(mut self, bound: f64) -> Self {
        self.valid_above = Some(bound);
        self
    }

    /// The lookup direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// The ordered bands.
    #[must_use]
    pub const fn bands(&self) -> &'static [(f64, f64)] {
        self.bands
    }

    /// Maps a value to points in `[0, 100]`.
    #[must_use]
    pub fn points(&self, value: f64) -> f64 {
        if let Some(bound) = self.valid_above {
            if value <= bound {
                return 0.0;
            }
        }

        let clears = |boundary: f64| match self.direction {
            Direction::HigherIsBetter => value > boundary,
            Direction::LowerIsBetter => value < boundary,
        };

        self.bands
            .iter()
            .find(|(boundary, _)| clears(*boundary))
            .map_or(self.floor, |(_, points)| *points)
            .clamp(0.0, 100.0)
    }
}

const NET_MARGIN: ThresholdTable =
    ThresholdTable::higher_is_better(&[(0.20, 100.0), (0.10, 70.0), (0.05, 40.0), (0.0, 20.0)]);
const GROSS_MARGIN: ThresholdTable =
    ThresholdTable::higher_is_better(&[(0.50, 100.0), (0.30, 70.0), (0.20, 40.0), (0.0, 15.0)]);
const OPERATING_MARGIN: ThresholdTable =
    ThresholdTable::higher_is_better(&[(0.25, 100.0), (0.15, 75.0), (0.08, 50.0), (0.0, 25.0)]);
const RETURN_ON_EQUITY: ThresholdTable =
    ThresholdTable::higher_is_better(&[(0.20, 100.0), (0.15, 75.0), (0.10, 50.0), (0.0, 20.0)]);
const RETURN_ON_ASSETS: ThresholdTable =
    ThresholdTable::higher_is_better(&[(0.10, 100.0), (0.07, 75.0), (0.04, 50.0), (0.0, 20.0)]);

const PERIOD_GROWTH: ThresholdTable =
    ThresholdTable::higher_is_better(&[(0.20, 100.0), (0.10, 70.0), (0.05, 40.0), (0.0, 20.0)]);
const COMPOUND_GROWTH: ThresholdTable =
    ThresholdTable::higher_is_better(&[(0.15, 100.0), (0.08, 70.0), (0.03, 40.0), (0.0, 20.0)]);

const PRICE_TO_EARNINGS: ThresholdTable =
    ThresholdTable::lower_is_better(&[(15.0, 100.0), (25.0, 70.0), (35.0, 40.0)])
        .with_floor(20.0)
        .valid_above(0.0);
const PRICE_TO_BOOK: ThresholdTable =
    ThresholdTable::lower_is_better(&[(2.0, 100.0), (4.0, 67.0), (6.0, 33.0)]).valid_above(0.0);
const PRICE_TO_SALES: ThresholdTable =
    ThresholdTable::lower_is_better(&[(2.0, 100.0), (4.0, 50.0), (8.0, 25.0)]).valid_above(0.0);
const EV_TO_EBITDA: ThresholdTable =
    ThresholdTable::lower_is_better(&[(10.0, 100.0), (15.0, 70.0), (20.0, 40.0)])
        .with_floor(10.0)
        .valid_above(0.0);

const DEBT_TO_EQUITY: ThresholdTable =
    ThresholdTable::lower_is_better(&[(0.5, 100.0), (1.0, 75.0), (2.0, 40.0)]);
const FREE_CASH_FLOW: ThresholdTable = ThresholdTable::higher_is_better(&[(0.0, 100.0)]);
const CASH_FLOW_QUALITY: ThresholdTable =
    ThresholdTable::higher_is_better(&[(1.2, 100.0), (1.0, 75.0), (0.8, 50.0)]);
const DEBT_TO_EBITDA: ThresholdTable =
    ThresholdTable::lower_is_better(&[(1.0, 100.0), (2.0, 75.0), (3.0, 50.0), (4.0, 25.0)]);

const CURRENT_RATIO: ThresholdTable =
    ThresholdTable::higher_is_better(&[(2.0, 100.0), (1.5, 75.0), (1.0, 50.0)]);
const QUICK_RATIO: ThresholdTable =
    ThresholdTable::higher_is_better(&[(1.5, 100.0), (1.0, 67.0), (0.75, 33.0)]);
const INTEREST_COVERAGE: ThresholdTable =
    ThresholdTable::higher_is_better(&[(10.0, 100.0), (5.0, 67.0), (2.0, 33.0)]);

/// The threshold table used to score a metric.
#[must_use]
pub const fn table_for(id: MetricId) -> ThresholdTable {
    match id {
        MetricId::NetMargin => NET_MARGIN,
        MetricId::GrossMargin => GROSS_MARGIN,
        MetricId::OperatingMargin => OPERATING_MARGIN,
        MetricId::ReturnOnEquity => RETURN_ON_EQUITY,
        MetricId::ReturnOnAssets => RETURN_ON_ASSETS,
        MetricId::RevenueGrowth | MetricId::EarningsGrowth => PERIOD_GROWTH,
        MetricId::RevenueCagr | MetricId::EarningsCagr => COMPOUND_GROWTH,
        MetricId::PriceToEarnings => PRICE_TO_EARNINGS,
        MetricId::PriceToBook => PRICE_TO_BOOK,
        MetricId::PriceToSales => PRICE_TO_SALES,
        MetricId::EvToEbitda => EV_TO_EBITDA,
        MetricId::DebtToEquity => DEBT_TO_EQUITY,
        MetricId::FreeCashFlow => FREE_CASH_FLOW,
        MetricId::CashFlowQuality => CASH_FLOW_QUALITY,
        MetricId::DebtToEbitda => DEBT_TO_EBITDA,
        MetricId::CurrentRatio => CURRENT_RATIO,
        MetricId::QuickRatio => QUICK_RATIO,
        MetricId::InterestCoverage => INTEREST_COVERAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invest_metrics::{Category, MetricsRecord};

    #[test]
    fn test_higher_is_better_boundaries_are_strict() {
        assert_eq!(NET_MARGIN.points(0.25), 100.0);
        assert_eq!(NET_MARGIN.points(0.20), 70.0);
        assert_eq!(NET_MARGIN.points(0.07), 40.0);
        assert_eq!(NET_MARGIN.points(0.01), 20.0);
        assert_eq!(NET_MARGIN.points(0.0), 0.0);
        assert_eq!(NET_MARGIN.points(-0.3), 0.0);
    }

    #[test]
    fn test_lower_is_better_with_floor() {
        assert_eq!(PRICE_TO_EARNINGS.points(14.9), 100.0);
        assert_eq!(PRICE_TO_EARNINGS.points(15.0), 70.0);
        assert_eq!(PRICE_TO_EARNINGS.points(30.0), 40.0);
        assert_eq!(PRICE_TO_EARNINGS.points(80.0), 20.0);
    }

    #[test]
    fn test_negative_pe_scores_zero() {
        assert_eq!(PRICE_TO_EARNINGS.points(-20.0), 0.0);
        assert_eq!(PRICE_TO_EARNINGS.points(0.0), 0.0);
    }

    #[test]
    fn test_free_cash_flow_sign() {
        assert_eq!(FREE_CASH_FLOW.points(1.0e9), 100.0);
        assert_eq!(FREE_CASH_FLOW.points(-1.0), 0.0);
    }

    #[test]
    fn test_bands_are_ordered() {
        let record = MetricsRecord::default();
        for category in Category::ALL {
            for (id, _) in record.category(category) {
                let table = table_for(id);
                let ordered = table.bands().windows(2).all(|w| match table.direction() {
                    Direction::HigherIsBetter => w[0].0 > w[1].0,
                    Direction::LowerIsBetter => w[0].0 < w[1].0,
                });
                assert!(ordered, "bands for {id} out of order");
                assert!(table.bands().iter().all(|(_, p)| (0.0..=100.0).contains(p)));
            }
        }
    }
}
