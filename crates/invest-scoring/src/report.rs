//! Score report types.

use invest_core::Symbol;
use invest_metrics::{Category, Metric, MetricId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the STRONG BUY and CAUTIOUS bands relative to the BUY and HOLD cutoffs.
pub const BAND_OFFSET: f64 = 10.0;

/// Recommendation band derived from the total score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    /// Total at or above BUY + 10.
    StrongBuy,
    /// Total at or above BUY.
    Buy,
    /// Total at or above HOLD.
    Hold,
    /// Total at or above HOLD - 10.
    Cautious,
    /// Everything below.
    Avoid,
}

impl Recommendation {
    /// Band for a total score given the BUY and HOLD cutoffs.
    #[must_use]
    pub fn from_score(total: f64, buy_cutoff: f64, hold_cutoff: f64) -> Self {
        if total >= buy_cutoff + BAND_OFFSET {
            Self::StrongBuy
        } else if total >= buy_cutoff {
            Self::Buy
        } else if total >= hold_cutoff {
            Self::Hold
        } else if total >= hold_cutoff - BAND_OFFSET {
            Self::Cautious
        } else {
            Self::Avoid
        }
    }

    /// Short label, e.g. `STRONG BUY`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Cautious => "CAUTIOUS",
            Self::Avoid => "AVOID",
        }
    }

    /// One-line explanation of the band.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::StrongBuy => "Excellent investment opportunity",
            Self::Buy => "Good investment with solid fundamentals",
            Self::Hold => "Acceptable investment, monitor closely",
            Self::Cautious => "Weak fundamentals, consider alternatives",
            Self::Avoid => "Poor investment metrics",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.label(), self.description())
    }
}

/// Whether a note praises or flags a metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    /// Points above the strength bar.
    Strength,
    /// Points below the concern bar.
    Concern,
}

/// A qualitative remark about one metric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Strength or concern.
    pub kind: NoteKind,
    /// The metric the note is about.
    pub metric: MetricId,
    /// Human-readable text including the formatted value.
    pub text: String,
}

/// A metric and the points it earned.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricScore {
    /// Metric id.
    pub metric: MetricId,
    /// The metric value.
    pub value: Metric,
    /// Points earned, `None` when the value is unavailable.
    pub points: Option<f64>,
}

/// Score of one category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Category.
    pub category: Category,
    /// Mean points of the available metrics, rounded to two decimals.
    /// `None` when no metric in the category is available.
    pub score: Option<f64>,
    /// Configured base weight.
    pub base_weight: f64,
    /// Weight applied in the total after renormalization. Zero when unavailable.
    pub weight: f64,
    /// Every metric of the category, available or not.
    pub metrics: Vec<MetricScore>,
    /// Strength and concern notes raised by this category.
    pub notes: Vec<Note>,
}

impl CategoryScore {
    /// Returns true if the category has a score.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.score.is_some()
    }

    /// Number of metrics that contributed to the score.
    #[must_use]
    pub fn available_metrics(&self) -> usize {
        self.metrics.iter().filter(|m| m.points.is_some()).count()
    }
}

/// The scored result for one company.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Stock symbol.
    pub symbol: Symbol,
    /// Company name.
    pub company_name: String,
    /// Business sector.
    pub sector: Option<String>,
    /// Weighted total in `[0, 100]`, rounded to two decimals.
    pub total: f64,
    /// Recommendation band for `total`.
    pub recommendation: Recommendation,
    /// One entry per category, in [`Category::ALL`] order.
    pub categories: Vec<CategoryScore>,
    /// Strength texts across all categories.
    pub strengths: Vec<String>,
    /// Concern texts across all categories.
    pub concerns: Vec<String>,
    /// Moat estimate on `0..=10`, from profitability and quality.
    pub moat: Option<u8>,
    /// Risk flags; the concerns unless replaced with [`ScoreReport::with_risk_flags`].
    #[serde(default)]
    pub risk_flags: Vec<String>,
    /// Set when the holding's original thesis no longer applies.
    #[serde(default)]
    pub thesis_broken: bool,
}

impl ScoreReport {
    /// Score entry for a category.
    #[must_use]
    pub fn category(&self, category: Category) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Rounded score of a category, if available.
    #[must_use]
    pub fn category_score(&self, category: Category) -> Option<f64> {
        self.category(category).and_then(|c| c.score)
    }

    /// Number of categories that contributed to the total.
    #[must_use]
    pub fn available_categories(&self) -> usize {
        self.categories.iter().filter(|c| c.is_available()).count()
    }

    /// Replaces the derived risk flags with an analyst's own list.
    #[must_use]
    pub fn with_risk_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.risk_flags = flags.into_iter().map(Into::into).collect();
        self
    }

    /// Marks whether the investment thesis is broken.
    #[must_use]
    pub const fn with_thesis_broken(mut self, broken: bool) -> Self {
        self.thesis_broken = broken;
        self
    }
}
