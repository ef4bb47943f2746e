//! The investment scorer.

use invest_core::{InvestError, Result};
use invest_metrics::{Category, MetricsRecord};

use crate::{
    config::ScoringConfig,
    notes::note_for,
    report::{CategoryScore, MetricScore, Note, NoteKind, Recommendation, ScoreReport},
    threshold::table_for,
};

/// Scores a [`MetricsRecord`] into a [`ScoreReport`].
///
/// Each available metric earns points from its threshold table, a category scores
/// the mean points of its available metrics, and the total weighs the available
/// categories with their base weights renormalized to sum to 1. Unavailable
/// metrics and categories are left out, never counted as zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct InvestmentScorer {
    config: ScoringConfig,
}

/// A category scored before weights are known.
struct Partial {
    category: Category,
    mean: Option<f64>,
    metrics: Vec<MetricScore>,
    notes: Vec<Note>,
}

impl InvestmentScorer {
    /// Creates a scorer with the given configuration.
    #[must_use]
    pub const fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// The scorer's configuration.
    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores a metrics record.
    ///
    /// # Errors
    ///
    /// Returns [`InvestError::InvalidInput`] if no category has an available metric,
    /// or if every available category carries zero weight.
    pub fn score(&self, record: &MetricsRecord) -> Result<ScoreReport> {
        let partials: Vec<Partial> = Category::ALL
            .into_iter()
            .map(|category| Self::score_category(record, category))
            .collect();

        if partials.iter().all(|p| p.mean.is_none()) {
            return Err(InvestError::InvalidInput(format!(
                "no metric category could be computed for {}",
                record.symbol
            )));
        }

        let weights = self.config.weights();
        let available_weight: f64 = partials
            .iter()
            .filter(|p| p.mean.is_some())
            .map(|p| weights.get(p.category))
            .sum();
        if available_weight <= 0.0 {
            return Err(InvestError::InvalidInput(format!(
                "available categories for {} carry no weight",
                record.symbol
            )));
        }

        let mut total = 0.0_f64;
        let mut moat_inputs = Vec::with_capacity(2);
        let mut categories = Vec::with_capacity(partials.len());
        for partial in partials {
            let base_weight = weights.get(partial.category);
            let weight = match partial.mean {
                Some(mean) => {
                    let weight = base_weight / available_weight;
                    total += mean * weight;
                    if matches!(partial.category, Category::Profitability | Category::Quality) {
                        moat_inputs.push(mean);
                    }
                    weight
                }
                None => 0.0,
            };
            categories.push(CategoryScore {
                category: partial.category,
                score: partial.mean.map(round2),
                base_weight,
                weight,
                metrics: partial.metrics,
                notes: partial.notes,
            });
        }

        let total = round2(total.clamp(0.0, 100.0));
        let recommendation =
            Recommendation::from_score(total, self.config.buy_cutoff(), self.config.hold_cutoff());

        let notes_of = |kind: NoteKind| -> Vec<String> {
            categories
                .iter()
                .flat_map(|c| c.notes.iter())
                .filter(|n| n.kind == kind)
                .map(|n| n.text.clone())
                .collect()
        };
        let strengths = notes_of(NoteKind::Strength);
        let concerns = notes_of(NoteKind::Concern);

        Ok(ScoreReport {
            symbol: record.symbol.clone(),
            company_name: record.company_name.clone(),
            sector: record.sector.clone(),
            total,
            recommendation,
            categories,
            strengths,
            risk_flags: concerns.clone(),
            concerns,
            moat: moat_estimate(&moat_inputs),
            thesis_broken: false,
        })
    }

    fn score_category(record: &MetricsRecord, category: Category) -> Partial {
        let mut metrics = Vec::new();
        let mut notes = Vec::new();
        let mut sum = 0.0;
        let mut count = 0_usize;

        for (id, value) in record.category(category) {
            let points = value.value().map(|v| {
                let points = table_for(id).points(v);
                if let Some(note) = note_for(id, v, points) {
                    notes.push(note);
                }
                sum += points;
                count += 1;
                points
            });
            metrics.push(MetricScore { metric: id, value, points });
        }

        Partial {
            category,
            mean: (count > 0).then(|| sum / count as f64),
            metrics,
            notes,
        }
    }
}

/// Mean of the profitability and quality scores on a 0-10 scale.
fn moat_estimate(scores: &[f64]) -> Option<u8> {
    if scores.is_empty() {
        return None;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    Some((mean / 10.0).round().clamp(0.0, 10.0) as u8)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
