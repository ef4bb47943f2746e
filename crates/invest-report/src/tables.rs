//! Tabular views of an [`Analysis`].

use invest_core::{InvestError, Result};
use invest_metrics::Category;
use polars::prelude::*;

use crate::analysis::Analysis;

/// Separator used when a list is flattened into one cell.
pub const LIST_SEPARATOR: &str = "; ";

pub(crate) fn frame_error(err: PolarsError) -> InvestError {
    InvestError::Output(format!("failed to build table: {err}"))
}

/// One row: identity, total, recommendation, category scores, market context
/// the flattened strengths, concerns and risk flags, and the thesis flag.
///
/// # Errors
///
/// Returns [`InvestError::Output`] if the frame cannot be assembled.
pub fn summary_frame(analysis: &Analysis) -> Result<DataFrame> {
    let report = &analysis.report;
    let context = &analysis.context;

    let mut columns = vec![
        Column::new("ticker".into(), [report.symbol.as_str()]),
        Column::new("company".into(), [report.company_name.as_str()]),
        Column::new("sector".into(), [report.sector.as_deref()]),
        Column::new("total_score".into(), [report.total]),
        Column::new("recommendation".into(), [report.recommendation.label()]),
    ];
    for category in Category::ALL {
        columns.push(Column::new(
            category.key().into(),
            [report.category_score(category)],
        ));
    }
    columns.extend([
        Column::new("moat".into(), [report.moat.map(u32::from)]),
        Column::new("price".into(), [context.price]),
        Column::new("year_high".into(), [context.year_high]),
        Column::new("year_low".into(), [context.year_low]),
        Column::new("strengths".into(), [report.strengths.join(LIST_SEPARATOR)]),
        Column::new("concerns".into(), [report.concerns.join(LIST_SEPARATOR)]),
        Column::new("risk_flags".into(), [report.risk_flags.join(LIST_SEPARATOR)]),
        Column::new("thesis_broken".into(), [report.thesis_broken]),
        Column::new("last_updated".into(), [context.fetched_at.to_rfc3339()]),
    ]);

    DataFrame::new(columns).map_err(frame_error)
}

/// One row per metric with its value, display string and points earned.
///
/// # Errors
///
/// Returns [`InvestError::Output`] if the frame cannot be assembled.
pub fn metrics_frame(analysis: &Analysis) -> Result<DataFrame> {
    let rows: Vec<_> = analysis
        .report
        .categories
        .iter()
        .flat_map(|c| c.metrics.iter().map(move |m| (c.category, m)))
        .collect();

    let categories: Vec<&str> = rows.iter().map(|(c, _)| c.key()).collect();
    let keys: Vec<&str> = rows.iter().map(|(_, m)| m.metric.key()).collect();
    let labels: Vec<&str> = rows.iter().map(|(_, m)| m.metric.label()).collect();
    let values: Vec<Option<f64>> = rows.iter().map(|(_, m)| m.value.value()).collect();
    let display: Vec<String> = rows
        .iter()
        .map(|(_, m)| {
            m.value
                .value()
                .map_or_else(|| "n/a".to_string(), |v| m.metric.format_value(v))
        })
        .collect();
    let points: Vec<Option<f64>> = rows.iter().map(|(_, m)| m.points).collect();

    DataFrame::new(vec![
        Column::new("category".into(), categories),
        Column::new("metric".into(), keys),
        Column::new("label".into(), labels),
        Column::new("value".into(), values),
        Column::new("display".into(), display),
        Column::new("points".into(), points),
    ])
    .map_err(frame_error)
}

/// One row per category with its score, weights and notes.
///
/// # Errors
///
/// Returns [`InvestError::Output`] if the frame cannot be assembled.
pub fn scores_frame(analysis: &Analysis) -> Result<DataFrame> {
    let categories = &analysis.report.categories;

    let names: Vec<&str> = categories.iter().map(|c| c.category.label()).collect();
    let scores: Vec<Option<f64>> = categories.iter().map(|c| c.score).collect();
    let base_weights: Vec<f64> = categories.iter().map(|c| c.base_weight).collect();
    let weights: Vec<f64> = categories.iter().map(|c| c.weight).collect();
    let available: Vec<u32> = categories
        .iter()
        .map(|c| u32::try_from(c.available_metrics()).unwrap_or(u32::MAX))
        .collect();
    let notes: Vec<String> = categories
        .iter()
        .map(|c| {
            c.notes
                .iter()
                .map(|n| n.text.as_str())
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR)
        })
        .collect();

    DataFrame::new(vec![
        Column::new("category".into(), names),
        Column::new("score".into(), scores),
        Column::new("base_weight".into(), base_weights),
        Column::new("weight".into(), weights),
        Column::new("available_metrics".into(), available),
        Column::new("notes".into(), notes),
    ])
    .map_err(frame_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures;

    #[test]
    fn test_summary_frame_shape() {
        let df = summary_frame(&fixtures::analysis()).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 19);
        assert!(df.column("thesis_broken").is_ok());
        assert!(df.column("financial_health").is_ok());
        assert_eq!(df.column("growth").unwrap().null_count(), 1);
    }

    #[test]
    fn test_metrics_frame_lists_every_metric() {
        let df = metrics_frame(&fixtures::analysis()).unwrap();
        assert_eq!(df.height(), 20);
        // Five metrics are available in the fixture.
        assert_eq!(df.column("value").unwrap().null_count(), 15);
        assert_eq!(df.column("points").unwrap().null_count(), 15);
    }

    #[test]
    fn test_scores_frame() {
        let df = scores_frame(&fixtures::analysis()).unwrap();
        assert_eq!(df.height(), 5);
        assert_eq!(df.column("score").unwrap().null_count(), 1);
    }
}
