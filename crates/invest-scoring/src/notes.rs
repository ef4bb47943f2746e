//! Strength and concern wording.

use invest_metrics::MetricId;

use crate::report::{Note, NoteKind};

/// Points above which a metric is listed as a strength.
pub const STRENGTH_BAR: f64 = 80.0;
/// Points below which a metric is listed as a concern.
pub const CONCERN_BAR: f64 = 25.0;

/// Builds the note for a metric's points, if they cross either bar.
pub(crate) fn note_for(metric: MetricId, value: f64, points: f64) -> Option<Note> {
    let kind = if points > STRENGTH_BAR {
        NoteKind::Strength
    } else if points < CONCERN_BAR {
        NoteKind::Concern
    } else {
        return None;
    };

    let (strength, concern) = phrases(metric);
    let phrase = match kind {
        NoteKind::Strength => strength,
        NoteKind::Concern => concern,
    };

    Some(Note {
        kind,
        metric,
        text: format!("{phrase} ({} {})", metric.label(), metric.format_value(value)),
    })
}

const fn phrases(metric: MetricId) -> (&'static str, &'static str) {
    match metric {
        MetricId::NetMargin => ("Strong profit margins", "Thin or negative profit margins"),
        MetricId::GrossMargin => ("High gross margin", "Low gross margin"),
        MetricId::OperatingMargin => ("Efficient operations", "Weak operating margin"),
        MetricId::ReturnOnEquity => ("Exceptional return on equity", "Poor return on equity"),
        MetricId::ReturnOnAssets => ("Productive asset base", "Low return on assets"),
        MetricId::RevenueGrowth => ("High revenue growth rate", "Declining revenues"),
        MetricId::EarningsGrowth => ("Rapid earnings growth", "Shrinking earnings"),
        MetricId::RevenueCagr => ("Sustained revenue compounding", "Weak long-run revenue growth"),
        MetricId::EarningsCagr => {
            ("Sustained earnings compounding", "Weak long-run earnings growth")
        }
        MetricId::PriceToEarnings => ("Attractive earnings multiple", "Expensive or loss-making on earnings"),
        MetricId::PriceToBook => ("Priced close to book value", "Rich valuation versus book"),
        MetricId::PriceToSales => ("Modest price to sales", "Rich valuation versus sales"),
        MetricId::EvToEbitda => ("Cheap on EV/EBITDA", "Expensive on EV/EBITDA"),
        MetricId::DebtToEquity => ("Low debt levels", "High debt levels relative to equity"),
        MetricId::FreeCashFlow => ("Positive free cash flow", "Negative free cash flow"),
        MetricId::CashFlowQuality => {
            ("Excellent cash flow generation", "Earnings not backed by operating cash flow")
        }
        MetricId::DebtToEbitda => ("Debt easily serviced from EBITDA", "Heavy debt relative to EBITDA"),
        MetricId::CurrentRatio => ("Strong liquidity position", "Liquidity concerns"),
        MetricId::QuickRatio => ("Ample liquid assets", "Thin liquid assets"),
        MetricId::InterestCoverage => ("Interest comfortably covered", "Weak interest coverage"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars_are_exclusive() {
        assert!(note_for(MetricId::CurrentRatio, 2.0, STRENGTH_BAR).is_none());
        assert!(note_for(MetricId::CurrentRatio, 0.9, CONCERN_BAR).is_none());
        assert!(note_for(MetricId::CurrentRatio, 1.2, 50.0).is_none());
    }

    #[test]
    fn test_note_text_includes_value() {
        let note = note_for(MetricId::ReturnOnEquity, 0.25, 100.0).unwrap();
        assert_eq!(note.kind, NoteKind::Strength);
        assert_eq!(note.text, "Exceptional return on equity (Return on equity 25.0%)");

        let note = note_for(MetricId::FreeCashFlow, -4_200_000.0, 0.0).unwrap();
        assert_eq!(note.kind, NoteKind::Concern);
        assert_eq!(note.text, "Negative free cash flow (Free cash flow -$4.20M)");
    }
}
