//! Plain-text rendering for terminal output.

use std::fmt::Write as _;

use crate::analysis::Analysis;

const RULE_WIDTH: usize = 60;

/// Renders a human-readable report.
#[must_use]
pub fn render_text(analysis: &Analysis) -> String {
    let report = &analysis.report;
    let context = &analysis.context;
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{} ({})", report.company_name, report.symbol);
    if let Some(sector) = &report.sector {
        let _ = writeln!(out, "Sector: {sector}");
    }
    if let Some(price) = context.price {
        let currency = context.currency.as_deref().unwrap_or("");
        let _ = write!(out, "Price: {price:.2} {currency}");
        if let (Some(low), Some(high)) = (context.year_low, context.year_high) {
            let _ = write!(out, "  (52w {low:.2} - {high:.2})");
        }
        out.push('\n');
    }
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Score: {:.2} / 100", report.total);
    let _ = writeln!(out, "Recommendation: {}", report.recommendation);
    if let Some(moat) = report.moat {
        let _ = writeln!(out, "Moat: {moat}/10");
    }
    if report.thesis_broken {
        let _ = writeln!(out, "Thesis: BROKEN");
    }

    out.push_str("\nCategories:\n");
    for category in &report.categories {
        match category.score {
            Some(score) => {
                let _ = writeln!(
                    out,
                    "  {:<18} {score:>6.2}  (weight {:.1}%)",
                    category.category.label(),
                    category.weight * 100.0
                );
            }
            None => {
                let _ = writeln!(out, "  {:<18} {:>6}", category.category.label(), "n/a");
            }
        }
    }

    // Risk flags only get their own section once they diverge from the concerns.
    let flags: &[String] =
        if report.risk_flags == report.concerns { &[] } else { &report.risk_flags };
    for (title, items) in [
        ("Strengths", report.strengths.as_slice()),
        ("Concerns", report.concerns.as_slice()),
        ("Risk flags", flags),
    ] {
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{title}:");
        for item in items {
            let _ = writeln!(out, "  - {item}");
        }
    }

    let _ = writeln!(out, "\nData as of {}", context.fetched_at.format("%Y-%m-%d %H:%M UTC"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures;

    #[test]
    fn test_render_text() {
        let analysis = fixtures::analysis();
        let text = render_text(&analysis);

        assert!(text.contains("Acme Corp (ACME)"));
        assert!(text.contains("Sector: Industrials"));
        assert!(text.contains("(52w 30.00 - 50.00)"));
        assert!(text.contains(&format!("Score: {:.2} / 100", analysis.report.total)));
        assert!(text.contains(analysis.report.recommendation.label()));
        // Growth has no data in the fixture.
        assert!(text.lines().any(|l| l.contains("Growth") && l.ends_with("n/a")));
        assert!(text.contains("Concerns:"));
    }

    #[test]
    fn test_render_text_shows_replaced_risk_flags() {
        let mut analysis = fixtures::analysis();
        assert!(!render_text(&analysis).contains("Risk flags:"));

        analysis.report = analysis
            .report
            .with_risk_flags(["Pending litigation"])
            .with_thesis_broken(true);
        let text = render_text(&analysis);
        assert!(text.contains("Thesis: BROKEN"));
        assert!(text.contains("Risk flags:\n  - Pending litigation"));
    }
}
