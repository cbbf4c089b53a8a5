//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Generates reports suitable for wikis, PR comments, and weekly status
//! threads.

use crate::health::HealthCategory;
use crate::reporters::StatusReport;
use anyhow::Result;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &StatusReport) -> Result<String> {
    let mut md = String::new();

    md.push_str(&format!(
        "# {} - {} {:.2} ({})\n\n",
        report.project_name,
        category_emoji(report.score.category),
        report.score.overall,
        report.score.category
    ));
    md.push_str(&format!(
        "_Project `{}`, status `{}`, generated {}_\n\n",
        report.project_id, report.status, report.generated_on
    ));

    md.push_str("## Components\n\n");
    md.push_str("| Component | Score | Weight | Contribution |\n");
    md.push_str("|-----------|-------|--------|-------------|\n");
    for component in &report.score.components {
        md.push_str(&format!(
            "| {} | {:.2} | {:.2} | {:.3} |\n",
            component.name, component.raw, component.weight, component.weighted
        ));
    }
    md.push('\n');

    if let Some(trend) = &report.trend {
        md.push_str("## Trend\n\n");
        md.push_str(&format!(
            "**{}** - slope {:+.3} per observation, confidence {:.0}% \
             over {} data points\n\n",
            trend.direction,
            trend.slope,
            trend.confidence * 100.0,
            trend.points.len()
        ));
    }

    md.push_str("## Risks\n\n");
    if report.risks.is_empty() {
        md.push_str("No risks flagged.\n");
    } else {
        for risk in &report.risks {
            md.push_str(&format!(
                "- **{}** ({}/{}): {}\n",
                risk.title, risk.severity, risk.likelihood, risk.description
            ));
            for mitigation in &risk.mitigations {
                md.push_str(&format!("  - Mitigation: {mitigation}\n"));
            }
        }
    }
    md.push('\n');

    md.push_str("---\n*Generated by steward*\n");
    Ok(md)
}

fn category_emoji(category: HealthCategory) -> &'static str {
    match category {
        HealthCategory::Excellent => "🟢",
        HealthCategory::Good => "🟢",
        HealthCategory::Fair => "🟡",
        HealthCategory::Poor => "🟠",
        HealthCategory::Critical => "🔴",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_markdown_structure() {
        let md = render(&test_report()).unwrap();
        assert!(md.starts_with("# Search revamp"));
        assert!(md.contains("| timeline |"));
        assert!(md.contains("## Risks"));
        assert!(md.contains("**Open blockers**"));
    }

    #[test]
    fn test_markdown_no_risks() {
        let mut report = test_report();
        report.risks.clear();
        let md = render(&report).unwrap();
        assert!(md.contains("No risks flagged."));
    }
}
