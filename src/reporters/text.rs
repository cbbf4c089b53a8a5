//! Terminal text reporter

use crate::health::HealthCategory;
use crate::reporters::StatusReport;
use anyhow::Result;
use console::style;

/// Render report as colored terminal text
pub fn render(report: &StatusReport) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{} ({})\n",
        style(&report.project_name).bold(),
        report.project_id
    ));
    out.push_str(&format!("  Status:   {}\n", report.status));
    out.push_str(&format!(
        "  Health:   {} ({})\n",
        style(format!("{:.2}", report.score.overall)).bold(),
        styled_category(report.score.category)
    ));

    out.push_str("\n  Components:\n");
    for component in &report.score.components {
        out.push_str(&format!(
            "    {:<14} {:.2} x {:.2} = {:.3}\n",
            component.name, component.raw, component.weight, component.weighted
        ));
    }

    if let Some(trend) = &report.trend {
        out.push_str(&format!(
            "\n  Trend:    {} (slope {:+.3}, confidence {:.0}%)\n",
            trend.direction,
            trend.slope,
            trend.confidence * 100.0
        ));
    }

    if report.risks.is_empty() {
        out.push_str(&format!("\n  {} No risks flagged\n", style("[OK]").green()));
    } else {
        out.push_str("\n  Risks:\n");
        for risk in &report.risks {
            out.push_str(&format!(
                "    {} {} ({}/{}): {}\n",
                style("[!]").red(),
                style(&risk.title).bold(),
                risk.severity,
                risk.likelihood,
                risk.description
            ));
            for mitigation in &risk.mitigations {
                out.push_str(&format!("        - {mitigation}\n"));
            }
        }
    }

    out.push_str(&format!("\n  Generated {}\n", report.generated_on));
    Ok(out)
}

fn styled_category(category: HealthCategory) -> String {
    match category {
        HealthCategory::Excellent | HealthCategory::Good => {
            style(category).green().to_string()
        }
        HealthCategory::Fair => style(category).yellow().to_string(),
        HealthCategory::Poor => style(category).red().to_string(),
        HealthCategory::Critical => style(category).red().bold().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_text_contains_components() {
        let rendered = render(&test_report()).unwrap();
        for name in ["timeline", "activity", "blockers", "dependencies"] {
            assert!(rendered.contains(name), "missing component {name}");
        }
    }

    #[test]
    fn test_text_lists_risks() {
        let rendered = render(&test_report()).unwrap();
        assert!(rendered.contains("Open blockers"));
        assert!(rendered.contains("Escalate"));
    }
}
