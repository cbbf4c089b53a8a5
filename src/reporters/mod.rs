//! Output reporters for status reports
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON
//! - `markdown` - GitHub-flavored Markdown for wikis and PR comments

mod json;
mod markdown;
mod text;

use crate::health::{HealthScore, Risk, TrendAnalysis};
use crate::models::ProjectStatus;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Everything one rendered status update needs
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub project_id: String,
    pub project_name: String,
    pub status: ProjectStatus,
    pub score: HealthScore,
    pub trend: Option<TrendAnalysis>,
    pub risks: Vec<Risk>,
    pub generated_on: NaiveDate,
}

/// Render a status report in the specified format
pub fn render(report: &StatusReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
        OutputFormat::Markdown => markdown::render(report),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::health::{HealthScorer, Likelihood, ProjectSignals, Risk, RiskSeverity};

    pub(crate) fn test_report() -> StatusReport {
        let scorer = HealthScorer::with_default_weights();
        let score = scorer.score(&ProjectSignals::default(), test_date());
        StatusReport {
            project_id: "search".to_string(),
            project_name: "Search revamp".to_string(),
            status: ProjectStatus::Active,
            score,
            trend: None,
            risks: vec![Risk::new(
                "Open blockers",
                "3 blockers are currently open",
                RiskSeverity::Medium,
                Likelihood::Certain,
                vec!["Escalate".to_string()],
            )],
            generated_on: test_date(),
        }
    }

    pub(crate) fn test_date() -> NaiveDate {
        "2026-08-01".parse().unwrap()
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("MD").unwrap(), OutputFormat::Markdown);
        assert!(OutputFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_render_dispatch() {
        let report = test_report();
        for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Markdown] {
            let rendered = render(&report, format).unwrap();
            assert!(rendered.contains("Search revamp"), "{format} output");
        }
    }
}
