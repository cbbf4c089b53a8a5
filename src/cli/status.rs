//! Status command - health report for one project

use crate::cli::score_with_dependencies;
use crate::config::ConfigStore;
use crate::health::{analyze_trend, HealthScorer, ProjectSignals, TrendPoint};
use crate::models::HistoryEntry;
use crate::reporters::{self, OutputFormat, StatusReport};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde_yaml::Value;

/// Run the status command
pub fn run(store: &ConfigStore, project_id: &str, format: OutputFormat, record: bool) -> Result<()> {
    let project = store
        .project(project_id)
        .with_context(|| format!("Could not load project '{project_id}'"))?;

    let today = Utc::now().date_naive();
    let scorer = HealthScorer::with_default_weights();
    let score = score_with_dependencies(store, &scorer, &project, today);
    let signals = ProjectSignals::from_project(&project);
    let risks = scorer.assess_risks(&signals, today);
    let trend = load_trend(store, project_id);

    let report = StatusReport {
        project_id: project_id.to_string(),
        project_name: project.name.clone(),
        status: project.status,
        score,
        trend,
        risks,
        generated_on: today,
    };

    print!("{}", reporters::render(&report, format)?);

    if record {
        append_history(store, project_id, report.score.overall, today)?;
        eprintln!("Recorded score {:.2} for {project_id}", report.score.overall);
    }
    Ok(())
}

/// Trend from recorded history, if the project has any.
fn load_trend(store: &ConfigStore, project_id: &str) -> Option<crate::health::TrendAnalysis> {
    let history = store.load("history.yaml").ok()?;
    let entries: Vec<HistoryEntry> =
        serde_yaml::from_value(history.get(project_id)?.clone()).ok()?;
    if entries.is_empty() {
        return None;
    }
    let points: Vec<TrendPoint> = entries
        .iter()
        .map(|e| TrendPoint {
            at: e.date,
            value: e.score,
        })
        .collect();
    Some(analyze_trend(&points, 0))
}

/// Append today's score to the project's history list.
///
/// History lists are replaced wholesale by the merge rule, so the update
/// payload carries the full new list. The history document itself is
/// created by `steward init`; updates never create files.
fn append_history(
    store: &ConfigStore,
    project_id: &str,
    score: f64,
    date: NaiveDate,
) -> Result<()> {
    let history = store
        .load("history.yaml")
        .context("No history.yaml in the config root (run `steward init` first)")?;

    let mut entries: Vec<HistoryEntry> = history
        .get(project_id)
        .filter(|v| !v.is_null())
        .cloned()
        .map(serde_yaml::from_value)
        .transpose()
        .context("history.yaml entries are malformed")?
        .unwrap_or_default();
    entries.push(HistoryEntry { date, score });

    let mut payload = serde_yaml::Mapping::new();
    payload.insert(
        Value::String(project_id.to_string()),
        serde_yaml::to_value(&entries)?,
    );
    store.update("history.yaml", &Value::Mapping(payload))?;
    Ok(())
}
