//! Trend command - fit a trend line through a project's score history

use crate::config::ConfigStore;
use crate::health::{analyze_trend, TrendPoint};
use crate::models::HistoryEntry;
use anyhow::{bail, Context, Result};
use console::style;

/// Run the trend command
pub fn run(store: &ConfigStore, project_id: &str, window_days: i64) -> Result<()> {
    let history = store
        .load("history.yaml")
        .context("No history.yaml in the config root (run `steward init` first)")?;

    let Some(raw) = history.get(project_id).filter(|v| !v.is_null()) else {
        bail!("No history recorded for '{project_id}' (run `steward status {project_id} --record`)")
    };
    let entries: Vec<HistoryEntry> = serde_yaml::from_value(raw.clone())
        .with_context(|| format!("history.yaml entries for '{project_id}' are malformed"))?;

    let points: Vec<TrendPoint> = entries
        .iter()
        .map(|e| TrendPoint {
            at: e.date,
            value: e.score,
        })
        .collect();
    let analysis = analyze_trend(&points, window_days);

    println!(
        "\n{} score trend over the last {} days\n",
        style(project_id).bold(),
        window_days
    );
    println!("  Direction:  {}", style(analysis.direction).bold());
    println!("  Slope:      {:+.4} per observation", analysis.slope);
    println!("  Confidence: {:.0}%", analysis.confidence * 100.0);
    println!("  Data points: {}", analysis.points.len());
    if analysis.points.len() < 2 {
        println!(
            "\n  {} Not enough history for a fit yet; record more scores",
            style("[--]").dim()
        );
    }
    println!();
    Ok(())
}
