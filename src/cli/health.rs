//! Health command - portfolio overview across every project

use crate::cli::score_with_dependencies;
use crate::config::ConfigStore;
use crate::health::{HealthCategory, HealthScorer};
use crate::reporters::OutputFormat;
use anyhow::{bail, Context, Result};
use chrono::Utc;
use console::style;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct PortfolioRow {
    id: String,
    name: String,
    score: f64,
    category: HealthCategory,
}

/// Run the health command
pub fn run(store: &ConfigStore, format: OutputFormat) -> Result<()> {
    let projects = store
        .projects(&[])
        .context("Could not load the project portfolio")?;

    let today = Utc::now().date_naive();
    let scorer = HealthScorer::with_default_weights();

    let mut rows: Vec<PortfolioRow> = projects
        .iter()
        .map(|(id, project)| {
            let score = score_with_dependencies(store, &scorer, project, today);
            PortfolioRow {
                id: id.clone(),
                name: project.name.clone(),
                score: score.overall,
                category: score.category,
            }
        })
        .collect();
    // Worst health first: that's what a portfolio review looks at.
    rows.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal));

    match format {
        OutputFormat::Text => {
            println!("\nPortfolio health ({} projects)\n", rows.len());
            for row in &rows {
                let category = match row.category {
                    HealthCategory::Excellent | HealthCategory::Good => {
                        style(row.category).green()
                    }
                    HealthCategory::Fair => style(row.category).yellow(),
                    _ => style(row.category).red(),
                };
                println!(
                    "  {:<20} {:.2}  {:<10} {}",
                    row.id,
                    row.score,
                    category,
                    style(&row.name).dim()
                );
            }
            println!();
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Markdown => {
            bail!("The portfolio overview supports text and json output only")
        }
    }
    Ok(())
}
