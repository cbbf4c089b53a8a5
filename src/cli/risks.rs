//! Risks command - ranked risk list for one project

use crate::config::ConfigStore;
use crate::health::{HealthScorer, ProjectSignals};
use anyhow::{Context, Result};
use chrono::Utc;
use console::style;

/// Run the risks command
pub fn run(store: &ConfigStore, project_id: &str) -> Result<()> {
    let project = store
        .project(project_id)
        .with_context(|| format!("Could not load project '{project_id}'"))?;

    let scorer = HealthScorer::with_default_weights();
    let signals = ProjectSignals::from_project(&project);
    let risks = scorer.assess_risks(&signals, Utc::now().date_naive());

    if risks.is_empty() {
        println!(
            "\n{} No risks flagged for {}\n",
            style("[OK]").green(),
            style(&project.name).bold()
        );
        return Ok(());
    }

    println!("\nRisks for {} (most urgent first)\n", style(&project.name).bold());
    for risk in &risks {
        println!(
            "  {} {} (priority {:.2}, {}/{})",
            style("[!]").red(),
            style(&risk.title).bold(),
            risk.priority,
            risk.severity,
            risk.likelihood
        );
        println!("      {}", risk.description);
        for mitigation in &risk.mitigations {
            println!("      - {mitigation}");
        }
    }
    println!();
    Ok(())
}
