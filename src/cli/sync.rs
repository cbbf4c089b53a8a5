//! Sync command - cross-document best-effort copies

use crate::config::ConfigStore;
use anyhow::{Context, Result};
use console::style;

/// Run the sync command
pub fn run(store: &ConfigStore, project: Option<&str>) -> Result<()> {
    let ids: Vec<String> = match project {
        Some(id) => vec![id.to_string()],
        None => store
            .projects(&[])
            .context("Could not load the project portfolio")?
            .into_iter()
            .map(|(id, _)| id)
            .collect(),
    };

    let mut synced = 0;
    for id in &ids {
        if store
            .sync_project_summary(id)
            .with_context(|| format!("Could not sync summary for '{id}'"))?
        {
            synced += 1;
        }
    }
    if synced > 0 {
        println!("  {} {synced} project summaries updated", style("[OK]").green());
    } else {
        println!(
            "  {} No summaries.yaml in the config root; summary sync skipped",
            style("[--]").dim()
        );
    }

    let propagated = store
        .propagate_team_profiles()
        .context("Could not propagate team roster into stakeholder profiles")?;
    if propagated > 0 {
        println!(
            "  {} {propagated} stakeholder profiles refreshed from the roster",
            style("[OK]").green()
        );
    } else {
        println!("  {} Stakeholder profiles already current", style("[--]").dim());
    }
    Ok(())
}
