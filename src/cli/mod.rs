//! CLI command definitions and handlers

mod config;
mod health;
mod init;
mod risks;
mod status;
mod sync;
mod trend;

use crate::config::ConfigStore;
use crate::health::{HealthScore, HealthScorer, ProjectSignals};
use crate::models::Project;
use crate::reporters::OutputFormat;
use crate::settings::Settings;
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

/// Steward - portfolio-aware project health
///
/// 100% LOCAL - your portfolio data never leaves the config root.
#[derive(Parser, Debug)]
#[command(name = "steward", version, about)]
pub struct Cli {
    /// Config root directory holding the YAML documents
    #[arg(long, global = true, env = "STEWARD_ROOT")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold a config root with example documents
    Init,

    /// Health report for one project
    Status {
        /// Project record ID
        project: String,

        /// Output format: text, json, markdown
        #[arg(long, short)]
        format: Option<String>,

        /// Append today's score to the project's history
        #[arg(long)]
        record: bool,
    },

    /// Portfolio overview: every project's score and category
    Health {
        /// Output format: text, json
        #[arg(long, short)]
        format: Option<String>,
    },

    /// Score trend for one project from its recorded history
    Trend {
        /// Project record ID
        project: String,

        /// Only use history from the last N days
        #[arg(long)]
        window: Option<i64>,
    },

    /// Ranked risk list for one project
    Risks {
        /// Project record ID
        project: String,
    },

    /// Read or patch individual records
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Cross-document sync: project summaries and stakeholder profiles
    Sync {
        /// Limit summary sync to one project
        project: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print one record as YAML
    Get { kind: String, id: String },

    /// Set one field on one record
    Set {
        kind: String,
        id: String,
        field: String,
        value: String,
    },
}

/// Parse CLI args, resolve settings, and dispatch to a command handler.
pub fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load()?;
    let root = cli
        .root
        .clone()
        .unwrap_or_else(|| settings.root_or_default());
    let store = ConfigStore::new(root);

    match cli.command {
        Commands::Init => init::run(store.root()),
        Commands::Status {
            project,
            format,
            record,
        } => status::run(&store, &project, resolve_format(format, &settings)?, record),
        Commands::Health { format } => health::run(&store, resolve_format(format, &settings)?),
        Commands::Trend { project, window } => trend::run(
            &store,
            &project,
            window.unwrap_or_else(|| settings.trend_window_or_default()),
        ),
        Commands::Risks { project } => risks::run(&store, &project),
        Commands::Config { action } => config::run(&store, action),
        Commands::Sync { project } => sync::run(&store, project.as_deref()),
    }
}

/// CLI flag beats user settings beats the text default.
fn resolve_format(flag: Option<String>, settings: &Settings) -> Result<OutputFormat> {
    match flag.or_else(|| settings.format.clone()) {
        Some(s) => OutputFormat::from_str(&s),
        None => Ok(OutputFormat::Text),
    }
}

/// Score a project, folding in one level of upstream dependency health.
///
/// Each dependency is scored from its own record; a missing dependency
/// record is skipped with a warning rather than failing the report.
pub(crate) fn score_with_dependencies(
    store: &ConfigStore,
    scorer: &HealthScorer,
    project: &Project,
    as_of: NaiveDate,
) -> HealthScore {
    let mut signals = ProjectSignals::from_project(project);
    if !project.dependencies.is_empty() {
        let mut scores = Vec::new();
        for dep_id in &project.dependencies {
            match store.project(dep_id) {
                Ok(dependency) => {
                    let dep_signals = ProjectSignals::from_project(&dependency);
                    scores.push(scorer.score(&dep_signals, as_of).overall);
                }
                Err(err) => warn!("skipping dependency {dep_id}: {err}"),
            }
        }
        if !scores.is_empty() {
            signals.dependency_scores = Some(scores);
        }
    }
    scorer.score(&signals, as_of)
}
