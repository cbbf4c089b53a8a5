//! Init command - scaffold a config root with example documents

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

const PROJECTS_EXAMPLE: &str = r#"# Steward project portfolio
#
# One record per project, keyed by project ID.

projects:
  example:
    name: Example project
    status: active
    priority: medium
    owner: you
    start_date: "2026-01-05"
    target_date: "2026-09-30"
    github_repos: []
    dependencies: []
    milestones:
      - name: Design review
        date: "2026-02-15"
        status: completed
      - name: Beta launch
        date: "2026-06-30"
        status: in_progress
    blockers: []
"#;

const TEAM_EXAMPLE: &str = r#"# Team roster, keyed by member ID.

team:
  you:
    name: Your Name
    role: Engineer
    email: you@example.com
"#;

const STAKEHOLDERS_EXAMPLE: &str = r#"# Stakeholder profiles, keyed by stakeholder ID.
# Name and role are refreshed from the team roster by `steward sync`.

stakeholders:
  you:
    name: Your Name
    role: Engineer
    interests:
      - example
"#;

const DECISIONS_EXAMPLE: &str = r#"# Decision log, keyed by decision ID.

decisions:
  adopt-steward:
    title: Track portfolio health with steward
    status: accepted
    decided_on: "2026-01-05"
"#;

const SUMMARIES_EXAMPLE: &str = r#"# Per-project summaries maintained by `steward sync`.

summaries: {}
"#;

const HISTORY_EXAMPLE: &str = r#"# Score history per project, appended by `steward status --record`.

example: []
"#;

/// Run the init command
pub fn run(root: &Path) -> Result<()> {
    std::fs::create_dir_all(root)
        .with_context(|| format!("Could not create config root {}", root.display()))?;

    let documents = [
        ("projects.yaml", PROJECTS_EXAMPLE),
        ("team.yaml", TEAM_EXAMPLE),
        ("stakeholders.yaml", STAKEHOLDERS_EXAMPLE),
        ("decisions.yaml", DECISIONS_EXAMPLE),
        ("summaries.yaml", SUMMARIES_EXAMPLE),
        ("history.yaml", HISTORY_EXAMPLE),
    ];

    println!("\nInitializing config root {}\n", style(root.display()).cyan());
    for (name, content) in documents {
        let path = root.join(name);
        if path.exists() {
            println!("  {} {} (exists, left untouched)", style("[--]").dim(), name);
            continue;
        }
        std::fs::write(&path, content)
            .with_context(|| format!("Could not write {}", path.display()))?;
        println!("  {} {}", style("[OK]").green(), name);
    }

    println!(
        "\nEdit {} and run {}\n",
        style("projects.yaml").cyan(),
        style("steward status example").cyan()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigStore, DocumentKind};

    #[test]
    fn test_init_creates_valid_documents() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path()).unwrap();

        // Every scaffolded document passes its own schema.
        let store = ConfigStore::new(dir.path());
        for kind in [
            DocumentKind::Projects,
            DocumentKind::Team,
            DocumentKind::Stakeholders,
            DocumentKind::Decisions,
        ] {
            store
                .load_with(kind.file_name(), Some(&kind.schema()), false)
                .unwrap_or_else(|e| panic!("{}: {e}", kind.file_name()));
        }
        assert!(dir.path().join("history.yaml").exists());
    }

    #[test]
    fn test_init_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let projects = dir.path().join("projects.yaml");
        std::fs::write(&projects, "projects: {}\n").unwrap();

        run(dir.path()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&projects).unwrap(),
            "projects: {}\n"
        );
    }
}
