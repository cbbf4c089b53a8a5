//! Signal input for the health scorer
//!
//! Every category is optional so callers can score with whatever data
//! they have; missing categories fall back to explicit defaults inside
//! the scorer rather than being guessed at here.

use crate::models::{ActivityCounts, Blocker, Milestone, Project};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Signal bag for one project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSignals {
    pub milestones: Option<Vec<Milestone>>,
    pub activity: Option<ActivityCounts>,
    /// Baseline for the activity ratio; scorer default applies when unset
    pub activity_baseline: Option<f64>,
    pub blockers: Option<Vec<Blocker>>,
    /// Overall health of upstream dependencies, one entry per dependency
    pub dependency_scores: Option<Vec<f64>>,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
}

impl ProjectSignals {
    /// Lift the scoring-relevant fields out of a project record.
    ///
    /// Dependency scores are left unset: they are the *other* projects'
    /// overall scores, which only the caller can supply.
    pub fn from_project(project: &Project) -> Self {
        Self {
            milestones: Some(project.milestones.clone()),
            activity: project.activity,
            activity_baseline: project.activity_baseline,
            blockers: Some(project.blockers.clone()),
            dependency_scores: None,
            start_date: project.start_date,
            target_date: project.target_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_project_leaves_dependencies_unset() {
        let project = Project {
            dependencies: vec!["auth".to_string()],
            ..Default::default()
        };
        let signals = ProjectSignals::from_project(&project);
        assert!(signals.dependency_scores.is_none());
        assert_eq!(signals.milestones.as_deref(), Some(&[][..]));
    }
}
