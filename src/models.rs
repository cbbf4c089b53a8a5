//! Core data models for Steward
//!
//! Typed views of the YAML document records: projects with their
//! milestones and blockers, team members, stakeholders, and decisions.
//! The document store itself works on untyped `serde_yaml::Value` trees;
//! these structs are the shapes callers deserialize records into.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Project lifecycle status
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    #[default]
    Active,
    InProgress,
    Completed,
    OnHold,
    Cancelled,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Planning => write!(f, "planning"),
            ProjectStatus::Active => write!(f, "active"),
            ProjectStatus::InProgress => write!(f, "in_progress"),
            ProjectStatus::Completed => write!(f, "completed"),
            ProjectStatus::OnHold => write!(f, "on_hold"),
            ProjectStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Project priority level
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Critical => write!(f, "critical"),
        }
    }
}

/// Milestone completion status
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl std::fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MilestoneStatus::Planned => write!(f, "planned"),
            MilestoneStatus::InProgress => write!(f, "in_progress"),
            MilestoneStatus::Completed => write!(f, "completed"),
            MilestoneStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A single project milestone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Milestone {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub status: MilestoneStatus,
}

/// Recent development activity counts for a project
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ActivityCounts {
    #[serde(default)]
    pub commits: u32,
    #[serde(default)]
    pub pull_requests: u32,
    #[serde(default)]
    pub issues_closed: u32,
}

impl ActivityCounts {
    /// Weighted activity: pull requests count double.
    pub fn weighted(&self) -> f64 {
        self.commits as f64 + 2.0 * self.pull_requests as f64 + self.issues_closed as f64
    }
}

/// An open blocker on a project
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Blocker {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub opened: Option<NaiveDate>,
}

/// A project record from `projects.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub github_repos: Vec<String>,
    /// IDs of upstream projects this one depends on
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub blockers: Vec<Blocker>,
    #[serde(default)]
    pub activity: Option<ActivityCounts>,
    /// Baseline for the activity ratio; falls back to a fixed default
    #[serde(default)]
    pub activity_baseline: Option<f64>,
}

impl Project {
    /// Fraction of milestones completed, if any milestones exist.
    pub fn completed_milestone_fraction(&self) -> Option<f64> {
        if self.milestones.is_empty() {
            return None;
        }
        let completed = self
            .milestones
            .iter()
            .filter(|m| m.status == MilestoneStatus::Completed)
            .count();
        Some(completed as f64 / self.milestones.len() as f64)
    }
}

/// A team roster record from `team.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TeamMember {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A stakeholder profile from `stakeholders.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stakeholder {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// A decision record from `decisions.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Decision {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub decided_on: Option<NaiveDate>,
    #[serde(default)]
    pub context: Option<String>,
}

/// One entry of a project's score history in `history.yaml`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub score: f64,
}
