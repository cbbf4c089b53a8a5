//! Weighted multi-component health scorer
//!
//! Four component scores (timeline, activity, blockers, dependencies)
//! are computed independently on a 0.0-1.0 scale, multiplied by their
//! weights, and summed into the overall score. Missing signal categories
//! degrade to a neutral default instead of failing; the only hard error
//! is a weight table that does not sum to 1.0, rejected at construction.

use crate::health::signals::ProjectSignals;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Neutral component score used when a signal category is absent
pub(crate) const NEUTRAL_SCORE: f64 = 0.5;

/// Default baseline for the weighted activity ratio
pub(crate) const DEFAULT_ACTIVITY_BASELINE: f64 = 20.0;

/// Tolerance when checking that component weights sum to 1.0
const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Component weights failed validation at scorer construction
#[derive(Debug, thiserror::Error)]
#[error("component weights must sum to 1.0 +/- {tolerance} (got {sum:.3})")]
pub struct WeightsError {
    pub sum: f64,
    pub tolerance: f64,
}

/// Per-component weights; must sum to 1.0 within tolerance
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComponentWeights {
    pub timeline: f64,
    pub activity: f64,
    pub blockers: f64,
    pub dependencies: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            timeline: 0.30,
            activity: 0.25,
            blockers: 0.25,
            dependencies: 0.20,
        }
    }
}

impl ComponentWeights {
    fn sum(&self) -> f64 {
        self.timeline + self.activity + self.blockers + self.dependencies
    }

    /// Reject weight tables that do not sum to 1.0 within tolerance.
    pub fn validate(&self) -> Result<(), WeightsError> {
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightsError {
                sum,
                tolerance: WEIGHT_SUM_TOLERANCE,
            });
        }
        Ok(())
    }
}

/// Health category buckets derived from the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthCategory {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl HealthCategory {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            HealthCategory::Excellent
        } else if score >= 0.70 {
            HealthCategory::Good
        } else if score >= 0.50 {
            HealthCategory::Fair
        } else if score >= 0.30 {
            HealthCategory::Poor
        } else {
            HealthCategory::Critical
        }
    }
}

impl std::fmt::Display for HealthCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthCategory::Excellent => write!(f, "excellent"),
            HealthCategory::Good => write!(f, "good"),
            HealthCategory::Fair => write!(f, "fair"),
            HealthCategory::Poor => write!(f, "poor"),
            HealthCategory::Critical => write!(f, "critical"),
        }
    }
}

/// One named, weighted contributor to the overall score
#[derive(Debug, Clone, Serialize)]
pub struct ComponentScore {
    pub name: &'static str,
    /// Raw component score, 0.0-1.0
    pub raw: f64,
    pub weight: f64,
    /// raw x weight
    pub weighted: f64,
}

/// Overall health result with the component breakdown kept for audit
#[derive(Debug, Clone, Serialize)]
pub struct HealthScore {
    pub overall: f64,
    pub category: HealthCategory,
    pub components: Vec<ComponentScore>,
}

impl HealthScore {
    pub fn component(&self, name: &str) -> Option<&ComponentScore> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// Deterministic, side-effect-free health scorer.
///
/// Every call is a pure function of its inputs: the reference date is an
/// explicit argument, never read from the system clock inside scoring.
#[derive(Debug, Clone)]
pub struct HealthScorer {
    weights: ComponentWeights,
}

impl HealthScorer {
    /// Weights are validated here so a bad table fails before any
    /// scoring call can produce silently-wrong numbers.
    pub fn new(weights: ComponentWeights) -> Result<Self, WeightsError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ComponentWeights::default(),
        }
    }

    pub fn weights(&self) -> &ComponentWeights {
        &self.weights
    }

    /// Score a project's health from its signal bag as of a given date.
    pub fn score(&self, signals: &ProjectSignals, as_of: NaiveDate) -> HealthScore {
        let timeline = timeline_score(signals, as_of);
        let activity = activity_score(signals);
        let blockers = blocker_score(signals);
        let dependencies = dependency_score(signals);

        debug!(
            "component scores: timeline={timeline:.2} activity={activity:.2} \
             blockers={blockers:.2} dependencies={dependencies:.2}"
        );

        let components = vec![
            component("timeline", timeline, self.weights.timeline),
            component("activity", activity, self.weights.activity),
            component("blockers", blockers, self.weights.blockers),
            component("dependencies", dependencies, self.weights.dependencies),
        ];
        let overall = components.iter().map(|c| c.weighted).sum();

        HealthScore {
            overall,
            category: HealthCategory::from_score(overall),
            components,
        }
    }
}

fn component(name: &'static str, raw: f64, weight: f64) -> ComponentScore {
    ComponentScore {
        name,
        raw,
        weight,
        weighted: raw * weight,
    }
}

/// Completed-milestone fraction over elapsed-time fraction, when both
/// are computable. `None` means the timeline signal is unusable and the
/// component falls back to neutral.
pub(crate) fn timeline_ratio(signals: &ProjectSignals, as_of: NaiveDate) -> Option<f64> {
    let milestones = signals.milestones.as_ref()?;
    if milestones.is_empty() {
        return None;
    }
    let start = signals.start_date?;
    let target = signals.target_date?;
    let total_days = (target - start).num_days();
    if total_days <= 0 {
        return None;
    }

    let completed = milestones
        .iter()
        .filter(|m| m.status == crate::models::MilestoneStatus::Completed)
        .count();
    let completed_fraction = completed as f64 / milestones.len() as f64;

    let elapsed_days = (as_of - start).num_days().clamp(0, total_days);
    let elapsed_fraction = elapsed_days as f64 / total_days as f64;
    if elapsed_fraction <= 0.0 {
        // Before the start date any completed work is ahead of schedule.
        return Some(if completed > 0 { 2.0 } else { 1.0 });
    }

    Some(completed_fraction / elapsed_fraction)
}

fn timeline_score(signals: &ProjectSignals, as_of: NaiveDate) -> f64 {
    match timeline_ratio(signals, as_of) {
        None => NEUTRAL_SCORE,
        Some(ratio) if ratio >= 1.10 => 1.0,
        Some(ratio) if ratio >= 0.95 => 0.9,
        Some(ratio) if ratio >= 0.85 => 0.75,
        Some(ratio) if ratio >= 0.70 => 0.6,
        Some(ratio) if ratio >= 0.50 => 0.4,
        Some(_) => 0.2,
    }
}

pub(crate) fn activity_score(signals: &ProjectSignals) -> f64 {
    let Some(activity) = &signals.activity else {
        return NEUTRAL_SCORE;
    };
    let baseline = signals
        .activity_baseline
        .filter(|b| *b > 0.0)
        .unwrap_or(DEFAULT_ACTIVITY_BASELINE);
    let ratio = activity.weighted() / baseline;
    if ratio >= 1.5 {
        1.0
    } else if ratio >= 0.8 {
        0.8
    } else if ratio >= 0.5 {
        0.5
    } else {
        0.2
    }
}

/// Inverse step function of the open blocker count. No recorded
/// blockers counts as zero: nothing known to be in the way.
pub(crate) fn blocker_score(signals: &ProjectSignals) -> f64 {
    let count = signals.blockers.as_ref().map(Vec::len).unwrap_or(0);
    match count {
        0 => 1.0,
        1..=2 => 0.85,
        3..=5 => 0.65,
        6..=10 => 0.4,
        _ => 0.15,
    }
}

/// Mean of upstream dependency health; no dependencies means nothing to
/// be blocked by, which is full marks.
fn dependency_score(signals: &ProjectSignals) -> f64 {
    match signals.dependency_scores.as_deref() {
        None | Some([]) => 1.0,
        Some(scores) => scores.iter().sum::<f64>() / scores.len() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Milestone, MilestoneStatus};

    fn milestones(completed: usize, total: usize) -> Vec<Milestone> {
        (0..total)
            .map(|i| Milestone {
                name: format!("m{i}"),
                date: None,
                status: if i < completed {
                    MilestoneStatus::Completed
                } else {
                    MilestoneStatus::Planned
                },
            })
            .collect()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let short = ComponentWeights {
            timeline: 0.30,
            activity: 0.25,
            blockers: 0.25,
            dependencies: 0.15,
        };
        assert!(HealthScorer::new(short).is_err());

        let within_tolerance = ComponentWeights {
            timeline: 0.305,
            activity: 0.25,
            blockers: 0.25,
            dependencies: 0.20,
        };
        assert!(HealthScorer::new(within_tolerance).is_ok());
    }

    #[test]
    fn test_empty_signals_score_neutrally() {
        let scorer = HealthScorer::with_default_weights();
        let score = scorer.score(&ProjectSignals::default(), date("2026-08-01"));
        // timeline and activity neutral, blockers and dependencies clean
        assert_eq!(score.component("timeline").unwrap().raw, 0.5);
        assert_eq!(score.component("activity").unwrap().raw, 0.5);
        assert_eq!(score.component("blockers").unwrap().raw, 1.0);
        assert_eq!(score.component("dependencies").unwrap().raw, 1.0);
    }

    #[test]
    fn test_timeline_ratio_half_done_half_elapsed() {
        let signals = ProjectSignals {
            milestones: Some(milestones(2, 4)),
            start_date: Some(date("2026-06-01")),
            target_date: Some(date("2026-10-01")),
            ..Default::default()
        };
        let ratio = timeline_ratio(&signals, date("2026-08-01")).unwrap();
        assert!((ratio - 1.0).abs() < 0.02);
    }

    #[test]
    fn test_timeline_score_monotone_in_completion() {
        // More milestones done, same elapsed time, never scores lower.
        let as_of = date("2026-08-01");
        let mut previous = 0.0;
        for completed in 0..=4 {
            let signals = ProjectSignals {
                milestones: Some(milestones(completed, 4)),
                start_date: Some(date("2026-06-01")),
                target_date: Some(date("2026-10-01")),
                ..Default::default()
            };
            let score = timeline_score(&signals, as_of);
            assert!(
                score >= previous,
                "completed={completed}: {score} < {previous}"
            );
            previous = score;
        }
    }

    #[test]
    fn test_blocker_steps() {
        let blockers = |n: usize| ProjectSignals {
            blockers: Some(vec![Default::default(); n]),
            ..Default::default()
        };
        assert_eq!(blocker_score(&blockers(0)), 1.0);
        assert_eq!(blocker_score(&blockers(2)), 0.85);
        assert_eq!(blocker_score(&blockers(5)), 0.65);
        assert_eq!(blocker_score(&blockers(10)), 0.4);
        assert_eq!(blocker_score(&blockers(11)), 0.15);
    }

    #[test]
    fn test_dependency_mean() {
        let signals = ProjectSignals {
            dependency_scores: Some(vec![0.8, 0.6]),
            ..Default::default()
        };
        let scorer = HealthScorer::with_default_weights();
        let score = scorer.score(&signals, date("2026-08-01"));
        assert!((score.component("dependencies").unwrap().raw - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_activity_ratio_bands() {
        use crate::models::ActivityCounts;
        let with_counts = |commits: u32| ProjectSignals {
            activity: Some(ActivityCounts {
                commits,
                pull_requests: 0,
                issues_closed: 0,
            }),
            ..Default::default()
        };
        // Default baseline is 20.0
        assert_eq!(activity_score(&with_counts(30)), 1.0);
        assert_eq!(activity_score(&with_counts(16)), 0.8);
        assert_eq!(activity_score(&with_counts(10)), 0.5);
        assert_eq!(activity_score(&with_counts(3)), 0.2);
    }
}
