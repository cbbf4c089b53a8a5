//! Fixed-rule risk assessment
//!
//! Three rules: schedule slip, open blockers, low activity. Each emits a
//! risk graded by severity and likelihood; the priority scalar exists
//! only to sort the list most-urgent-first. Extending the rule set means
//! adding another branch.

use crate::health::scorer::{activity_score, blocker_score, timeline_ratio, HealthScorer};
use crate::health::signals::ProjectSignals;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Timeline ratios below this emit a schedule risk
const ON_TRACK_RATIO: f64 = 0.85;
/// More open blockers than this emit a blocker risk
const BLOCKER_RISK_THRESHOLD: usize = 2;
/// Activity component scores below this emit an activity risk
const LOW_ACTIVITY_SCORE: f64 = 0.5;

/// Risk severity grades
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskSeverity {
    pub fn weight(&self) -> f64 {
        match self {
            RiskSeverity::Low => 0.25,
            RiskSeverity::Medium => 0.5,
            RiskSeverity::High => 0.75,
            RiskSeverity::Critical => 1.0,
        }
    }
}

impl std::fmt::Display for RiskSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskSeverity::Low => write!(f, "low"),
            RiskSeverity::Medium => write!(f, "medium"),
            RiskSeverity::High => write!(f, "high"),
            RiskSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// How likely a risk is to materialize
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Likelihood {
    Unlikely,
    Possible,
    Likely,
    Certain,
}

impl Likelihood {
    pub fn weight(&self) -> f64 {
        match self {
            Likelihood::Unlikely => 0.25,
            Likelihood::Possible => 0.5,
            Likelihood::Likely => 0.75,
            Likelihood::Certain => 1.0,
        }
    }
}

impl std::fmt::Display for Likelihood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Likelihood::Unlikely => write!(f, "unlikely"),
            Likelihood::Possible => write!(f, "possible"),
            Likelihood::Likely => write!(f, "likely"),
            Likelihood::Certain => write!(f, "certain"),
        }
    }
}

/// One assessed risk with its sort key and suggested mitigations
#[derive(Debug, Clone, Serialize)]
pub struct Risk {
    pub title: String,
    pub description: String,
    pub severity: RiskSeverity,
    pub likelihood: Likelihood,
    /// severity weight x 0.6 + likelihood weight x 0.4; sort key only
    pub priority: f64,
    pub mitigations: Vec<String>,
}

impl Risk {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: RiskSeverity,
        likelihood: Likelihood,
        mitigations: Vec<String>,
    ) -> Self {
        let priority = severity.weight() * 0.6 + likelihood.weight() * 0.4;
        Self {
            title: title.into(),
            description: description.into(),
            severity,
            likelihood,
            priority,
            mitigations,
        }
    }
}

/// Sort risks most-urgent-first: priority, then severity, then title so
/// equal-priority output is deterministic.
pub fn rank_risks(mut risks: Vec<Risk>) -> Vec<Risk> {
    risks.sort_by(|a, b| {
        b.priority
            .partial_cmp(&a.priority)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.severity.cmp(&a.severity))
            .then(a.title.cmp(&b.title))
    });
    risks
}

impl HealthScorer {
    /// Assess the fixed risk rules against a project's signals.
    pub fn assess_risks(&self, signals: &ProjectSignals, as_of: NaiveDate) -> Vec<Risk> {
        let mut risks = Vec::new();

        if let Some(ratio) = timeline_ratio(signals, as_of) {
            if ratio < ON_TRACK_RATIO {
                let severity = if ratio < 0.5 {
                    RiskSeverity::High
                } else {
                    RiskSeverity::Medium
                };
                risks.push(Risk::new(
                    "Schedule slip",
                    format!(
                        "Milestone completion is at {:.0}% of where the elapsed \
                         schedule says it should be",
                        ratio * 100.0
                    ),
                    severity,
                    Likelihood::Likely,
                    vec![
                        "Re-plan remaining milestones against the target date".to_string(),
                        "Cut scope or move the target date".to_string(),
                    ],
                ));
            }
        }

        let blocker_count = signals.blockers.as_ref().map(Vec::len).unwrap_or(0);
        if blocker_count > BLOCKER_RISK_THRESHOLD {
            let severity = if blocker_count > 5 {
                RiskSeverity::High
            } else {
                RiskSeverity::Medium
            };
            risks.push(Risk::new(
                "Open blockers",
                format!("{blocker_count} blockers are currently open"),
                severity,
                Likelihood::Certain,
                vec![
                    "Escalate the oldest blockers to their owners".to_string(),
                    "Review blockers in the next sync".to_string(),
                ],
            ));
        }

        if signals.activity.is_some() && activity_score(signals) < LOW_ACTIVITY_SCORE {
            risks.push(Risk::new(
                "Low activity",
                "Recent commit, PR, and issue volume is well below baseline".to_string(),
                RiskSeverity::Medium,
                Likelihood::Possible,
                vec![
                    "Check whether the team is blocked or reassigned".to_string(),
                    "Confirm the activity baseline still fits the project phase".to_string(),
                ],
            ));
        }

        // Stalled entirely: many blockers on top of a slipping schedule.
        if blocker_count > 5 && blocker_score(signals) <= 0.4 {
            if let Some(ratio) = timeline_ratio(signals, as_of) {
                if ratio < 0.5 {
                    risks.push(Risk::new(
                        "Delivery at risk",
                        "Schedule is far behind while blockers keep accumulating".to_string(),
                        RiskSeverity::Critical,
                        Likelihood::Certain,
                        vec!["Escalate to project sponsor".to_string()],
                    ));
                }
            }
        }

        rank_risks(risks)
    }
}
