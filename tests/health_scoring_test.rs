//! Integration tests for health scoring, trend analysis, and risks
//!
//! The worked example here pins the whole pipeline: component formulas,
//! default weights, and category thresholds together.

use chrono::{Duration, NaiveDate};
use steward::health::{
    analyze_trend, ComponentWeights, HealthCategory, HealthScorer, Likelihood, ProjectSignals,
    Risk, RiskSeverity, TrendDirection, TrendPoint,
};
use steward::models::{ActivityCounts, Blocker, Milestone, MilestoneStatus};

fn milestone(status: MilestoneStatus) -> Milestone {
    Milestone {
        name: "m".to_string(),
        date: None,
        status,
    }
}

#[test]
fn test_worked_example_half_done_half_elapsed() {
    // 2 of 4 milestones done, 50% of the schedule elapsed, no blockers,
    // no dependencies, no activity data, default weights.
    let as_of: NaiveDate = "2026-08-01".parse().unwrap();
    let signals = ProjectSignals {
        milestones: Some(vec![
            milestone(MilestoneStatus::Completed),
            milestone(MilestoneStatus::Completed),
            milestone(MilestoneStatus::Planned),
            milestone(MilestoneStatus::Planned),
        ]),
        start_date: Some(as_of - Duration::days(60)),
        target_date: Some(as_of + Duration::days(60)),
        ..Default::default()
    };

    let scorer = HealthScorer::with_default_weights();
    let score = scorer.score(&signals, as_of);

    // ratio 1.0 -> timeline 0.9; activity neutral 0.5; blockers 1.0;
    // dependencies 1.0; overall 0.9*0.30 + 0.5*0.25 + 1.0*0.25 + 1.0*0.20
    assert_eq!(score.component("timeline").unwrap().raw, 0.9);
    assert_eq!(score.component("activity").unwrap().raw, 0.5);
    assert_eq!(score.component("blockers").unwrap().raw, 1.0);
    assert_eq!(score.component("dependencies").unwrap().raw, 1.0);
    assert!((score.overall - 0.845).abs() < 1e-9, "overall {}", score.overall);
    // Just under the 0.85 excellent cutoff.
    assert_eq!(score.category, HealthCategory::Good);
}

#[test]
fn test_weights_invariant_at_construction() {
    let short = ComponentWeights {
        timeline: 0.30,
        activity: 0.25,
        blockers: 0.25,
        dependencies: 0.15,
    };
    let err = HealthScorer::new(short).unwrap_err();
    assert!(err.to_string().contains("sum"), "{err}");

    let exact = ComponentWeights {
        timeline: 0.30,
        activity: 0.25,
        blockers: 0.25,
        dependencies: 0.20,
    };
    assert!(HealthScorer::new(exact).is_ok());

    // Inside the +/- 0.01 tolerance
    let near = ComponentWeights {
        timeline: 0.30,
        activity: 0.25,
        blockers: 0.25,
        dependencies: 0.205,
    };
    assert!(HealthScorer::new(near).is_ok());
}

#[test]
fn test_more_completion_never_scores_lower() {
    let as_of: NaiveDate = "2026-08-01".parse().unwrap();
    let scorer = HealthScorer::with_default_weights();
    let mut previous = 0.0;
    for completed in 0..=10u32 {
        let mut milestones: Vec<Milestone> = (0..completed)
            .map(|_| milestone(MilestoneStatus::Completed))
            .collect();
        milestones.extend((completed..10).map(|_| milestone(MilestoneStatus::Planned)));
        let signals = ProjectSignals {
            milestones: Some(milestones),
            start_date: Some(as_of - Duration::days(30)),
            target_date: Some(as_of + Duration::days(70)),
            ..Default::default()
        };
        let overall = scorer.score(&signals, as_of).overall;
        assert!(overall >= previous, "completed={completed}");
        previous = overall;
    }
}

#[test]
fn test_trend_boundary_scaling() {
    let points: Vec<TrendPoint> = [0.70, 0.71, 0.72, 0.73, 0.74]
        .iter()
        .enumerate()
        .map(|(i, &value)| TrendPoint {
            at: NaiveDate::from_ymd_opt(2026, 7, 1 + i as u32).unwrap(),
            value,
        })
        .collect();
    // Slope 0.01 per observation: inside the stable band.
    assert_eq!(analyze_trend(&points, 90).direction, TrendDirection::Stable);

    let scaled: Vec<TrendPoint> = points
        .iter()
        .map(|p| TrendPoint {
            at: p.at,
            value: p.value * 10.0,
        })
        .collect();
    // Same series scaled: slope 0.1 crosses the band.
    assert_eq!(
        analyze_trend(&scaled, 90).direction,
        TrendDirection::Improving
    );
}

#[test]
fn test_risk_ordering_is_priority_descending() {
    // A far-behind project drowning in blockers: the critical risk must
    // lead the list no matter what order the rules fired in.
    let as_of: NaiveDate = "2026-08-01".parse().unwrap();
    let signals = ProjectSignals {
        milestones: Some(vec![
            milestone(MilestoneStatus::Planned),
            milestone(MilestoneStatus::Planned),
            milestone(MilestoneStatus::Planned),
            milestone(MilestoneStatus::Planned),
        ]),
        start_date: Some(as_of - Duration::days(90)),
        target_date: Some(as_of + Duration::days(10)),
        blockers: Some(vec![Blocker::default(); 7]),
        activity: Some(ActivityCounts::default()),
        ..Default::default()
    };

    let scorer = HealthScorer::with_default_weights();
    let risks = scorer.assess_risks(&signals, as_of);
    assert!(risks.len() >= 3, "expected several risks, got {}", risks.len());
    assert_eq!(risks[0].severity, RiskSeverity::Critical);
    assert_eq!(risks[0].likelihood, Likelihood::Certain);
    for pair in risks.windows(2) {
        assert!(pair[0].priority >= pair[1].priority);
    }
}

#[test]
fn test_rank_risks_public_ordering() {
    use steward::health::rank_risks;
    let low = Risk::new("low", "d", RiskSeverity::Low, Likelihood::Unlikely, vec![]);
    let critical = Risk::new(
        "critical",
        "d",
        RiskSeverity::Critical,
        Likelihood::Certain,
        vec![],
    );
    for risks in [
        vec![low.clone(), critical.clone()],
        vec![critical.clone(), low.clone()],
    ] {
        let ranked = rank_risks(risks);
        assert_eq!(ranked[0].title, "critical");
        assert_eq!(ranked[1].title, "low");
    }
}

#[test]
fn test_healthy_project_yields_no_risks() {
    let as_of: NaiveDate = "2026-08-01".parse().unwrap();
    let signals = ProjectSignals {
        milestones: Some(vec![
            milestone(MilestoneStatus::Completed),
            milestone(MilestoneStatus::InProgress),
        ]),
        start_date: Some(as_of - Duration::days(60)),
        target_date: Some(as_of + Duration::days(60)),
        blockers: Some(vec![]),
        ..Default::default()
    };
    let scorer = HealthScorer::with_default_weights();
    assert!(scorer.assess_risks(&signals, as_of).is_empty());
}
