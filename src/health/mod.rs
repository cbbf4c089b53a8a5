//! Project health scoring
//!
//! # Scoring Formula
//!
//! ```text
//! Overall = timeline x W1 + activity x W2 + blockers x W3 + dependencies x W4
//!
//! Default weights: 0.30 / 0.25 / 0.25 / 0.20 (must sum to 1.0)
//!
//! timeline     = step(completed milestone fraction / elapsed fraction)
//! activity     = step((commits + 2xPRs + closed issues) / baseline)
//! blockers     = inverse step of open blocker count
//! dependencies = mean of upstream projects' overall scores
//! ```
//!
//! Categories: excellent >= 0.85, good >= 0.70, fair >= 0.50,
//! poor >= 0.30, else critical.
//!
//! Everything here is pure computation over already-collected data: no
//! I/O, no clock reads, safe to call from any thread.

mod risk;
mod scorer;
mod signals;
mod trend;

pub use risk::{rank_risks, Likelihood, Risk, RiskSeverity};
pub use scorer::{
    ComponentScore, ComponentWeights, HealthCategory, HealthScore, HealthScorer, WeightsError,
};
pub use signals::ProjectSignals;
pub use trend::{
    analyze_trend, analyze_trend_with, TrendAnalysis, TrendDirection, TrendPoint,
    DEFAULT_STABLE_THRESHOLD,
};
