//! Linear-regression trend analysis over score history
//!
//! Ordinary least squares of value against sequence position (not
//! timestamp delta), so unevenly spaced samples still fit. Direction is
//! decided by slope against a stable band; confidence is the share of
//! variance the fit explains (R-squared), clamped to [0, 1].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Slope magnitudes below this are reported as stable
pub const DEFAULT_STABLE_THRESHOLD: f64 = 0.05;

/// One historical observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub at: NaiveDate,
    pub value: f64,
}

/// Direction of a fitted trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Improving => write!(f, "improving"),
            TrendDirection::Stable => write!(f, "stable"),
            TrendDirection::Declining => write!(f, "declining"),
        }
    }
}

/// Result of fitting a trend line through historical points
#[derive(Debug, Clone, Serialize)]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    /// Fitted change in value per observation
    pub slope: f64,
    /// 0.0-1.0; how much of the variance the fit explains
    pub confidence: f64,
    /// Input points sorted chronologically, window applied
    pub points: Vec<TrendPoint>,
}

/// Fit a trend over the points inside `window_days` of the newest one,
/// using the default stable band.
pub fn analyze_trend(points: &[TrendPoint], window_days: i64) -> TrendAnalysis {
    analyze_trend_with(points, window_days, DEFAULT_STABLE_THRESHOLD)
}

/// Fit a trend with an explicit stable threshold. A `window_days` of
/// zero or less disables the window and fits every point.
///
/// Fewer than two in-window points is insufficient data, not an error:
/// the result is stable with zero slope and zero confidence.
pub fn analyze_trend_with(
    points: &[TrendPoint],
    window_days: i64,
    stable_threshold: f64,
) -> TrendAnalysis {
    let mut points: Vec<TrendPoint> = points.to_vec();
    points.sort_by_key(|p| p.at);
    if window_days > 0 {
        if let Some(latest) = points.last().map(|p| p.at) {
            points.retain(|p| (latest - p.at).num_days() <= window_days);
        }
    }

    if points.len() < 2 {
        return TrendAnalysis {
            direction: TrendDirection::Stable,
            slope: 0.0,
            confidence: 0.0,
            points,
        };
    }

    let n = points.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = points.iter().map(|p| p.value).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (i, point) in points.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxx += dx * dx;
        sxy += dx * (point.value - mean_y);
    }
    // sxx > 0 whenever n >= 2
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (i, point) in points.iter().enumerate() {
        let fitted = intercept + slope * i as f64;
        ss_res += (point.value - fitted).powi(2);
        ss_tot += (point.value - mean_y).powi(2);
    }
    // A flat series is a perfect fit, not an unexplained one.
    let confidence = if ss_tot <= f64::EPSILON {
        1.0
    } else {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    };

    let direction = if slope.abs() < stable_threshold {
        TrendDirection::Stable
    } else if slope > 0.0 {
        TrendDirection::Improving
    } else {
        TrendDirection::Declining
    };

    TrendAnalysis {
        direction,
        slope,
        confidence,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<TrendPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| TrendPoint {
                at: NaiveDate::from_ymd_opt(2026, 1, 1 + i as u32).unwrap(),
                value,
            })
            .collect()
    }

    #[test]
    fn test_insufficient_data_is_stable() {
        let analysis = analyze_trend(&series(&[0.7]), 90);
        assert_eq!(analysis.direction, TrendDirection::Stable);
        assert_eq!(analysis.slope, 0.0);
        assert_eq!(analysis.confidence, 0.0);
    }

    #[test]
    fn test_stable_below_threshold_improving_above() {
        // Strictly increasing but shallow: slope 0.01 per step.
        let shallow = series(&[0.70, 0.71, 0.72, 0.73, 0.74]);
        let analysis = analyze_trend(&shallow, 90);
        assert_eq!(analysis.direction, TrendDirection::Stable);

        // Same shape scaled x10 crosses the stable band.
        let steep = series(&[7.0, 7.1, 7.2, 7.3, 7.4]);
        let analysis = analyze_trend(&steep, 90);
        assert_eq!(analysis.direction, TrendDirection::Improving);
        assert!((analysis.slope - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_declining_series() {
        let analysis = analyze_trend(&series(&[0.9, 0.8, 0.7, 0.6]), 90);
        assert_eq!(analysis.direction, TrendDirection::Declining);
        assert!(analysis.slope < 0.0);
        // Perfectly linear: the fit explains everything.
        assert!((analysis.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_noise_lowers_confidence() {
        let clean = analyze_trend(&series(&[0.2, 0.4, 0.6, 0.8]), 90);
        let noisy = analyze_trend(&series(&[0.2, 0.8, 0.3, 0.9]), 90);
        assert!(noisy.confidence < clean.confidence);
    }

    #[test]
    fn test_flat_series_full_confidence() {
        let analysis = analyze_trend(&series(&[0.5, 0.5, 0.5]), 90);
        assert_eq!(analysis.direction, TrendDirection::Stable);
        assert_eq!(analysis.confidence, 1.0);
    }

    #[test]
    fn test_window_drops_old_points() {
        let mut points = series(&[0.1, 0.2]);
        points.push(TrendPoint {
            at: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            value: 0.9,
        });
        points.push(TrendPoint {
            at: NaiveDate::from_ymd_opt(2026, 6, 2).unwrap(),
            value: 0.9,
        });
        let analysis = analyze_trend(&points, 30);
        assert_eq!(analysis.points.len(), 2);
        assert!(analysis.points.iter().all(|p| p.value > 0.5));
    }

    #[test]
    fn test_points_sorted_chronologically() {
        let jumbled = vec![
            TrendPoint {
                at: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                value: 0.6,
            },
            TrendPoint {
                at: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                value: 0.4,
            },
            TrendPoint {
                at: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
                value: 0.5,
            },
        ];
        let analysis = analyze_trend(&jumbled, 0);
        let dates: Vec<_> = analysis.points.iter().map(|p| p.at).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }
}
