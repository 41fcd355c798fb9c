//! Regression detection between two [`super::CityValidationResult`] runs: pass/fail transitions
//! plus the "still passing but getting worse" cases (§4.6).
use super::CityValidationResult;

/// IoU drop, in absolute points, that counts as a regression even when the ward still passes.
pub const IOU_DROP_THRESHOLD: f64 = 0.05;

/// Hausdorff-distance growth factor that counts as a regression even when the ward still passes.
pub const HAUSDORFF_INCREASE_FACTOR: f64 = 1.5;

/// What changed for a single ward between two validation runs.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum WardRegressionKind {
    /// The ward passed previously and now fails.
    #[display("newly failing")]
    NewlyFailing,
    /// IoU dropped by more than [`IOU_DROP_THRESHOLD`] while the ward still passes.
    #[display("IoU dropped by {_0:.3}")]
    IouDrop(f64),
    /// Hausdorff distance grew by more than [`HAUSDORFF_INCREASE_FACTOR`] while the ward still
    /// passes.
    #[display("Hausdorff distance grew {_0:.2}x")]
    HausdorffIncrease(f64),
}

/// One ward's regression.
#[derive(Debug, Clone, PartialEq)]
pub struct WardRegression {
    /// The ward this regression belongs to.
    pub ward_id: String,
    /// What kind of regression occurred.
    pub kind: WardRegressionKind,
}

/// Result of [`detect_regressions`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegressionReport {
    /// True when the city-level `passed` flag went from true to false.
    pub overall_regression: bool,
    /// True when the city-level `passed` flag went from false to true.
    pub overall_improvement: bool,
    /// Per-ward regressions, in no particular order.
    pub ward_regressions: Vec<WardRegression>,
    /// Ward ids that went from failing to passing.
    pub ward_improvements: Vec<String>,
}

impl RegressionReport {
    /// True when anything regressed, overall or per-ward.
    pub fn has_regressions(&self) -> bool {
        self.overall_regression || !self.ward_regressions.is_empty()
    }
}

/// The `detect_regressions` function compares `previous` and `current` city validation runs and
/// reports every regression and improvement, per §4.6.
pub fn detect_regressions(
    previous: &CityValidationResult,
    current: &CityValidationResult,
) -> RegressionReport {
    let mut report = RegressionReport {
        overall_regression: previous.passed && !current.passed,
        overall_improvement: !previous.passed && current.passed,
        ..Default::default()
    };

    for (ward_id, current_ward) in &current.ward_results {
        let Some(previous_ward) = previous.ward_results.get(ward_id) else {
            continue;
        };

        if previous_ward.passed && !current_ward.passed {
            report.ward_regressions.push(WardRegression {
                ward_id: ward_id.clone(),
                kind: WardRegressionKind::NewlyFailing,
            });
            continue;
        }
        if !previous_ward.passed && current_ward.passed {
            report.ward_improvements.push(ward_id.clone());
        }

        if current_ward.passed {
            let iou_drop = previous_ward.metrics.iou - current_ward.metrics.iou;
            if iou_drop > IOU_DROP_THRESHOLD {
                report.ward_regressions.push(WardRegression {
                    ward_id: ward_id.clone(),
                    kind: WardRegressionKind::IouDrop(iou_drop),
                });
            }
            let previous_hausdorff = previous_ward.metrics.hausdorff_distance_m.max(1e-9);
            let factor = current_ward.metrics.hausdorff_distance_m / previous_hausdorff;
            if factor > HAUSDORFF_INCREASE_FACTOR {
                report.ward_regressions.push(WardRegression {
                    ward_id: ward_id.clone(),
                    kind: WardRegressionKind::HausdorffIncrease(factor),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{WardMetrics, WardValidationResult};
    use std::collections::HashMap;

    fn city(ward_id: &str, passed: bool, iou: f64, hausdorff: f64) -> CityValidationResult {
        let mut ward_results = HashMap::new();
        ward_results.insert(
            ward_id.to_string(),
            WardValidationResult {
                ward_id: ward_id.to_string(),
                passed,
                metrics: WardMetrics {
                    iou,
                    hausdorff_distance_m: hausdorff,
                    ..Default::default()
                },
                failures: if passed { vec![] } else { vec!["failed".to_string()] },
            },
        );
        CityValidationResult {
            ward_results,
            total: 1,
            passed_count: if passed { 1 } else { 0 },
            average_iou: iou,
            max_hausdorff_distance_m: hausdorff,
            passed,
        }
    }

    #[test]
    fn detects_newly_failing_ward() {
        let previous = city("1", true, 0.95, 10.0);
        let current = city("1", false, 0.5, 60.0);
        let report = detect_regressions(&previous, &current);
        assert!(report.has_regressions());
        assert!(report.overall_regression);
        assert!(matches!(
            report.ward_regressions[0].kind,
            WardRegressionKind::NewlyFailing
        ));
    }

    #[test]
    fn detects_iou_drop_while_still_passing() {
        let previous = city("1", true, 0.98, 10.0);
        let current = city("1", true, 0.90, 12.0);
        let report = detect_regressions(&previous, &current);
        assert!(report
            .ward_regressions
            .iter()
            .any(|r| matches!(r.kind, WardRegressionKind::IouDrop(_))));
    }

    #[test]
    fn no_regression_for_identical_runs() {
        let previous = city("1", true, 0.98, 10.0);
        let current = city("1", true, 0.98, 10.0);
        let report = detect_regressions(&previous, &current);
        assert!(!report.has_regressions());
    }
}
