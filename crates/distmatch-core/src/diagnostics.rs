//! Diagnostics - Distance Curve Checking
//!
//! Distance curves are authored by hand or baked from root motion, and the
//! matcher tolerates a lot. This module reports the things that make
//! matching results surprising, so they can be fixed at the source.
//!
//! # Features
//!
//! - **CurveIssue**: A detected problem (Error, Warning, Info).
//! - **check_curve**: Validate the keys of a single curve.
//! - **check_sequence**: Validate a sequence against node settings.

use crate::config::DistanceMatchingConfig;
use crate::curve::{AnimSequence, CurveSource, FloatCurve};
use crate::CoreError;

/// Represents an issue found on a distance curve
#[derive(Debug, Clone, PartialEq)]
pub struct CurveIssue {
    /// Severity level of the issue
    pub severity: IssueSeverity,
    /// Human-readable description
    pub message: String,
    /// Index of the key related to the issue (if any)
    pub key_index: Option<usize>,
}

impl CurveIssue {
    fn new(severity: IssueSeverity, message: impl Into<String>, key_index: Option<usize>) -> Self {
        Self {
            severity,
            message: message.into(),
            key_index,
        }
    }
}

/// Severity level of a diagnostic issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IssueSeverity {
    /// Informational message
    Info,
    /// Matching works but results may be surprising
    Warning,
    /// Matching cannot produce meaningful results
    Error,
}

/// Check a curve's keys
///
/// This performs multiple checks:
/// 1. Key count (empty or single-key curves cannot be searched)
/// 2. Time order (keys must not go back in time)
/// 3. Value order (decreasing segments and flat runs)
pub fn check_curve(curve: &FloatCurve) -> Vec<CurveIssue> {
    let mut issues = Vec::new();
    let keys = curve.keys();

    // 1. Key count
    match keys.len() {
        0 => {
            issues.push(CurveIssue::new(
                IssueSeverity::Error,
                format!("Curve '{}' has no keys; every lookup returns 0.", curve.name),
                None,
            ));
            return issues;
        }
        1 => {
            issues.push(CurveIssue::new(
                IssueSeverity::Info,
                format!(
                    "Curve '{}' has a single key; every lookup returns {:.3}.",
                    curve.name, keys[0].time
                ),
                Some(0),
            ));
            return issues;
        }
        _ => {}
    }

    // 2. Time order
    for (idx, pair) in keys.windows(2).enumerate() {
        if pair[1].time < pair[0].time {
            issues.push(CurveIssue::new(
                IssueSeverity::Error,
                format!(
                    "Key #{} goes back in time ({:.3} -> {:.3})",
                    idx + 1,
                    pair[0].time,
                    pair[1].time
                ),
                Some(idx + 1),
            ));
        }
    }

    // 3. Value order
    for (idx, pair) in keys.windows(2).enumerate() {
        if pair[1].value < pair[0].value {
            issues.push(CurveIssue::new(
                IssueSeverity::Warning,
                format!(
                    "Key #{} decreases distance ({:.3} -> {:.3}); lookups around it are not unique",
                    idx + 1,
                    pair[0].value,
                    pair[1].value
                ),
                Some(idx + 1),
            ));
        } else if pair[1].value == pair[0].value && idx > 0 && idx + 2 < keys.len() {
            issues.push(CurveIssue::new(
                IssueSeverity::Info,
                format!(
                    "Keys #{} and #{} share distance {:.3}; the earlier key wins",
                    idx,
                    idx + 1,
                    pair[0].value
                ),
                Some(idx + 1),
            ));
        }
    }

    issues
}

/// Check a sequence's distance curve against node settings
///
/// Adds to [`check_curve`]:
/// 1. Missing curve
/// 2. Boundary uniqueness flags that do not match the curve ends
/// 3. Keys outside the play length
pub fn check_sequence(sequence: &AnimSequence, config: &DistanceMatchingConfig) -> Vec<CurveIssue> {
    let Some(curve) = sequence.find_curve(&config.distance_curve_name) else {
        let err = CoreError::MissingCurve {
            asset: sequence.source_name().to_string(),
            curve: config.distance_curve_name.clone(),
        };
        return vec![CurveIssue::new(IssueSeverity::Error, err.to_string(), None)];
    };

    let mut issues = check_curve(curve);
    let keys = curve.keys();

    if let [first, second, ..] = keys {
        if first.value == second.value && config.lower_bound_unique {
            issues.push(CurveIssue::new(
                IssueSeverity::Warning,
                format!(
                    "First keys share distance {:.3} but lower_bound_unique is set",
                    first.value
                ),
                Some(0),
            ));
        }
    }

    if let [.., second_last, last] = keys {
        if second_last.value == last.value && config.upper_bound_unique {
            issues.push(CurveIssue::new(
                IssueSeverity::Warning,
                format!(
                    "Last keys share distance {:.3} but upper_bound_unique is set; the last key's time is returned",
                    last.value
                ),
                Some(keys.len() - 1),
            ));
        }
    }

    if let Some((_, end)) = curve.time_range() {
        if end > sequence.play_length {
            issues.push(CurveIssue::new(
                IssueSeverity::Warning,
                format!(
                    "Curve ends at {:.3}s, past the play length {:.3}s; matched times are clamped",
                    end, sequence.play_length
                ),
                Some(keys.len() - 1),
            ));
        }
    }

    if config.distance_limit_enabled {
        if let Some(last) = keys.last() {
            if config.distance_limit > last.value {
                issues.push(CurveIssue::new(
                    IssueSeverity::Info,
                    format!(
                        "Distance limit {:.3} is past the curve end {:.3}",
                        config.distance_limit, last.value
                    ),
                    None,
                ));
            }
        }
    }

    issues
}
