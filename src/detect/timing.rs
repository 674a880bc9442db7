use std::time::Duration;

use crate::core::Confidence;
use crate::DetectionConfig;

#[derive(Debug, Clone)]
pub struct TimingMatch {
    pub delta: Duration,
    pub confidence: Confidence,
}

/// Compares a mutated request's elapsed time against the baseline.
///
/// Confirms only when the candidate was delayed past the trigger threshold;
/// a delta at or below it is inconclusive (Low confidence never confirms a
/// finding, so it is simply not returned).
pub fn evaluate(
    baseline: Duration,
    candidate: Duration,
    config: &DetectionConfig,
) -> Option<TimingMatch> {
    if candidate <= baseline + config.trigger_delay {
        return None;
    }

    let delta = candidate - baseline;
    let confidence = if delta > config.high_delay {
        Confidence::High
    } else {
        Confidence::Medium
    };

    Some(TimingMatch { delta, confidence })
}
