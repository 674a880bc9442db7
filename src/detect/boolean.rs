use crate::http::Response;
use crate::DetectionConfig;

#[derive(Debug, Clone)]
pub struct BooleanMatch {
    pub true_len: usize,
    pub false_len: usize,
    pub difference: usize,
    pub evidence: String,
}

/// Compares the responses to a true-condition and a false-condition payload
/// against each other and against the baseline.
///
/// The differential signal is binary by construction, so the coordinator
/// always reports it at High confidence. Thresholds come from
/// `DetectionConfig` — they are policy knobs, not derived constants.
pub fn evaluate(
    baseline: &Response,
    true_resp: &Response,
    false_resp: &Response,
    config: &DetectionConfig,
) -> Option<BooleanMatch> {
    let true_len = true_resp.content_length();
    let false_len = false_resp.content_length();
    let baseline_len = baseline.content_length();
    let difference = true_len.abs_diff(false_len);

    if difference > config.pair_difference {
        return Some(BooleanMatch {
            true_len,
            false_len,
            difference,
            evidence: format!(
                "true/false responses differ by {} characters (true={}, false={})",
                difference, true_len, false_len
            ),
        });
    }

    // One response tracking the baseline while the other diverges hard is
    // the same signal even when the pair difference itself is small.
    let true_drift = true_len.abs_diff(baseline_len);
    let false_drift = false_len.abs_diff(baseline_len);
    let split = (true_drift < config.baseline_near && false_drift > config.baseline_far)
        || (false_drift < config.baseline_near && true_drift > config.baseline_far);
    if split {
        return Some(BooleanMatch {
            true_len,
            false_len,
            difference,
            evidence: format!(
                "one condition tracks baseline (drift {}/{}), the other diverges (baseline={})",
                true_drift, false_drift, baseline_len
            ),
        });
    }

    if true_resp.status != false_resp.status {
        return Some(BooleanMatch {
            true_len,
            false_len,
            difference,
            evidence: format!(
                "true/false conditions returned different statuses ({} vs {})",
                true_resp.status, false_resp.status
            ),
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::response;

    fn body_of_len(len: usize) -> String {
        "x".repeat(len)
    }

    #[test]
    fn test_pair_length_difference_confirms() {
        // baseline 1000, true 1005, false 1300: difference 295 > 100
        let baseline = response(200, &body_of_len(1000));
        let true_resp = response(200, &body_of_len(1005));
        let false_resp = response(200, &body_of_len(1300));
        let m = evaluate(&baseline, &true_resp, &false_resp, &DetectionConfig::default()).unwrap();
        assert_eq!(m.difference, 295);
    }

    #[test]
    fn test_baseline_split_confirms() {
        // Pair difference 90 stays under 100, but true tracks baseline while
        // false diverges by more than 200.
        let cfg = DetectionConfig { pair_difference: 300, ..DetectionConfig::default() };
        let baseline = response(200, &body_of_len(1000));
        let true_resp = response(200, &body_of_len(1010));
        let false_resp = response(200, &body_of_len(1250));
        assert!(evaluate(&baseline, &true_resp, &false_resp, &cfg).is_some());
    }

    #[test]
    fn test_status_mismatch_confirms() {
        let baseline = response(200, &body_of_len(1000));
        let true_resp = response(200, &body_of_len(1000));
        let false_resp = response(500, &body_of_len(1000));
        let m = evaluate(&baseline, &true_resp, &false_resp, &DetectionConfig::default()).unwrap();
        assert!(m.evidence.contains("different statuses"));
    }

    #[test]
    fn test_similar_responses_inconclusive() {
        let baseline = response(200, &body_of_len(1000));
        let true_resp = response(200, &body_of_len(1010));
        let false_resp = response(200, &body_of_len(1020));
        assert!(evaluate(&baseline, &true_resp, &false_resp, &DetectionConfig::default()).is_none());
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let cfg = DetectionConfig { pair_difference: 5, ..DetectionConfig::default() };
        let baseline = response(200, &body_of_len(1000));
        let true_resp = response(200, &body_of_len(1000));
        let false_resp = response(200, &body_of_len(1010));
        assert!(evaluate(&baseline, &true_resp, &false_resp, &cfg).is_some());
    }
}
