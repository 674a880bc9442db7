use crate::core::Confidence;

/// Payload fragments that, when reflected, almost certainly execute.
const HIGH_SIGNAL_PATTERNS: &[&str] = &[
    "<script>alert",
    "<script>prompt",
    "<script>confirm",
    "javascript:alert",
    "onload=alert",
    "onerror=alert",
];

/// Weaker executable-looking tokens.
const MEDIUM_SIGNAL_PATTERNS: &[&str] = &[
    "<script>",
    "javascript:",
    "onload=",
    "onerror=",
    "onmouseover=",
];

const EVENT_HANDLERS: &[&str] = &["onload", "onerror", "onclick", "onmouseover", "ontoggle"];

const PARTIAL_MIN_LEN: usize = 10;
const PARTIAL_EDGE: usize = 5;
const EVIDENCE_CAP: usize = 500;

/// Whether a payload reappears in the response body, verbatim or mangled.
///
/// Servers frequently entity-encode, percent-encode, or unicode-escape
/// reflected input; each of those variants still puts attacker-controlled
/// text on the page. The partial check tolerates response-side truncation or
/// rewriting of the payload's middle.
pub fn is_reflected(payload: &str, body: &str) -> bool {
    if payload.is_empty() {
        return false;
    }
    if body.contains(payload) {
        return true;
    }

    let variants = [
        payload.replace('<', "&lt;").replace('>', "&gt;"),
        payload.replace('<', "%3C").replace('>', "%3E"),
        payload.replace('<', "\\u003C").replace('>', "\\u003E"),
    ];
    for variant in &variants {
        if variant != payload && body.contains(variant.as_str()) {
            return true;
        }
    }

    // Char-based edges: payloads loaded from files can carry multibyte
    // UTF-8, and byte slicing would split a code point.
    let char_count = payload.chars().count();
    if char_count > PARTIAL_MIN_LEN {
        let start: String = payload.chars().take(PARTIAL_EDGE).collect();
        let end: String = payload.chars().skip(char_count - PARTIAL_EDGE).collect();
        if body.contains(&start) && body.contains(&end) {
            return true;
        }
    }

    false
}

/// Heuristic certainty that a reflected payload is executable.
pub fn confidence(payload: &str, body: &str) -> Confidence {
    let payload_lower = payload.to_lowercase();

    for pattern in HIGH_SIGNAL_PATTERNS {
        if payload_lower.contains(pattern) {
            return Confidence::High;
        }
    }

    if triggers_execution(&payload_lower, body) {
        return Confidence::High;
    }

    for pattern in MEDIUM_SIGNAL_PATTERNS {
        if payload_lower.contains(pattern) {
            return Confidence::Medium;
        }
    }

    Confidence::Low
}

/// A script tag or event handler confirmed independently in both payload and
/// body suggests the reflection landed in executable position.
fn triggers_execution(payload_lower: &str, body: &str) -> bool {
    let body_lower = body.to_lowercase();
    if payload_lower.contains("<script>") && body_lower.contains("<script>") {
        return true;
    }
    for handler in EVENT_HANDLERS {
        if payload_lower.contains(handler) && body_lower.contains(handler) {
            return true;
        }
    }
    false
}

/// Pulls the reflection context out of the body for finding evidence:
/// the matching line plus two lines either side, truncated.
pub fn extract_evidence(payload: &str, body: &str) -> String {
    let lines: Vec<&str> = body.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if line.contains(payload) {
            let start = i.saturating_sub(2);
            let end = (i + 3).min(lines.len());
            let context = lines[start..end].join("\n");
            return context.chars().take(EVIDENCE_CAP).collect();
        }
    }
    "payload reflected in response".to_string()
}
