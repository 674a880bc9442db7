use std::sync::LazyLock;

use regex::Regex;

/// Dangerous sink call-site patterns, paired with a human-readable sink name.
/// Built once at first use.
static SINK_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    let table: &[(&str, &str)] = &[
        (r"document\.write\([^)]*\)", "document.write"),
        (r"document\.writeln\([^)]*\)", "document.writeln"),
        (r"innerHTML\s*=[^;]*", "innerHTML"),
        (r"outerHTML\s*=[^;]*", "outerHTML"),
        (r"eval\([^)]*\)", "eval"),
        (r"setTimeout\([^)]*\)", "setTimeout"),
        (r"setInterval\([^)]*\)", "setInterval"),
        (r"Function\([^)]*\)", "Function constructor"),
        (r"location\.(href|hash|search)\s*=[^;]*", "location assignment"),
        (r"window\.open\([^)]*\)", "window.open"),
        (r"postMessage\([^)]*\)", "postMessage"),
    ];
    table
        .iter()
        .map(|(pattern, name)| {
            (Regex::new(&format!("(?i){}", pattern)).expect("invalid sink pattern"), *name)
        })
        .collect()
});

/// Tokens suggesting user-controllable input flows into the sink.
const SOURCE_INDICATORS: &[&str] = &["location", "document.", "window."];

const EVIDENCE_CAP: usize = 200;

/// One risky sink call-site. Evidence of a dangerous pattern, not a proven
/// exploit — there is no JavaScript engine here.
#[derive(Debug, Clone)]
pub struct DomSink {
    pub sink: &'static str,
    pub evidence: String,
}

/// Scans raw HTML/script text for dangerous sink call-sites whose surrounding
/// text also references a user-controllable source. Runs once per page fetch,
/// independent of the parameter loop.
pub fn scan(html: &str) -> Vec<DomSink> {
    let mut sinks = Vec::new();

    for (pattern, name) in SINK_PATTERNS.iter() {
        for matched in pattern.find_iter(html) {
            let context = matched.as_str();
            let context_lower = context.to_lowercase();
            if SOURCE_INDICATORS.iter().any(|s| context_lower.contains(s)) {
                sinks.push(DomSink {
                    sink: name,
                    evidence: context.chars().take(EVIDENCE_CAP).collect(),
                });
            }
        }
    }

    sinks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_write_with_location_source() {
        let html = "<script>document.write(location.search)</script>";
        let sinks = scan(html);
        assert_eq!(sinks.len(), 1);
        assert_eq!(sinks[0].sink, "document.write");
        assert!(sinks[0].evidence.contains("location.search"));
    }

    #[test]
    fn test_inner_html_assignment() {
        let html = "<script>el.innerHTML = window.name;</script>";
        let sinks = scan(html);
        assert_eq!(sinks.len(), 1);
        assert_eq!(sinks[0].sink, "innerHTML");
    }

    #[test]
    fn test_sink_without_source_ignored() {
        // eval of a constant string references no user-controllable source
        let html = "<script>eval('2 + 2')</script>";
        assert!(scan(html).is_empty());
    }

    #[test]
    fn test_multiple_sinks_reported() {
        let html = concat!(
            "<script>",
            "document.write(location.hash);",
            "setTimeout(window.callback, 100);",
            "</script>"
        );
        let sinks = scan(html);
        assert_eq!(sinks.len(), 2);
    }

    #[test]
    fn test_plain_page_no_sinks() {
        assert!(scan("<html><body><p>hello</p></body></html>").is_empty());
    }
}
