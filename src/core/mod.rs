pub mod classifier;
pub mod coordinator;
pub mod mutator;
pub mod prober;

use serde::Serialize;

/// Vulnerability class attached to a confirmed finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VulnerabilityType {
    Sqli,
    Xss,
}

impl std::fmt::Display for VulnerabilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VulnerabilityType::Sqli => write!(f, "SQLi"),
            VulnerabilityType::Xss => write!(f, "XSS"),
        }
    }
}

/// The detection technique that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FindingKind {
    ErrorBased,
    TimeBased,
    BooleanBased,
    Reflected,
    DomSink,
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FindingKind::ErrorBased => write!(f, "Error-Based"),
            FindingKind::TimeBased => write!(f, "Time-Based Blind"),
            FindingKind::BooleanBased => write!(f, "Boolean-Based Blind"),
            FindingKind::Reflected => write!(f, "Reflected"),
            FindingKind::DomSink => write!(f, "DOM-Based"),
        }
    }
}

/// Ordinal heuristic certainty. Not proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "Low"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::High => write!(f, "High"),
        }
    }
}

/// Database engine identified by error-signature matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DbEngine {
    MySql,
    MsSql,
    Postgres,
    Oracle,
    Sqlite,
}

impl std::fmt::Display for DbEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbEngine::MySql => write!(f, "MySQL/MariaDB"),
            DbEngine::MsSql => write!(f, "MSSQL"),
            DbEngine::Postgres => write!(f, "PostgreSQL"),
            DbEngine::Oracle => write!(f, "Oracle"),
            DbEngine::Sqlite => write!(f, "SQLite"),
        }
    }
}

/// Subtype-specific extras carried alongside a finding.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FindingDetail {
    #[serde(rename_all = "camelCase")]
    Database { engine: DbEngine },
    #[serde(rename_all = "camelCase")]
    Timing {
        baseline_ms: u128,
        response_ms: u128,
        delay_ms: u128,
    },
    #[serde(rename_all = "camelCase")]
    Lengths {
        true_len: usize,
        false_len: usize,
        difference: usize,
    },
    #[serde(rename_all = "camelCase")]
    Sink { sink: String },
}

/// A confirmed vulnerability. Created exactly once, never mutated; ownership
/// moves from the coordinator to whatever consumes the findings list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub vuln_type: VulnerabilityType,
    pub kind: FindingKind,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    pub confidence: Confidence,
    pub evidence: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<FindingDetail>,
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.vuln_type, self.kind)?;
        if let Some(param) = &self.parameter {
            write!(f, " [param: {}]", param)?;
        }
        write!(f, " at {} [{}]", self.url, self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::High > Confidence::Medium);
        assert!(Confidence::Medium > Confidence::Low);
    }

    #[test]
    fn test_finding_display() {
        let finding = Finding {
            vuln_type: VulnerabilityType::Sqli,
            kind: FindingKind::ErrorBased,
            url: "http://target/item?id=1".to_string(),
            parameter: Some("id".to_string()),
            payload: Some("'".to_string()),
            confidence: Confidence::High,
            evidence: "You have an error in your SQL syntax".to_string(),
            detail: Some(FindingDetail::Database { engine: DbEngine::MySql }),
        };
        let rendered = finding.to_string();
        assert!(rendered.contains("SQLi (Error-Based)"));
        assert!(rendered.contains("[param: id]"));
        assert!(rendered.contains("[High]"));
    }

    #[test]
    fn test_finding_serializes_detail() {
        let finding = Finding {
            vuln_type: VulnerabilityType::Sqli,
            kind: FindingKind::TimeBased,
            url: "http://target/".to_string(),
            parameter: Some("q".to_string()),
            payload: Some("' OR SLEEP(5)--".to_string()),
            confidence: Confidence::Medium,
            evidence: "delayed response".to_string(),
            detail: Some(FindingDetail::Timing {
                baseline_ms: 300,
                response_ms: 6500,
                delay_ms: 6200,
            }),
        };
        let json = serde_json::to_string(&finding).unwrap();
        assert!(json.contains("\"delayMs\":6200"));
        assert!(json.contains("\"kind\":\"TimeBased\""));
    }
}
