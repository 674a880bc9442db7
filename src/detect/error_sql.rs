use std::sync::LazyLock;

use regex::Regex;

use crate::core::{Confidence, DbEngine};

/// Error-text signatures per database engine. Built once at first use and
/// never mutated; engine order is fixed — the first matching engine wins.
static SIGNATURES: LazyLock<Vec<(DbEngine, Vec<Regex>)>> = LazyLock::new(|| {
    fn compile(patterns: &[&str]) -> Vec<Regex> {
        patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i){}", p)).expect("invalid signature pattern"))
            .collect()
    }

    vec![
        (DbEngine::MySql, compile(&[
            r"SQL syntax.*MySQL",
            r"You have an error in your SQL syntax",
            r"Warning.*mysql_",
            r"MySqlClient\.",
            r"mysql_fetch",
            r"MySQL server version",
            r"MariaDB server version",
        ])),
        (DbEngine::MsSql, compile(&[
            r"Microsoft OLE DB Provider for SQL Server",
            r"ODBC SQL Server Driver",
            r"SQLServer JDBC Driver",
            r"Incorrect syntax near",
            r"Unclosed quotation mark",
        ])),
        (DbEngine::Postgres, compile(&[
            r"PostgreSQL.*ERROR",
            r"Warning.*pg_",
            r"valid PostgreSQL result",
            r"Npgsql\.",
            r"PG::SyntaxError",
            r"PostgreSQL query failed",
        ])),
        (DbEngine::Oracle, compile(&[
            r"ORA-\d{5}",
            r"Oracle error",
            r"Oracle.*Driver",
            r"Warning.*oci_",
            r"PLS-\d{3,5}",
            r"SQL command not properly ended",
        ])),
        (DbEngine::Sqlite, compile(&[
            r"SQLite/JDBCDriver",
            r"SQLite\.Exception",
            r"System\.Data\.SQLite",
            r"SQLite error",
            r"no such table",
            r"no such column",
        ])),
    ]
});

/// Strong indicators that upgrade a signature match to High confidence.
const HIGH_CONFIDENCE_INDICATORS: &[&str] =
    &["sql syntax", "ora-", "unclosed quotation", "incorrect syntax"];

const EVIDENCE_CAP: usize = 500;

#[derive(Debug, Clone)]
pub struct SqlErrorMatch {
    pub engine: DbEngine,
    pub evidence: String,
    pub confidence: Confidence,
}

/// Matches a response body against the engine signature tables. Returns the
/// first matching engine's verdict, or `None` when no error text is present.
pub fn check(body: &str) -> Option<SqlErrorMatch> {
    for (engine, patterns) in SIGNATURES.iter() {
        for pattern in patterns {
            if let Some(matched) = pattern.find(body) {
                let evidence: String = matched.as_str().chars().take(EVIDENCE_CAP).collect();
                let confidence = error_confidence(&evidence);
                return Some(SqlErrorMatch { engine: *engine, evidence, confidence });
            }
        }
    }
    None
}

fn error_confidence(evidence: &str) -> Confidence {
    let lower = evidence.to_lowercase();
    for indicator in HIGH_CONFIDENCE_INDICATORS {
        if lower.contains(indicator) {
            return Confidence::High;
        }
    }
    Confidence::Medium
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_syntax_error_high_confidence() {
        let body = "Error: You have an error in your SQL syntax near ''1''";
        let matched = check(body).unwrap();
        assert_eq!(matched.engine, DbEngine::MySql);
        assert_eq!(matched.confidence, Confidence::High);
        assert!(matched.evidence.contains("SQL syntax"));
    }

    #[test]
    fn test_mssql_unclosed_quotation_high() {
        let body = "Unclosed quotation mark after the character string 'x'";
        let matched = check(body).unwrap();
        assert_eq!(matched.engine, DbEngine::MsSql);
        assert_eq!(matched.confidence, Confidence::High);
    }

    #[test]
    fn test_oracle_error_code() {
        let body = "java.sql.SQLException: ORA-00933: SQL command not properly ended";
        let matched = check(body).unwrap();
        assert_eq!(matched.engine, DbEngine::Oracle);
        assert_eq!(matched.confidence, Confidence::High);
    }

    #[test]
    fn test_sqlite_medium_confidence() {
        let matched = check("Error: no such table: users").unwrap();
        assert_eq!(matched.engine, DbEngine::Sqlite);
        assert_eq!(matched.confidence, Confidence::Medium);
    }

    #[test]
    fn test_postgres_warning() {
        let matched = check("Warning: pg_query(): Query failed").unwrap();
        assert_eq!(matched.engine, DbEngine::Postgres);
    }

    #[test]
    fn test_case_insensitive_match() {
        assert!(check("YOU HAVE AN ERROR IN YOUR SQL SYNTAX").is_some());
    }

    #[test]
    fn test_first_engine_wins() {
        // Body matching both MySQL and SQLite patterns: engine order decides.
        let body = "You have an error in your SQL syntax; also no such table: x";
        assert_eq!(check(body).unwrap().engine, DbEngine::MySql);
    }

    #[test]
    fn test_clean_body_no_match() {
        assert!(check("<html><body>Welcome back!</body></html>").is_none());
    }
}
