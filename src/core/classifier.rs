use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::header::HeaderMap;
use serde::Serialize;
use url::Url;

use crate::http::Response;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title>(.*?)</title>").expect("invalid title regex"));

/// One retained discovery result. Immutable after creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub url: String,
    pub status: u16,
    pub content_length: usize,
    pub headers: Vec<(String, String)>,
    pub title: String,
    pub elapsed: Duration,
}

/// Decides whether a response is worth keeping as a discovery result.
///
/// Retained: success (200/201/204), any redirect (301/302/303/307/308),
/// access-controlled resources (401/403, the resource exists), and 5xx
/// (server-side failures may leak information). Everything else, 404
/// included, is treated as absent.
pub fn is_interesting(status: u16) -> bool {
    matches!(status, 200 | 201 | 204)
        || matches!(status, 301 | 302 | 303 | 307 | 308)
        || matches!(status, 401 | 403)
        || status >= 500
}

/// Classifies a raw response, extracting the facts discovery consumers need.
/// Returns `None` for uninteresting responses.
pub fn classify(url: &Url, response: &Response) -> Option<ProbeResult> {
    if !is_interesting(response.status) {
        return None;
    }

    Some(ProbeResult {
        url: url.to_string(),
        status: response.status,
        content_length: response.content_length(),
        headers: headers_to_vec(&response.headers),
        title: extract_title(&response.body),
        elapsed: response.elapsed,
    })
}

/// Extracts the page title, if any.
pub fn extract_title(html: &str) -> String {
    TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn headers_to_vec(headers: &HeaderMap) -> Vec<(String, String)> {
    headers.iter().map(|(k, v)| {
        (k.to_string(), v.to_str().unwrap_or("").to_string())
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::response;

    #[test]
    fn test_classification_table() {
        // Exhaustive over the statuses the contract names.
        let table = [
            (200, true),
            (301, true),
            (401, true),
            (403, true),
            (404, false),
            (500, true),
        ];
        for (status, expected) in table {
            assert_eq!(is_interesting(status), expected, "status {}", status);
        }
    }

    #[test]
    fn test_other_4xx_discarded() {
        for status in [400, 405, 410, 418, 429] {
            assert!(!is_interesting(status), "status {}", status);
        }
    }

    #[test]
    fn test_classify_extracts_facts() {
        let url = Url::parse("http://target/admin").unwrap();
        let resp = response(200, "<html><head><title> Admin Panel </title></head></html>");
        let result = classify(&url, &resp).unwrap();
        assert_eq!(result.status, 200);
        assert_eq!(result.title, "Admin Panel");
        assert_eq!(result.content_length, resp.body.len());
        assert_eq!(result.url, "http://target/admin");
    }

    #[test]
    fn test_classify_drops_not_found() {
        let url = Url::parse("http://target/nope").unwrap();
        assert!(classify(&url, &response(404, "not here")).is_none());
    }

    #[test]
    fn test_extract_title_case_insensitive() {
        assert_eq!(extract_title("<TITLE>Login</TITLE>"), "Login");
        assert_eq!(extract_title("no title here"), "");
    }
}
