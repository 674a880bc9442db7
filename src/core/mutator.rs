use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Method;
use url::Url;

use crate::http::HttpRequest;

/// Where a mutable parameter lives in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    Query,
    Form,
}

/// A mutable request parameter. Extracted once per target; read-only during
/// probing.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub original_value: String,
    pub source: ParamSource,
}

/// A probe target derived from an HTML form: resolved action URL, method,
/// and its input parameters.
#[derive(Debug, Clone)]
pub struct FormTarget {
    pub action: Url,
    pub method: Method,
    pub parameters: Vec<Parameter>,
}

static FORM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<form[^>]*>.*?</form>").expect("invalid form regex"));
static ACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)action=["']([^"']*)["']"#).expect("invalid action regex"));
static METHOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)method=["']([^"']*)["']"#).expect("invalid method regex"));
static INPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<input[^>]*>").expect("invalid input regex"));
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)name=["']([^"']*)["']"#).expect("invalid name regex"));
static VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)value=["']([^"']*)["']"#).expect("invalid value regex"));

/// Characters left bare in form-urlencoded values.
const FORM_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Extracts the mutable query parameters of a URL.
pub fn extract_query_parameters(url: &Url) -> Vec<Parameter> {
    url.query_pairs()
        .map(|(name, value)| Parameter {
            name: name.to_string(),
            original_value: value.to_string(),
            source: ParamSource::Query,
        })
        .collect()
}

/// Extracts probe targets from the forms on a page. GET forms produce query
/// parameters against the resolved action URL; anything else produces
/// form-urlencoded parameters.
pub fn extract_form_targets(page_url: &Url, html: &str) -> Vec<FormTarget> {
    let mut targets = Vec::new();

    for form_match in FORM_RE.find_iter(html) {
        let form_html = form_match.as_str();

        let action = ACTION_RE
            .captures(form_html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or("");
        let action = if action.is_empty() {
            page_url.clone()
        } else {
            match page_url.join(action) {
                Ok(resolved) => resolved,
                Err(_) => continue,
            }
        };

        let method = METHOD_RE
            .captures(form_html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_uppercase())
            .unwrap_or_else(|| "GET".to_string());
        let method = if method == "POST" { Method::POST } else { Method::GET };
        let source = if method == Method::POST { ParamSource::Form } else { ParamSource::Query };

        let parameters: Vec<Parameter> = INPUT_RE
            .find_iter(form_html)
            .filter_map(|input| {
                let input_html = input.as_str();
                let name = NAME_RE.captures(input_html)?.get(1)?.as_str().to_string();
                let original_value = VALUE_RE
                    .captures(input_html)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| "test".to_string());
                Some(Parameter { name, original_value, source })
            })
            .collect();

        if !parameters.is_empty() {
            targets.push(FormTarget { action, method, parameters });
        }
    }

    targets
}

/// Builds the request probing `target` with `payload`: every other parameter
/// keeps its original value, exactly one is replaced.
pub fn build_mutated_request(
    url: &Url,
    parameters: &[Parameter],
    target: &Parameter,
    payload: &str,
) -> HttpRequest {
    match target.source {
        ParamSource::Query => {
            let mutated = mutate_query(url, &target.name, payload);
            HttpRequest::get(mutated)
        }
        ParamSource::Form => {
            let body = encode_form(parameters, &target.name, payload);
            let mut headers = HeaderMap::new();
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            );
            if let Ok(value) = HeaderValue::from_str(&body.len().to_string()) {
                headers.insert(CONTENT_LENGTH, value);
            }
            HttpRequest::new(Method::POST, url.clone(), headers, body)
        }
    }
}

/// Replaces one query parameter's value, appending the pair when the URL did
/// not carry it yet (GET-form inputs).
pub fn mutate_query(url: &Url, param_name: &str, payload: &str) -> Url {
    let mut mutated = url.clone();
    let mut replaced = false;

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            if k == param_name {
                replaced = true;
                (k.to_string(), payload.to_string())
            } else {
                (k.to_string(), v.to_string())
            }
        })
        .collect();

    mutated.query_pairs_mut().clear();
    for (k, v) in pairs {
        mutated.query_pairs_mut().append_pair(&k, &v);
    }
    if !replaced {
        mutated.query_pairs_mut().append_pair(param_name, payload);
    }

    mutated
}

/// Encodes the form-urlencoded body, substituting the payload for exactly
/// one parameter.
fn encode_form(parameters: &[Parameter], target_name: &str, payload: &str) -> String {
    parameters
        .iter()
        .filter(|p| p.source == ParamSource::Form)
        .map(|p| {
            let value = if p.name == target_name { payload } else { p.original_value.as_str() };
            format!("{}={}", p.name, utf8_percent_encode(value, FORM_SAFE))
        })
        .collect::<Vec<_>>()
        .join("&")
}
