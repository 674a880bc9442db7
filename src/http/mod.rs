pub mod client;

pub use client::HttpClient;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Method;
use url::Url;

use crate::error::TransportError;

/// Represents the type of body content in an HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyType {
    FormUrlEncoded,
    Raw,
    None,
}

impl BodyType {
    /// Detects the body type from the Content-Type header.
    pub fn detect_body_type(headers: &HeaderMap) -> BodyType {
        if let Some(content_type) = headers.get(CONTENT_TYPE) {
            if let Ok(value) = content_type.to_str() {
                if value.to_lowercase().contains("application/x-www-form-urlencoded") {
                    return BodyType::FormUrlEncoded;
                }
                return BodyType::Raw;
            }
        }
        BodyType::None
    }
}

/// An outbound HTTP request with all its components.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: String,
    pub body_type: BodyType,
}

impl HttpRequest {
    /// Creates a new `HttpRequest`, auto-detecting the body type from headers.
    pub fn new(method: Method, url: Url, headers: HeaderMap, body: String) -> Self {
        let body_type = BodyType::detect_body_type(&headers);
        Self { method, url, headers, body, body_type }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url, HeaderMap::new(), String::new())
    }
}

/// A fully collected HTTP response. The transport reads the body eagerly so
/// every consumer works on one fixed value type, not a half-drained stream.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
    pub elapsed: Duration,
    pub final_url: Url,
}

impl Response {
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// The transport collaborator. The probing core only ever talks to the
/// network through this seam, so tests can swap in a deterministic stub.
///
/// Implementations must not follow redirects: 30x statuses are themselves
/// discovery signals and have to reach the classifier raw.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, request: &HttpRequest) -> Result<Response, TransportError>;
}
