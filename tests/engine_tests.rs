use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use url::Url;

use vexscan::core::mutator::{extract_query_parameters, Parameter};
use vexscan::core::FindingKind;
use vexscan::{
    DetectionConfig, HttpRequest, InjectionProber, PathProber, PayloadSet, Response, Transport,
    TransportError,
};

/// In-memory site: a handful of known paths, one of them carrying a
/// SQL-injectable query parameter.
struct FakeSite;

#[async_trait]
impl Transport for FakeSite {
    async fn request(&self, request: &HttpRequest) -> Result<Response, TransportError> {
        let path = request.url.path();
        let query = request.url.query().unwrap_or("");

        let (status, body) = match path {
            "/admin/" | "/admin" => (301, String::new()),
            "/login" => (200, "<html><title>Login</title><form></form></html>".to_string()),
            "/search" if query.contains("%27") => (
                500,
                "You have an error in your SQL syntax near ''shoes'''".to_string(),
            ),
            "/search" => (200, "<html><title>Search</title>results</html>".to_string()),
            _ => (404, "not found".to_string()),
        };

        Ok(Response {
            status,
            headers: HeaderMap::new(),
            body,
            elapsed: Duration::from_millis(40),
            final_url: request.url.clone(),
        })
    }
}

#[tokio::test]
async fn test_discovery_then_injection_end_to_end() {
    let transport: Arc<dyn Transport> = Arc::new(FakeSite);

    // Phase one: path discovery.
    let prober = PathProber::new(Arc::clone(&transport), 8);
    let candidates = vec![
        "admin".to_string(),
        "login".to_string(),
        "backup.zip".to_string(),
        "search".to_string(),
    ];
    let report = prober.probe("http://site.test", &candidates).await.unwrap();

    assert_eq!(report.stats.total_issued, 4);
    assert_eq!(report.stats.total_found, 3);
    assert_eq!(report.stats.total_errors, 0);
    let found: Vec<&str> = report.results.iter().map(|r| r.url.as_str()).collect();
    assert!(found.iter().any(|u| u.contains("/login")));
    assert!(found.iter().any(|u| u.contains("/admin")));
    assert!(!found.iter().any(|u| u.contains("backup.zip")));

    // Phase two: injection probing against the discovered search endpoint.
    let url = Url::parse("http://site.test/search?q=shoes").unwrap();
    let baseline_request = HttpRequest::get(url.clone());
    let baseline = transport.request(&baseline_request).await.unwrap();
    let parameters: Vec<Parameter> = extract_query_parameters(&url);
    assert_eq!(parameters.len(), 1);

    let injector = InjectionProber::new(
        Arc::clone(&transport),
        PayloadSet::builtin(),
        DetectionConfig::default(),
    );
    let findings = injector.probe_injection(&url, &baseline, &parameters).await;

    let error_based: Vec<_> = findings
        .iter()
        .filter(|f| f.kind == FindingKind::ErrorBased)
        .collect();
    assert_eq!(error_based.len(), 1);
    assert_eq!(error_based[0].parameter.as_deref(), Some("q"));
    assert!(error_based[0].evidence.contains("SQL syntax"));
}
