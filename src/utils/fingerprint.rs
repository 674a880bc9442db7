use crate::http::Response;

/// Header-based technology signatures: (header name, lowercase substring,
/// technology). Loaded once, never mutated.
const HEADER_RULES: &[(&str, &str, &str)] = &[
    ("server", "apache", "Apache"),
    ("server", "nginx", "Nginx"),
    ("server", "microsoft-iis", "IIS"),
    ("server", "lighttpd", "Lighttpd"),
    ("server", "cloudflare", "Cloudflare"),
    ("server", "tomcat", "Tomcat"),
    ("x-powered-by", "php", "PHP"),
    ("x-powered-by", "express", "Express.js"),
    ("x-powered-by", "asp.net", "ASP.NET"),
    ("x-aspnet-version", "", "ASP.NET"),
    ("x-drupal-cache", "", "Drupal"),
    ("x-generator", "wordpress", "WordPress"),
];

/// Body-based signatures: (lowercase substring, technology).
const BODY_RULES: &[(&str, &str)] = &[
    ("wp-content", "WordPress"),
    ("wp-includes", "WordPress"),
    ("joomla", "Joomla"),
    ("drupal", "Drupal"),
    ("magento", "Magento"),
    ("laravel", "Laravel"),
    ("symfony", "Symfony"),
    ("django", "Django"),
];

/// Technology-specific candidate paths worth appending before a prober run.
const EXTRA_PATHS: &[(&str, &[&str])] = &[
    ("WordPress", &["wp-admin/", "wp-login.php", "wp-json/wp/v2/users", "xmlrpc.php"]),
    ("Joomla", &["administrator/", "configuration.php"]),
    ("Drupal", &["user/login", "CHANGELOG.txt"]),
    ("Laravel", &[".env", "storage/logs/laravel.log", "telescope"]),
    ("PHP", &["phpinfo.php", "info.php"]),
    ("ASP.NET", &["web.config", "trace.axd", "elmah.axd"]),
    ("Tomcat", &["manager/html", "host-manager/html"]),
];

/// Identifies technologies from a single response. Pure string matching
/// against the static tables; no feedback into probing logic.
pub fn fingerprint(response: &Response) -> Vec<&'static str> {
    let mut techs = Vec::new();

    for (header, pattern, tech) in HEADER_RULES {
        if let Some(value) = response.header(header) {
            if pattern.is_empty() || value.to_lowercase().contains(pattern) {
                techs.push(*tech);
            }
        }
    }

    let body_lower = response.body.to_lowercase();
    for (pattern, tech) in BODY_RULES {
        if body_lower.contains(pattern) {
            techs.push(*tech);
        }
    }

    techs.sort_unstable();
    techs.dedup();
    techs
}

/// Candidate paths to append for the given technologies.
pub fn extra_paths(technologies: &[&str]) -> Vec<String> {
    let mut paths = Vec::new();
    for (tech, tech_paths) in EXTRA_PATHS {
        if technologies.contains(tech) {
            paths.extend(tech_paths.iter().map(|p| p.to_string()));
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::response;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_fingerprint_from_server_header() {
        let mut resp = response(200, "");
        resp.headers.insert("server", HeaderValue::from_static("nginx/1.24.0"));
        assert_eq!(fingerprint(&resp), vec!["Nginx"]);
    }

    #[test]
    fn test_fingerprint_from_body() {
        let resp = response(200, r#"<link href="/wp-content/themes/x/style.css">"#);
        assert_eq!(fingerprint(&resp), vec!["WordPress"]);
    }

    #[test]
    fn test_fingerprint_dedups() {
        let mut resp = response(200, "wp-content wp-includes");
        resp.headers.insert("x-generator", HeaderValue::from_static("WordPress 6.4"));
        assert_eq!(fingerprint(&resp), vec!["WordPress"]);
    }

    #[test]
    fn test_extra_paths_for_detected_tech() {
        let paths = extra_paths(&["WordPress", "PHP"]);
        assert!(paths.contains(&"wp-login.php".to_string()));
        assert!(paths.contains(&"phpinfo.php".to_string()));
        assert!(!paths.contains(&"manager/html".to_string()));
    }

    #[test]
    fn test_no_tech_no_paths() {
        assert!(extra_paths(&[]).is_empty());
    }
}
