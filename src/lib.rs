pub mod core;
pub mod detect;
pub mod error;
pub mod http;
pub mod utils;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use crate::core::classifier::ProbeResult;
pub use crate::core::coordinator::InjectionProber;
pub use crate::core::prober::{PathProber, ProbeReport, ScanStatistics};
pub use crate::core::{Confidence, Finding, VulnerabilityType};
pub use crate::error::{ConfigError, TransportError};
pub use crate::http::{HttpClient, HttpRequest, Response, Transport};
pub use crate::utils::payloads::PayloadSet;
pub use crate::utils::read_lines;

/// Shared scan configuration consumed by the prober and the injection
/// coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanConfig {
    pub target: String,
    pub threads: usize,
    pub timeout: u64,
    pub proxy: String,
    pub headers: String,
    pub detection: DetectionConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            threads: 50,
            timeout: 10,
            proxy: String::new(),
            headers: String::new(),
            detection: DetectionConfig::default(),
        }
    }
}

impl ScanConfig {
    pub fn header_list(&self) -> Vec<String> {
        if self.headers.is_empty() {
            Vec::new()
        } else {
            self.headers
                .split(';')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }
    }

    pub fn parsed_headers(&self) -> Vec<(String, String)> {
        parse_custom_headers(&self.header_list())
    }

    pub fn proxy_ref(&self) -> Option<&str> {
        if self.proxy.is_empty() { None } else { Some(&self.proxy) }
    }
}

/// Detection policy knobs. The boolean-differential and timing thresholds are
/// heuristics inherited from field use, kept configurable rather than derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectionConfig {
    /// Boolean strategy: minimum true/false content-length difference.
    pub pair_difference: usize,
    /// Boolean strategy: "close to baseline" band, in characters.
    pub baseline_near: usize,
    /// Boolean strategy: "far from baseline" band, in characters.
    pub baseline_far: usize,
    /// Timing strategy: minimum delay over baseline to confirm.
    pub trigger_delay: Duration,
    /// Timing strategy: delay over baseline for High confidence.
    pub high_delay: Duration,
    /// Per-strategy payload caps. Only a fixed prefix of each payload list is
    /// tried; a full sweep trades too much throughput for recall.
    pub error_payload_cap: usize,
    pub time_payload_cap: usize,
    pub boolean_pair_cap: usize,
    pub xss_payload_cap: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            pair_difference: 100,
            baseline_near: 50,
            baseline_far: 200,
            trigger_delay: Duration::from_secs(5),
            high_delay: Duration::from_secs(10),
            error_payload_cap: 15,
            time_payload_cap: 10,
            boolean_pair_cap: 4,
            xss_payload_cap: 20,
        }
    }
}

pub fn parse_custom_headers(raw: &[String]) -> Vec<(String, String)> {
    raw.iter().filter_map(|h| {
        let mut parts = h.splitn(2, ':');
        let key = parts.next()?.trim().to_string();
        let val = parts.next().unwrap_or("").trim().to_string();
        if key.is_empty() { return None; }
        Some((key, val))
    }).collect()
}
