use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::{stream, StreamExt};
use log::{debug, info, warn};
use serde::Serialize;
use tokio::time::timeout;
use url::Url;

use crate::core::classifier::{self, ProbeResult};
use crate::error::ConfigError;
use crate::http::{HttpRequest, Transport};
use crate::utils::normalize_target;

/// Hard ceiling on in-flight requests, regardless of what the caller asks
/// for. Bounds outbound connection pressure on the target and on the local
/// network stack.
pub const MAX_CONCURRENCY: usize = 200;

/// Guard against a hung future even if the transport's own timeout
/// misbehaves. Intentionally independent of the configurable request timeout.
const COLLECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Running totals for one prober invocation. Only the aggregation loop in
/// `probe` writes these, so readers of the final value observe exactly one
/// contribution per issued request.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatistics {
    pub total_issued: usize,
    pub total_found: usize,
    pub total_errors: usize,
    pub elapsed: Duration,
}

impl ScanStatistics {
    pub fn requests_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 { self.total_issued as f64 / secs } else { 0.0 }
    }
}

/// Everything a discovery run produces: retained results in completion order
/// plus the final statistics.
#[derive(Debug)]
pub struct ProbeReport {
    pub results: Vec<ProbeResult>,
    pub stats: ScanStatistics,
}

enum Outcome {
    Found(ProbeResult),
    Absent,
    Error,
    Skipped,
}

/// Bounded-concurrency path discovery prober.
///
/// Walks a candidate-path list against a base URL, classifies each response,
/// and returns the retained results plus statistics. Per-request failures are
/// counted and skipped; only configuration problems abort before work begins.
pub struct PathProber {
    transport: Arc<dyn Transport>,
    concurrency: usize,
    collect_timeout: Duration,
    stop: Arc<AtomicBool>,
}

impl PathProber {
    pub fn new(transport: Arc<dyn Transport>, concurrency: usize) -> Self {
        Self {
            transport,
            concurrency,
            collect_timeout: COLLECT_TIMEOUT,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for signalling a global stop (e.g. from a Ctrl+C handler).
    /// In-flight requests finish or time out; no new work is dispatched.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Probes every candidate path under `base_url`.
    ///
    /// Results preserve completion order, not input order. After a completed
    /// (non-cancelled) run, `stats.total_issued` equals `candidates.len()`.
    pub async fn probe(&self, base_url: &str, candidates: &[String]) -> Result<ProbeReport, ConfigError> {
        if candidates.is_empty() {
            return Err(ConfigError::EmptyCandidateSet);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        let base = normalize_target(base_url)?;
        let concurrency = self.concurrency.min(MAX_CONCURRENCY);

        info!(
            "starting path probe on {} ({} candidates, {} workers)",
            base, candidates.len(), concurrency
        );

        let started = Instant::now();
        let mut stats = ScanStatistics::default();
        let mut results = Vec::new();

        let mut outcomes = stream::iter(candidates)
            .map(|candidate| {
                let transport = Arc::clone(&self.transport);
                let stop = Arc::clone(&self.stop);
                let collect_timeout = self.collect_timeout;
                let joined = join_candidate(&base, candidate);

                async move {
                    if stop.load(Ordering::Relaxed) {
                        return Outcome::Skipped;
                    }
                    let url = match joined {
                        Ok(url) => url,
                        Err(e) => {
                            warn!("failed to join candidate path: {}", e);
                            return Outcome::Error;
                        }
                    };
                    let request = HttpRequest::get(url.clone());
                    match timeout(collect_timeout, transport.request(&request)).await {
                        Err(_) => {
                            debug!("result collection timed out for {}", url);
                            Outcome::Error
                        }
                        Ok(Err(e)) => {
                            debug!("request to {} failed: {}", url, e);
                            Outcome::Error
                        }
                        Ok(Ok(response)) => match classifier::classify(&url, &response) {
                            Some(result) => Outcome::Found(result),
                            None => Outcome::Absent,
                        },
                    }
                }
            })
            .buffer_unordered(concurrency);

        // Single aggregation point: this loop is the only writer of the
        // statistics and the results vector.
        while let Some(outcome) = outcomes.next().await {
            match outcome {
                Outcome::Skipped => continue,
                Outcome::Found(result) => {
                    stats.total_issued += 1;
                    stats.total_found += 1;
                    debug!("found {} ({})", result.url, result.status);
                    results.push(result);
                }
                Outcome::Absent => stats.total_issued += 1,
                Outcome::Error => {
                    stats.total_issued += 1;
                    stats.total_errors += 1;
                }
            }
        }

        stats.elapsed = started.elapsed();
        info!(
            "path probe finished: {} issued, {} found, {} errors in {:.2}s",
            stats.total_issued, stats.total_found, stats.total_errors,
            stats.elapsed.as_secs_f64()
        );

        Ok(ProbeReport { results, stats })
    }
}

/// Joins a candidate path to the base URL. Leading slashes are stripped so
/// the result always stays under the base URL's path prefix.
fn join_candidate(base: &Url, candidate: &str) -> Result<Url, url::ParseError> {
    let trimmed = candidate.trim_start_matches('/');
    let mut base_str = base.as_str().trim_end_matches('/').to_string();
    base_str.push('/');
    Url::parse(&base_str)?.join(trimmed)
}
