use std::sync::Arc;

use log::{debug, info};
use url::Url;

use crate::core::mutator::{build_mutated_request, Parameter};
use crate::core::{Confidence, Finding, FindingDetail, FindingKind, VulnerabilityType};
use crate::detect::{boolean, dom_sinks, error_sql, reflection, timing};
use crate::http::{Response, Transport};
use crate::utils::payloads::PayloadSet;
use crate::DetectionConfig;

/// Drives the detection strategies against one target URL's parameters.
///
/// Strategies run sequentially per parameter, in fixed priority: the
/// error-signature check is the cheapest and most specific, so it goes
/// first; the blind strategies (timing, then boolean) are dropped entirely
/// once any error-based confirmation exists for the target. Each strategy
/// stops on its first confirming payload, so a parameter yields at most one
/// finding per strategy.
pub struct InjectionProber {
    transport: Arc<dyn Transport>,
    payloads: PayloadSet,
    config: DetectionConfig,
}

impl InjectionProber {
    pub fn new(transport: Arc<dyn Transport>, payloads: PayloadSet, config: DetectionConfig) -> Self {
        Self { transport, payloads, config }
    }

    /// Probes every parameter of `url` against the SQLi and reflected-XSS
    /// strategies, then scans the baseline body for DOM sinks. The baseline
    /// response must come from the unmutated request; every differential
    /// verdict is measured against it.
    pub async fn probe_injection(
        &self,
        url: &Url,
        baseline: &Response,
        parameters: &[Parameter],
    ) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut error_seen = false;

        for parameter in parameters {
            debug!("probing parameter {} on {}", parameter.name, url);

            if let Some(finding) = self.error_pass(url, parameters, parameter).await {
                info!("error-based SQLi on {} [{}]", url, parameter.name);
                findings.push(finding);
                error_seen = true;
            }

            // A visible database error already proves injection for this
            // target; the blind strategies would only re-confirm it, and the
            // timing one at multi-second cost per payload.
            if !error_seen {
                if let Some(finding) = self.timing_pass(url, baseline, parameters, parameter).await {
                    info!("time-based SQLi on {} [{}]", url, parameter.name);
                    findings.push(finding);
                }

                if let Some(finding) = self.boolean_pass(url, baseline, parameters, parameter).await {
                    info!("boolean-based SQLi on {} [{}]", url, parameter.name);
                    findings.push(finding);
                }
            }

            if let Some(finding) = self.reflection_pass(url, parameters, parameter).await {
                info!("reflected XSS on {} [{}]", url, parameter.name);
                findings.push(finding);
            }
        }

        findings.extend(self.dom_pass(url, baseline));

        findings
    }

    async fn error_pass(
        &self,
        url: &Url,
        parameters: &[Parameter],
        target: &Parameter,
    ) -> Option<Finding> {
        let cap = self.config.error_payload_cap;
        for payload in self.payloads.sqli_error.iter().take(cap) {
            let Some(response) = self.send(url, parameters, target, payload).await else {
                continue;
            };
            if let Some(matched) = error_sql::check(&response.body) {
                return Some(Finding {
                    vuln_type: VulnerabilityType::Sqli,
                    kind: FindingKind::ErrorBased,
                    url: url.to_string(),
                    parameter: Some(target.name.clone()),
                    payload: Some(payload.clone()),
                    confidence: matched.confidence,
                    evidence: matched.evidence,
                    detail: Some(FindingDetail::Database { engine: matched.engine }),
                });
            }
        }
        None
    }

    async fn timing_pass(
        &self,
        url: &Url,
        baseline: &Response,
        parameters: &[Parameter],
        target: &Parameter,
    ) -> Option<Finding> {
        let cap = self.config.time_payload_cap;
        for payload in self.payloads.sqli_time.iter().take(cap) {
            let Some(response) = self.send(url, parameters, target, payload).await else {
                continue;
            };
            if let Some(matched) = timing::evaluate(baseline.elapsed, response.elapsed, &self.config)
            {
                return Some(Finding {
                    vuln_type: VulnerabilityType::Sqli,
                    kind: FindingKind::TimeBased,
                    url: url.to_string(),
                    parameter: Some(target.name.clone()),
                    payload: Some(payload.clone()),
                    confidence: matched.confidence,
                    evidence: format!(
                        "response delayed {:.1}s over a {:.1}s baseline",
                        matched.delta.as_secs_f64(),
                        baseline.elapsed.as_secs_f64()
                    ),
                    detail: Some(FindingDetail::Timing {
                        baseline_ms: baseline.elapsed.as_millis(),
                        response_ms: response.elapsed.as_millis(),
                        delay_ms: matched.delta.as_millis(),
                    }),
                });
            }
        }
        None
    }

    async fn boolean_pass(
        &self,
        url: &Url,
        baseline: &Response,
        parameters: &[Parameter],
        target: &Parameter,
    ) -> Option<Finding> {
        let cap = self.config.boolean_pair_cap;
        for pair in self.payloads.sqli_boolean.iter().take(cap) {
            let Some(true_resp) = self.send(url, parameters, target, &pair.true_payload).await
            else {
                continue;
            };
            let Some(false_resp) = self.send(url, parameters, target, &pair.false_payload).await
            else {
                continue;
            };
            if let Some(matched) = boolean::evaluate(baseline, &true_resp, &false_resp, &self.config)
            {
                // The differential is binary by construction, so the verdict
                // is always High.
                return Some(Finding {
                    vuln_type: VulnerabilityType::Sqli,
                    kind: FindingKind::BooleanBased,
                    url: url.to_string(),
                    parameter: Some(target.name.clone()),
                    payload: Some(pair.true_payload.clone()),
                    confidence: Confidence::High,
                    evidence: matched.evidence,
                    detail: Some(FindingDetail::Lengths {
                        true_len: matched.true_len,
                        false_len: matched.false_len,
                        difference: matched.difference,
                    }),
                });
            }
        }
        None
    }

    async fn reflection_pass(
        &self,
        url: &Url,
        parameters: &[Parameter],
        target: &Parameter,
    ) -> Option<Finding> {
        let cap = self.config.xss_payload_cap;
        for payload in self.payloads.xss.iter().take(cap) {
            let Some(response) = self.send(url, parameters, target, payload).await else {
                continue;
            };
            if reflection::is_reflected(payload, &response.body) {
                let confidence = reflection::confidence(payload, &response.body);
                return Some(Finding {
                    vuln_type: VulnerabilityType::Xss,
                    kind: FindingKind::Reflected,
                    url: url.to_string(),
                    parameter: Some(target.name.clone()),
                    payload: Some(payload.clone()),
                    confidence,
                    evidence: reflection::extract_evidence(payload, &response.body),
                    detail: None,
                });
            }
        }
        None
    }

    /// Page-level DOM-sink heuristic, independent of the parameter loop.
    fn dom_pass(&self, url: &Url, baseline: &Response) -> Vec<Finding> {
        dom_sinks::scan(&baseline.body)
            .into_iter()
            .map(|sink| Finding {
                vuln_type: VulnerabilityType::Xss,
                kind: FindingKind::DomSink,
                url: url.to_string(),
                parameter: None,
                payload: None,
                confidence: Confidence::Medium,
                evidence: sink.evidence,
                detail: Some(FindingDetail::Sink { sink: sink.sink.to_string() }),
            })
            .collect()
    }

    /// Sends one mutated request. A transport failure skips the payload
    /// rather than aborting the pass; flaky targets lose one data point, not
    /// the whole scan.
    async fn send(
        &self,
        url: &Url,
        parameters: &[Parameter],
        target: &Parameter,
        payload: &str,
    ) -> Option<Response> {
        let request = build_mutated_request(url, parameters, target, payload);
        match self.transport.request(&request).await {
            Ok(response) => Some(response),
            Err(e) => {
                debug!("request for payload {:?} on {} failed: {}", payload, target.name, e);
                None
            }
        }
    }
}
