//! SSRF probe: internal and metadata-service URLs into redirect/url-like
//! parameters

use crate::http::HttpClient;
use crate::models::{Finding, ProbeCategory, Severity};
use crate::signatures;
use std::time::Instant;

use super::{fetch, inject_param, pause, query_params, Tuning};

/// Parameter names that commonly carry URLs or redirect targets
const URL_PARAM_NAMES: &[&str] = &[
    "url", "uri", "redirect", "next", "dest", "destination", "callback", "return", "target",
    "link", "src",
];

const PAYLOADS: &[&str] = &[
    "http://169.254.169.254/latest/meta-data/",
    "http://metadata.google.internal/computeMetadata/v1/",
    "http://127.0.0.1/",
    "http://[::1]/",
];

/// Injects internal URLs and watches for latency, error phrasing, or
/// metadata leakage
pub async fn probe(client: &HttpClient, url: &str, tuning: &Tuning) -> Vec<Finding> {
    let mut findings = Vec::new();

    let url_params: Vec<String> = query_params(url)
        .into_iter()
        .filter(|param| {
            let lower = param.to_lowercase();
            URL_PARAM_NAMES.iter().any(|name| lower.contains(name))
        })
        .collect();

    if url_params.is_empty() {
        return findings;
    }

    for param in &url_params {
        for payload in PAYLOADS {
            let test_url = match inject_param(url, param, payload) {
                Some(u) => u,
                None => continue,
            };

            let started = Instant::now();
            let result = fetch(client, &test_url).await;
            let elapsed = started.elapsed();

            if let Some((_, body)) = result {
                if let Some(marker) =
                    signatures::contains_any(&body, signatures::CLOUD_METADATA_MARKERS)
                {
                    findings.push(
                        Finding::new(url, ProbeCategory::Ssrf, Severity::Critical)
                            .with_payload(*payload)
                            .with_evidence(format!(
                                "Response through '{param}' leaked {marker} content"
                            )),
                    );
                    return findings;
                }

                if let Some(marker) =
                    signatures::contains_any(&body, signatures::CONNECTION_ERROR_MARKERS)
                {
                    findings.push(
                        Finding::new(url, ProbeCategory::Ssrf, Severity::Medium)
                            .with_payload(*payload)
                            .with_evidence(format!(
                                "Server surfaced an outbound {marker} error for an internal \
                                 address via '{param}'"
                            )),
                    );
                    return findings;
                }

                if elapsed >= tuning.ssrf_latency {
                    findings.push(
                        Finding::new(url, ProbeCategory::Ssrf, Severity::High)
                            .with_payload(*payload)
                            .with_evidence(format!(
                                "Abnormal latency ({:.1}s) suggests the server attempted an \
                                 outbound connection via '{param}'",
                                elapsed.as_secs_f64()
                            )),
                    );
                    return findings;
                }
            }
            pause(tuning).await;
        }
    }

    findings
}
