//! Logging failures probe: payloads crafted to trigger verbose errors

use crate::http::HttpClient;
use crate::models::{Finding, ProbeCategory, Severity};
use crate::signatures;

use super::{fetch, inject_param, pause, query_params, Tuning};

const PAYLOADS: &[&str] = &[
    "../../../../vigil_missing_path",
    "{{7*7}}",
    "${7*7}",
    "%00",
];

/// Injects error-triggering payloads and looks for stack-trace phrasing
pub async fn probe(client: &HttpClient, url: &str, tuning: &Tuning) -> Vec<Finding> {
    let mut findings = Vec::new();

    let mut params = query_params(url);
    if params.is_empty() {
        params.push("input".to_string());
    }

    // Routes that already leak traces on a benign request are reported
    // once, without crediting a payload.
    let baseline_leak = match fetch(client, url).await {
        Some((_, body)) => signatures::match_first(&body, signatures::STACK_TRACE_MARKERS),
        None => None,
    };
    if let Some(marker) = baseline_leak {
        findings.push(
            Finding::new(url, ProbeCategory::LoggingFailures, Severity::Medium)
                .with_evidence(format!("Route leaks {marker} on an ordinary request")),
        );
        return findings;
    }

    for param in &params {
        for payload in PAYLOADS {
            let test_url = match inject_param(url, param, payload) {
                Some(u) => u,
                None => continue,
            };
            if let Some((_, body)) = fetch(client, &test_url).await {
                if let Some(marker) =
                    signatures::match_first(&body, signatures::STACK_TRACE_MARKERS)
                {
                    findings.push(
                        Finding::new(url, ProbeCategory::LoggingFailures, Severity::Medium)
                            .with_payload(*payload)
                            .with_evidence(format!(
                                "Parameter '{param}' triggered {marker} in the response"
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
