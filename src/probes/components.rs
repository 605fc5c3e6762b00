//! Vulnerable components probe: known-old version signatures in the
//! Server banner and response body

use crate::http::HttpClient;
use crate::models::{Finding, ProbeCategory, Severity};
use crate::signatures;

use super::Tuning;

/// Matches the Server header and body against the outdated-version table
pub async fn probe(client: &HttpClient, url: &str, _tuning: &Tuning) -> Vec<Finding> {
    let mut findings = Vec::new();

    let response = match client.get(url).await {
        Ok(r) => r,
        Err(_) => return findings,
    };

    let server = response
        .headers()
        .get("server")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let powered = response
        .headers()
        .get("x-powered-by")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let banner = format!("{server} {powered}");
    for label in signatures::match_all(&banner, signatures::VERSION_SIGNATURES) {
        findings.push(
            Finding::new(url, ProbeCategory::VulnerableComponents, Severity::High)
                .with_evidence(format!("Server banner matches {label}: {banner}")),
        );
    }

    let body = response.text().await.unwrap_or_default();
    for label in signatures::match_all(&body, signatures::VERSION_SIGNATURES) {
        // Banner findings already cover duplicated labels
        if findings.iter().any(|f| f.evidence.contains(label)) {
            continue;
        }
        findings.push(
            Finding::new(url, ProbeCategory::VulnerableComponents, Severity::Medium)
                .with_evidence(format!("Response body matches {label}")),
        );
    }

    findings
}
