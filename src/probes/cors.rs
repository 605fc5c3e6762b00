//! CORS probe: cross-origin preflight with a hostile origin

use crate::http::HttpClient;
use crate::models::{Finding, ProbeCategory, ScanMode, Severity};
use tracing::debug;

use super::Tuning;

const HOSTILE_ORIGIN: &str = "https://evil.example";

/// Sends a preflight with a hostile Origin and inspects the grant
pub async fn probe(client: &HttpClient, url: &str, tuning: &Tuning) -> Vec<Finding> {
    let mut findings = Vec::new();

    let headers = vec![
        ("Origin".to_string(), HOSTILE_ORIGIN.to_string()),
        (
            "Access-Control-Request-Method".to_string(),
            "GET".to_string(),
        ),
    ];

    let response = match client.options(url, &headers).await {
        Ok(r) => r,
        Err(_) => return findings,
    };

    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let allow_credentials = response
        .headers()
        .get("access-control-allow-credentials")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    debug!("Preflight for {url}: allow-origin='{allow_origin}' credentials={allow_credentials}");

    if allow_origin == "*" {
        // Deep scans only flag the wildcard when credentials are also
        // granted; quick scans report the wildcard itself.
        match tuning.mode {
            ScanMode::Deep if allow_credentials => {
                findings.push(
                    Finding::new(url, ProbeCategory::Cors, Severity::High).with_evidence(
                        "Access-Control-Allow-Origin: * with Access-Control-Allow-Credentials: \
                         true"
                            .to_string(),
                    ),
                );
            }
            ScanMode::Deep => {}
            ScanMode::Quick => {
                findings.push(
                    Finding::new(url, ProbeCategory::Cors, Severity::Medium).with_evidence(
                        "Access-Control-Allow-Origin: * grants any origin".to_string(),
                    ),
                );
            }
        }
    } else if allow_origin == HOSTILE_ORIGIN {
        let severity = if allow_credentials {
            Severity::Critical
        } else {
            Severity::High
        };
        findings.push(
            Finding::new(url, ProbeCategory::Cors, severity).with_evidence(format!(
                "Server reflects arbitrary Origin '{HOSTILE_ORIGIN}' \
                 (Allow-Credentials: {allow_credentials})"
            )),
        );
    }

    findings
}
