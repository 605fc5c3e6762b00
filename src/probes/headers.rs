//! Security headers probe: one GET, declarative expected-header table

use crate::http::HttpClient;
use crate::models::{Finding, ProbeCategory, Severity};

use super::Tuning;

struct HeaderCheck {
    name: &'static str,
    severity: Severity,
    description: &'static str,
}

const EXPECTED_HEADERS: &[HeaderCheck] = &[
    HeaderCheck {
        name: "Content-Security-Policy",
        severity: Severity::Medium,
        description: "mitigates XSS and injection of external resources",
    },
    HeaderCheck {
        name: "Strict-Transport-Security",
        severity: Severity::Medium,
        description: "enforces HTTPS for returning visitors",
    },
    HeaderCheck {
        name: "X-Frame-Options",
        severity: Severity::Medium,
        description: "prevents clickjacking via framing",
    },
    HeaderCheck {
        name: "X-Content-Type-Options",
        severity: Severity::Low,
        description: "prevents MIME-type sniffing",
    },
    HeaderCheck {
        name: "Referrer-Policy",
        severity: Severity::Low,
        description: "limits referrer leakage to third parties",
    },
    HeaderCheck {
        name: "Permissions-Policy",
        severity: Severity::Low,
        description: "restricts powerful browser features",
    },
];

/// Inspects response headers for missing protections and version leaks
pub async fn probe(client: &HttpClient, url: &str, _tuning: &Tuning) -> Vec<Finding> {
    let mut findings = Vec::new();

    let response = match client.get(url).await {
        Ok(r) => r,
        Err(_) => return findings,
    };
    let headers = response.headers();

    for check in EXPECTED_HEADERS {
        if headers.get(check.name).is_none() {
            findings.push(
                Finding::new(url, ProbeCategory::Headers, check.severity.clone()).with_evidence(
                    format!("Missing {} header ({})", check.name, check.description),
                ),
            );
        }
    }

    if let Some(server) = headers.get("Server").and_then(|v| v.to_str().ok()) {
        if server.chars().any(|c| c.is_ascii_digit()) {
            findings.push(
                Finding::new(url, ProbeCategory::Headers, Severity::Low)
                    .with_evidence(format!("Server header reveals version: {server}")),
            );
        }
    }

    if let Some(powered) = headers.get("X-Powered-By").and_then(|v| v.to_str().ok()) {
        findings.push(
            Finding::new(url, ProbeCategory::Headers, Severity::Low)
                .with_evidence(format!("X-Powered-By reveals technology: {powered}")),
        );
    }

    findings
}
