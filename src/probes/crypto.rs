//! Cryptographic failures probe: transport scheme, leaked secrets,
//! cookie flags

use crate::http::HttpClient;
use crate::models::{Finding, ProbeCategory, Severity};
use crate::signatures;
use url::Url;

use super::Tuning;

/// Inspects scheme, body, and cookies for cryptographic weaknesses
pub async fn probe(client: &HttpClient, url: &str, _tuning: &Tuning) -> Vec<Finding> {
    let mut findings = Vec::new();

    if let Ok(parsed) = Url::parse(url) {
        if parsed.scheme() == "http" {
            findings.push(
                Finding::new(url, ProbeCategory::CryptographicFailures, Severity::High)
                    .with_evidence("Route is served over plaintext HTTP".to_string()),
            );
        }
    }

    let response = match client.get(url).await {
        Ok(r) => r,
        Err(_) => return findings,
    };

    let weak_cookies: Vec<String> = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|cookie| {
            let lower = cookie.to_lowercase();
            !lower.contains("secure") || !lower.contains("httponly")
        })
        .map(|cookie| cookie.split(';').next().unwrap_or(cookie).to_string())
        .collect();

    if !weak_cookies.is_empty() {
        findings.push(
            Finding::new(url, ProbeCategory::CryptographicFailures, Severity::Medium)
                .with_evidence(format!(
                    "Cookies set without Secure/HttpOnly: {}",
                    weak_cookies.join(", ")
                )),
        );
    }

    let body = response.text().await.unwrap_or_default();
    for label in signatures::match_all(&body, signatures::SECRET_PATTERNS) {
        findings.push(
            Finding::new(url, ProbeCategory::CryptographicFailures, Severity::High)
                .with_evidence(format!("Response body contains {label}")),
        );
    }

    findings
}
