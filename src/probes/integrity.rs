//! Integrity failures probe: subresource integrity on cross-origin tags
//! and unsafe deserialization call patterns

use crate::http::HttpClient;
use crate::models::{Finding, ProbeCategory, Severity};
use crate::signatures;
use scraper::{Html, Selector};
use url::Url;

use super::{fetch, Tuning};

/// Inspects external script/link tags and scans for deserialization calls
pub async fn probe(client: &HttpClient, url: &str, _tuning: &Tuning) -> Vec<Finding> {
    let mut findings = Vec::new();

    let body = match fetch(client, url).await {
        Some((_, body)) => body,
        None => return findings,
    };

    let unprotected = cross_origin_tags_without_integrity(url, &body);
    if !unprotected.is_empty() {
        findings.push(
            Finding::new(url, ProbeCategory::IntegrityFailures, Severity::Medium).with_evidence(
                format!(
                    "Cross-origin resources without an integrity attribute: {}",
                    unprotected.join(", ")
                ),
            ),
        );
    }

    if let Some(label) = signatures::contains_any(&body, signatures::DESERIALIZATION_MARKERS) {
        findings.push(
            Finding::new(url, ProbeCategory::IntegrityFailures, Severity::High)
                .with_evidence(format!("Response references {label}")),
        );
    }

    findings
}

/// Returns cross-origin script/stylesheet URLs lacking `integrity`
fn cross_origin_tags_without_integrity(base_url: &str, html: &str) -> Vec<String> {
    let base = match Url::parse(base_url) {
        Ok(u) => u,
        Err(_) => return Vec::new(),
    };

    let document = Html::parse_document(html);
    let mut unprotected = Vec::new();

    let selectors = [("script[src]", "src"), ("link[rel=stylesheet][href]", "href")];

    for (sel_str, attr) in &selectors {
        let selector = match Selector::parse(sel_str) {
            Ok(s) => s,
            Err(_) => continue,
        };
        for element in document.select(&selector) {
            let src = match element.value().attr(attr) {
                Some(s) => s,
                None => continue,
            };
            let resolved = match Url::parse(src).or_else(|_| base.join(src)) {
                Ok(u) => u,
                Err(_) => continue,
            };
            if resolved.host_str() != base.host_str()
                && element.value().attr("integrity").is_none()
            {
                unprotected.push(resolved.to_string());
            }
        }
    }

    unprotected
}
