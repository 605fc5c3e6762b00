//! Reflected XSS probe
//!
//! Payloads wrap a unique random marker so matches cannot come from
//! content that was already on the page.

use crate::http::HttpClient;
use crate::models::{Finding, ProbeCategory, Severity};
use rand::distributions::Alphanumeric;
use rand::Rng;

use super::{fetch, inject_param, pause, query_params, Tuning};

fn unique_marker() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();
    format!("vx{}", suffix.to_lowercase())
}

/// Injects script/event-handler payloads and looks for verbatim reflection
pub async fn probe(client: &HttpClient, url: &str, tuning: &Tuning) -> Vec<Finding> {
    let mut findings = Vec::new();

    let mut params = query_params(url);
    if params.is_empty() {
        params.push("q".to_string());
    }

    let marker = unique_marker();
    let payloads = [
        format!("<script>{marker}</script>"),
        format!("\"><img src=x onerror={marker}>"),
        format!("<svg onload={marker}>"),
    ];

    for param in &params {
        for payload in &payloads {
            let test_url = match inject_param(url, param, payload) {
                Some(u) => u,
                None => continue,
            };
            if let Some((_, body)) = fetch(client, &test_url).await {
                if body.contains(payload.as_str()) || body.contains(marker.as_str()) {
                    findings.push(
                        Finding::new(url, ProbeCategory::Xss, Severity::High)
                            .with_payload(payload.clone())
                            .with_evidence(format!(
                                "Parameter '{param}' reflects the injected payload verbatim \
                                 (marker {marker})"
                            )),
                    );
                    break;
                }
            }
            pause(tuning).await;
        }
    }

    findings
}
