//! SQL injection probe (error-based and boolean-based)

use crate::http::HttpClient;
use crate::models::{Finding, ProbeCategory, Severity};
use crate::signatures;
use tracing::debug;

use super::{fetch, inject_param, pause, query_params, Tuning};

const ERROR_PAYLOADS: &[&str] = &[
    "'",
    "\"",
    "' OR 1=1--",
    "' OR '1'='1",
    "' UNION SELECT NULL--",
];

const TRUE_PAYLOAD: &str = "' OR '1'='1";
const FALSE_PAYLOAD: &str = "' OR '1'='2";

const BENIGN_VALUE: &str = "vigilbaseline123";

/// Injects quoted/boolean/union payloads into each query parameter
pub async fn probe(client: &HttpClient, url: &str, tuning: &Tuning) -> Vec<Finding> {
    let mut findings = Vec::new();

    let mut params = query_params(url);
    if params.is_empty() {
        // Search-shaped routes are planned for sqli even without a query
        // string; inject into the conventional parameter.
        params.push("q".to_string());
    }

    for param in &params {
        let baseline = match inject_param(url, param, BENIGN_VALUE) {
            Some(benign_url) => fetch(client, &benign_url).await.map(|(_, body)| body),
            None => None,
        };
        let baseline_has_error = baseline
            .as_deref()
            .map(|body| signatures::match_first(body, signatures::SQL_ERRORS).is_some())
            .unwrap_or(false);

        // Error-based
        let mut found = false;
        for payload in ERROR_PAYLOADS {
            let test_url = match inject_param(url, param, payload) {
                Some(u) => u,
                None => continue,
            };
            if let Some((_, body)) = fetch(client, &test_url).await {
                if let Some(db_type) = signatures::match_first(&body, signatures::SQL_ERRORS) {
                    if baseline_has_error {
                        debug!("SQL error signature already present in baseline for {param}");
                        continue;
                    }
                    findings.push(
                        Finding::new(url, ProbeCategory::Sqli, Severity::Critical)
                            .with_payload(*payload)
                            .with_evidence(format!(
                                "Parameter '{param}' returned a {db_type} error signature"
                            )),
                    );
                    found = true;
                    break;
                }
            }
            pause(tuning).await;
        }

        if found {
            continue;
        }

        // Boolean-based: compare true/false condition responses
        let true_url = inject_param(url, param, TRUE_PAYLOAD);
        let false_url = inject_param(url, param, FALSE_PAYLOAD);
        if let (Some(true_url), Some(false_url)) = (true_url, false_url) {
            let true_body = fetch(client, &true_url).await.map(|(_, b)| b);
            pause(tuning).await;
            let false_body = fetch(client, &false_url).await.map(|(_, b)| b);

            if let (Some(true_body), Some(false_body)) = (true_body, false_body) {
                let delta = true_body.len().abs_diff(false_body.len());
                let reference = false_body.len().max(1);
                let ratio = delta as f64 / reference as f64;

                if ratio > tuning.boolean_delta_ratio && true_body.len() > 100 {
                    findings.push(
                        Finding::new(url, ProbeCategory::Sqli, Severity::High)
                            .with_payload(TRUE_PAYLOAD)
                            .with_evidence(format!(
                                "Parameter '{param}': true/false responses differ by {delta} bytes \
                                 ({} vs {})",
                                true_body.len(),
                                false_body.len()
                            )),
                    );
                }
            }
        }
        pause(tuning).await;
    }

    findings
}
