//! IDOR probe: adjacent numeric IDs and common id-parameter values

use crate::http::HttpClient;
use crate::models::{Finding, ProbeCategory, Severity};
use regex::Regex;
use url::Url;

use super::{fetch, inject_param, pause, Tuning};

/// Parameter names commonly backing direct object references
const ID_PARAM_PATTERNS: &[&str] = &[
    r"^id$",
    r"^user_?id$",
    r"^account_?id$",
    r"^order_?id$",
    r"^doc_?id$",
    r"^file_?id$",
    r"^record_?id$",
    r"^item_?id$",
    r"^invoice_?id$",
];

/// Requests the route with adjacent identifier values and compares bodies
pub async fn probe(client: &HttpClient, url: &str, tuning: &Tuning) -> Vec<Finding> {
    let mut findings = Vec::new();

    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => return findings,
    };

    let id_regexes: Vec<Regex> = ID_PARAM_PATTERNS
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect();

    let id_params: Vec<(String, Option<i64>)> = parsed
        .query_pairs()
        .filter(|(k, _)| {
            let lower = k.to_lowercase();
            id_regexes.iter().any(|re| re.is_match(&lower))
        })
        .map(|(k, v)| (k.to_string(), v.parse::<i64>().ok()))
        .collect();

    if id_params.is_empty() {
        return findings;
    }

    for (param, numeric) in &id_params {
        match numeric {
            Some(original) => {
                // Baseline with the original identifier
                let baseline = match fetch(client, url).await {
                    Some((200, body)) if body.len() >= tuning.idor_min_body => body,
                    _ => continue,
                };
                pause(tuning).await;

                for adjacent in [original + 1, original.saturating_sub(1)] {
                    if adjacent == *original || adjacent < 0 {
                        continue;
                    }
                    let test_url = match inject_param(url, param, &adjacent.to_string()) {
                        Some(u) => u,
                        None => continue,
                    };
                    if let Some((200, body)) = fetch(client, &test_url).await {
                        if body.len() >= tuning.idor_min_body && body != baseline {
                            findings.push(
                                Finding::new(url, ProbeCategory::Idor, Severity::High)
                                    .with_payload(format!("{param}={adjacent}"))
                                    .with_evidence(format!(
                                        "Adjacent id {param}={adjacent} returned a distinct \
                                         {}-byte body (original {param}={original}: {} bytes)",
                                        body.len(),
                                        baseline.len()
                                    )),
                            );
                            return findings;
                        }
                    }
                    pause(tuning).await;
                }
            }
            None => {
                // Non-numeric id parameter: compare common values 1 vs 2
                let first = match inject_param(url, param, "1") {
                    Some(u) => fetch(client, &u).await,
                    None => None,
                };
                pause(tuning).await;
                let second = match inject_param(url, param, "2") {
                    Some(u) => fetch(client, &u).await,
                    None => None,
                };

                if let (Some((200, body_a)), Some((200, body_b))) = (first, second) {
                    if body_a.len() >= tuning.idor_min_body
                        && body_b.len() >= tuning.idor_min_body
                        && body_a != body_b
                    {
                        findings.push(
                            Finding::new(url, ProbeCategory::Idor, Severity::High)
                                .with_payload(format!("{param}=1 vs {param}=2"))
                                .with_evidence(format!(
                                    "Values 1 and 2 for '{param}' both returned 200 with \
                                     distinct bodies ({} vs {} bytes)",
                                    body_a.len(),
                                    body_b.len()
                                )),
                        );
                        return findings;
                    }
                }
            }
        }
    }

    findings
}
