//! Insecure design probe: request-burst rate limiting check and common
//! admin/debug path exposure

use crate::http::HttpClient;
use crate::models::{Finding, ProbeCategory, Severity};
use tokio::task::JoinSet;
use url::Url;

use super::{fetch, pause, Tuning};

const ADMIN_DEBUG_PATHS: &[&str] = &[
    "/admin",
    "/administrator",
    "/debug",
    "/console",
    "/actuator",
    "/phpinfo.php",
    "/server-status",
];

/// Bursts identical requests and probes well-known admin/debug paths
pub async fn probe(client: &HttpClient, url: &str, tuning: &Tuning) -> Vec<Finding> {
    let mut findings = Vec::new();

    // Burst of identical concurrent requests; all succeeding suggests
    // no rate limiting is in place.
    let mut set = JoinSet::new();
    for _ in 0..tuning.burst_size {
        let client = client.clone();
        let url = url.to_string();
        set.spawn(async move { fetch(&client, &url).await });
    }

    let mut successes = 0usize;
    let mut completed = 0usize;
    while let Some(joined) = set.join_next().await {
        if let Ok(Some((status, _))) = joined {
            completed += 1;
            if status < 400 {
                successes += 1;
            }
        }
    }

    if completed == tuning.burst_size && successes == tuning.burst_size {
        findings.push(
            Finding::new(url, ProbeCategory::InsecureDesign, Severity::Medium).with_evidence(
                format!(
                    "{} concurrent identical requests all succeeded; no rate limiting detected",
                    tuning.burst_size
                ),
            ),
        );
    }

    // Common admin/debug paths on the same origin
    let origin = match Url::parse(url) {
        Ok(parsed) => parsed.origin().ascii_serialization(),
        Err(_) => return findings,
    };

    for path in ADMIN_DEBUG_PATHS {
        let probe_url = format!("{origin}{path}");
        if let Some((200, _)) = fetch(client, &probe_url).await {
            findings.push(
                Finding::new(url, ProbeCategory::InsecureDesign, Severity::High)
                    .with_payload(probe_url.clone())
                    .with_evidence(format!("Debug/admin path {path} returned 200")),
            );
        }
        pause(tuning).await;
    }

    findings
}
