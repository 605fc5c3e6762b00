//! Concurrent vulnerability probe engine
//!
//! For each URL, one task per planned category runs concurrently and all
//! are joined before the next URL; across URLs probing is sequential with
//! a politeness delay. Probes are best-effort and non-destructive: any
//! network or parse failure inside a probe yields zero findings and never
//! affects sibling probes.

pub mod components;
pub mod cors;
pub mod crypto;
pub mod csrf;
pub mod design;
pub mod headers;
pub mod idor;
pub mod integrity;
pub mod jwt;
pub mod logging;
pub mod sqli;
pub mod ssrf;
pub mod traversal;
pub mod versioning;
pub mod xss;

use crate::http::HttpClient;
use crate::models::{AuditConfig, Finding, ProbeCategory, ProbePlan, ScanMode};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::sleep;
use tracing::{debug, error, info};
use url::Url;

/// Detection thresholds. These are coarse heuristics kept in one place;
/// tests assert their triggering conditions, not real-world accuracy.
#[derive(Debug, Clone)]
pub struct Tuning {
    pub mode: ScanMode,
    /// Delay between payload attempts within a single probe
    pub payload_delay: Duration,
    /// Minimum response-length delta ratio for boolean-based SQLi
    pub boolean_delta_ratio: f64,
    /// Minimum body size for an IDOR comparison to be meaningful
    pub idor_min_body: usize,
    /// Concurrent identical requests in the rate-limit burst
    pub burst_size: usize,
    /// Latency above which an SSRF attempt counts as abnormal
    pub ssrf_latency: Duration,
    /// JWT expiries further out than this are flagged
    pub jwt_max_expiry_days: i64,
}

impl Tuning {
    pub fn from_config(config: &AuditConfig) -> Self {
        Self {
            mode: config.mode,
            payload_delay: Duration::from_millis(config.payload_delay_ms),
            boolean_delta_ratio: 0.10,
            idor_min_body: 100,
            burst_size: 5,
            ssrf_latency: Duration::from_secs(5),
            jwt_max_expiry_days: 365,
        }
    }
}

/// Runs planned probes against their URLs
pub struct ProbeEngine {
    client: HttpClient,
    tuning: Tuning,
    politeness_delay: Duration,
}

impl ProbeEngine {
    pub fn new(client: HttpClient, config: &AuditConfig) -> Self {
        Self {
            client,
            tuning: Tuning::from_config(config),
            politeness_delay: Duration::from_millis(config.politeness_delay_ms),
        }
    }

    /// Executes the whole plan and collects findings
    pub async fn run(&self, plan: &ProbePlan) -> Vec<Finding> {
        let mut urls: Vec<&String> = plan.keys().collect();
        urls.sort();

        let pb = ProgressBar::new(urls.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        let mut findings = Vec::new();
        for (index, url) in urls.iter().enumerate() {
            pb.set_message(format!("Probing {url}"));
            let categories = &plan[*url];
            let batch = self.run_url(url, categories).await;
            info!("Probed {url}: {} findings", batch.len());
            findings.extend(batch);
            pb.inc(1);

            if index + 1 < urls.len() {
                sleep(self.politeness_delay).await;
            }
        }
        pb.finish_with_message("Probing complete");

        findings
    }

    /// Fan-out/fan-in for one URL: one task per category, all joined
    /// before returning
    pub async fn run_url(&self, url: &str, categories: &HashSet<ProbeCategory>) -> Vec<Finding> {
        let mut ordered: Vec<ProbeCategory> = categories.iter().copied().collect();
        ordered.sort();

        let mut set = JoinSet::new();
        for category in ordered {
            let client = self.client.clone();
            let tuning = self.tuning.clone();
            let url = url.to_string();
            set.spawn(async move { dispatch(&client, &url, category, &tuning).await });
        }

        let mut findings = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(batch) => findings.extend(batch),
                Err(e) => error!("Probe task panicked: {e}"),
            }
        }
        findings
    }
}

/// Routes a category to its probe implementation
async fn dispatch(
    client: &HttpClient,
    url: &str,
    category: ProbeCategory,
    tuning: &Tuning,
) -> Vec<Finding> {
    debug!("Running {category} probe against {url}");
    match category {
        ProbeCategory::Sqli => sqli::probe(client, url, tuning).await,
        ProbeCategory::Xss => xss::probe(client, url, tuning).await,
        ProbeCategory::Idor => idor::probe(client, url, tuning).await,
        ProbeCategory::Csrf => csrf::probe(client, url, tuning).await,
        ProbeCategory::Cors => cors::probe(client, url, tuning).await,
        ProbeCategory::Headers => headers::probe(client, url, tuning).await,
        ProbeCategory::Jwt => jwt::probe(client, url, tuning).await,
        ProbeCategory::Ssrf => ssrf::probe(client, url, tuning).await,
        ProbeCategory::DirectoryTraversal => traversal::probe(client, url, tuning).await,
        ProbeCategory::CryptographicFailures => crypto::probe(client, url, tuning).await,
        ProbeCategory::InsecureDesign => design::probe(client, url, tuning).await,
        ProbeCategory::VulnerableComponents => components::probe(client, url, tuning).await,
        ProbeCategory::IntegrityFailures => integrity::probe(client, url, tuning).await,
        ProbeCategory::LoggingFailures => logging::probe(client, url, tuning).await,
        ProbeCategory::ApiVersioning => versioning::probe(client, url, tuning).await,
    }
}

/// Parameters that must never be injected into (tokens, nonces)
fn is_security_param(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("csrf")
        || lower.contains("token")
        || lower.contains("nonce")
        || lower.contains("captcha")
        || lower == "state"
}

/// Names of injectable query parameters on a URL
pub(crate) fn query_params(url: &str) -> Vec<String> {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .query_pairs()
            .map(|(k, _)| k.to_string())
            .filter(|k| !k.is_empty() && !is_security_param(k))
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Builds a test URL with `payload` substituted into `param`; the
/// parameter is appended when the URL does not already carry it
pub(crate) fn inject_param(base_url: &str, param: &str, payload: &str) -> Option<String> {
    let mut parsed = Url::parse(base_url).ok()?;
    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| {
            if k == param {
                (k.to_string(), payload.to_string())
            } else {
                (k.to_string(), v.to_string())
            }
        })
        .collect();

    let has_param = pairs.iter().any(|(k, _)| k == param);
    parsed.set_query(None);
    let mut query_parts: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
    if !has_param {
        query_parts.push(format!("{param}={payload}"));
    }
    parsed.set_query(Some(&query_parts.join("&")));
    Some(parsed.to_string())
}

/// GET returning (status, body), or None on any failure
pub(crate) async fn fetch(client: &HttpClient, url: &str) -> Option<(u16, String)> {
    let response = client.get(url).await.ok()?;
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Some((status, body))
}

/// Inter-payload politeness pause
pub(crate) async fn pause(tuning: &Tuning) {
    sleep(tuning.payload_delay).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_param_replaces_and_appends() {
        let replaced = inject_param("https://s.test/search?q=1&page=2", "q", "payload")
            .expect("valid url");
        assert!(replaced.contains("q=payload"));
        assert!(replaced.contains("page=2"));

        let appended = inject_param("https://s.test/search", "q", "x").expect("valid url");
        assert!(appended.ends_with("?q=x"));
    }

    #[test]
    fn test_query_params_skips_security_names() {
        let params = query_params("https://s.test/x?q=1&csrf_token=abc&state=z");
        assert_eq!(params, vec!["q"]);
    }

    #[test]
    fn test_quote_payload_is_percent_encoded() {
        let url = inject_param("https://site.test/search?q=1", "q", "' OR 1=1--")
            .expect("valid url");
        assert!(url.ends_with("q=%27%20OR%201=1--"), "got {url}");
    }
}
