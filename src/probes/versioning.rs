//! API versioning probe: older version path segments left reachable

use crate::http::HttpClient;
use crate::models::{Finding, ProbeCategory, Severity};
use regex::Regex;
use url::Url;

use super::{fetch, pause, Tuning};

/// Rewrites the version segment to older versions and checks reachability
pub async fn probe(client: &HttpClient, url: &str, tuning: &Tuning) -> Vec<Finding> {
    let mut findings = Vec::new();

    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => return findings,
    };
    let path = parsed.path().to_string();

    let re = match Regex::new(r"/v(\d+)(/|$)") {
        Ok(re) => re,
        Err(_) => return findings,
    };
    let current: u32 = match re
        .captures(&path)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())
    {
        Some(v) if v >= 2 => v,
        _ => return findings,
    };

    for older in (1..current).rev() {
        let older_path = re.replace(&path, format!("/v{older}$2")).to_string();
        let mut older_url = parsed.clone();
        older_url.set_path(&older_path);

        if let Some((200, _)) = fetch(client, older_url.as_str()).await {
            findings.push(
                Finding::new(url, ProbeCategory::ApiVersioning, Severity::Medium)
                    .with_payload(older_url.to_string())
                    .with_evidence(format!(
                        "Older API version path /v{older} still returns 200 (current: /v{current})"
                    )),
            );
            break;
        }
        pause(tuning).await;
    }

    findings
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    #[test]
    fn test_version_rewrite() {
        let re = Regex::new(r"/v(\d+)(/|$)").expect("valid regex");
        assert_eq!(
            re.replace("/api/v3/users", "/v1$2").to_string(),
            "/api/v1/users"
        );
        assert_eq!(re.replace("/api/v2", "/v1$2").to_string(), "/api/v1");
        assert!(!re.is_match("/api/users"));
    }
}
