//! Integration tests for the probe engine and individual probes

mod common;

use common::test_config;
use std::collections::HashSet;
use vigil::http::HttpClient;
use vigil::models::{ProbeCategory, ScanMode, Severity};
use vigil::probes::ProbeEngine;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn engine_for(target: &str, mode: ScanMode) -> (ProbeEngine, HttpClient) {
    let mut config = test_config(target);
    config.mode = mode;
    let client = HttpClient::from_config(&config).expect("client");
    (ProbeEngine::new(client.clone(), &config), client)
}

fn categories(list: &[ProbeCategory]) -> HashSet<ProbeCategory> {
    list.iter().copied().collect()
}

#[tokio::test]
async fn test_sqli_error_signature_yields_critical_finding() {
    let mock_server = MockServer::start().await;

    // The boolean "true" condition payload and everything else get a
    // normal page; the quoted payload trips a database error.
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "' OR 1=1--"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "Warning: mysql_fetch_array() expects parameter 1 to be resource",
        ))
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>results</html>"))
        .with_priority(250)
        .mount(&mock_server)
        .await;

    let url = format!("{}/search?q=1", mock_server.uri());
    let (engine, _client) = engine_for(&url, ScanMode::Quick);

    let findings = engine
        .run_url(&url, &categories(&[ProbeCategory::Sqli]))
        .await;

    assert_eq!(findings.len(), 1, "expected one sqli finding: {findings:?}");
    assert_eq!(findings[0].attack, ProbeCategory::Sqli);
    assert_eq!(findings[0].severity, Severity::Critical);
    assert_eq!(findings[0].payload.as_deref(), Some("' OR 1=1--"));
}

#[tokio::test]
async fn test_hardened_route_yields_no_headers_or_csrf_findings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .insert_header("Content-Security-Policy", "default-src 'self'")
                .insert_header(
                    "Strict-Transport-Security",
                    "max-age=31536000; includeSubDomains",
                )
                .insert_header("X-Frame-Options", "DENY")
                .insert_header("X-Content-Type-Options", "nosniff")
                .insert_header("Referrer-Policy", "strict-origin-when-cross-origin")
                .insert_header("Permissions-Policy", "camera=()")
                .set_body_string("<html><body><p>No forms here.</p></body></html>"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/", mock_server.uri());
    let (engine, _client) = engine_for(&url, ScanMode::Quick);

    let findings = engine
        .run_url(
            &url,
            &categories(&[ProbeCategory::Headers, ProbeCategory::Csrf]),
        )
        .await;

    assert!(
        findings.is_empty(),
        "hardened route should produce no findings, got: {findings:?}"
    );
}

#[tokio::test]
async fn test_missing_headers_and_tokenless_form_detected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string(
                    r#"<form method="post" action="/transfer"><input name="amount"/></form>"#,
                ),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/", mock_server.uri());
    let (engine, _client) = engine_for(&url, ScanMode::Quick);

    let findings = engine
        .run_url(
            &url,
            &categories(&[ProbeCategory::Headers, ProbeCategory::Csrf]),
        )
        .await;

    assert!(findings
        .iter()
        .any(|f| f.attack == ProbeCategory::Headers
            && f.evidence.contains("Content-Security-Policy")));
    assert!(findings
        .iter()
        .any(|f| f.attack == ProbeCategory::Csrf));
}

/// Echoes the q parameter back into the page, unescaped
struct EchoQuery;

impl Respond for EchoQuery {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let reflected = request
            .url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.to_string())
            .unwrap_or_default();
        ResponseTemplate::new(200)
            .insert_header("Content-Type", "text/html")
            .set_body_string(format!("<html><body>You searched for {reflected}</body></html>"))
    }
}

#[tokio::test]
async fn test_xss_reflection_detected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(EchoQuery)
        .mount(&mock_server)
        .await;

    let url = format!("{}/search?q=hello", mock_server.uri());
    let (engine, _client) = engine_for(&url, ScanMode::Quick);

    let findings = engine
        .run_url(&url, &categories(&[ProbeCategory::Xss]))
        .await;

    assert_eq!(findings.len(), 1, "expected one xss finding: {findings:?}");
    assert_eq!(findings[0].severity, Severity::High);
}

#[tokio::test]
async fn test_cors_wildcard_flagged_in_quick_mode_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("OPTIONS"))
        .respond_with(
            ResponseTemplate::new(204).insert_header("Access-Control-Allow-Origin", "*"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/api/data", mock_server.uri());

    let (quick_engine, _c1) = engine_for(&url, ScanMode::Quick);
    let quick_findings = quick_engine
        .run_url(&url, &categories(&[ProbeCategory::Cors]))
        .await;
    assert_eq!(quick_findings.len(), 1);
    assert_eq!(quick_findings[0].severity, Severity::Medium);

    // Deep mode requires Allow-Credentials alongside the wildcard
    let (deep_engine, _c2) = engine_for(&url, ScanMode::Deep);
    let deep_findings = deep_engine
        .run_url(&url, &categories(&[ProbeCategory::Cors]))
        .await;
    assert!(deep_findings.is_empty());
}

#[tokio::test]
async fn test_jwt_alg_none_detected() {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"1","exp":1700000000}"#);
    let token = format!("{header}.{payload}.");

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(r#"{{"token":"{token}"}}"#)),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/api/session", mock_server.uri());
    let (engine, _client) = engine_for(&url, ScanMode::Quick);

    let findings = engine
        .run_url(&url, &categories(&[ProbeCategory::Jwt]))
        .await;

    assert!(findings
        .iter()
        .any(|f| f.severity == Severity::Critical && f.evidence.contains("alg=none")));
}

#[tokio::test]
async fn test_older_api_version_detected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/api/v2/users", mock_server.uri());
    let (engine, _client) = engine_for(&url, ScanMode::Deep);

    let findings = engine
        .run_url(&url, &categories(&[ProbeCategory::ApiVersioning]))
        .await;

    assert_eq!(findings.len(), 1);
    assert!(findings[0].evidence.contains("/v1"));
}

#[tokio::test]
async fn test_traversal_payload_exposes_system_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/download"))
        .and(query_param("file", "../../../../etc/passwd"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("root:x:0:0:root:/root:/bin/bash\ndaemon:x:1:1::/usr/sbin"),
        )
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("file contents"))
        .with_priority(250)
        .mount(&mock_server)
        .await;

    let url = format!("{}/download?file=report.pdf", mock_server.uri());
    let (engine, _client) = engine_for(&url, ScanMode::Deep);

    let findings = engine
        .run_url(&url, &categories(&[ProbeCategory::DirectoryTraversal]))
        .await;

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Critical);
}

#[tokio::test]
async fn test_design_probe_flags_missing_rate_limit_and_admin_paths() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/", mock_server.uri());
    let (engine, _client) = engine_for(&url, ScanMode::Deep);

    let findings = engine
        .run_url(&url, &categories(&[ProbeCategory::InsecureDesign]))
        .await;

    assert!(findings
        .iter()
        .any(|f| f.evidence.contains("rate limiting")));
    assert!(findings
        .iter()
        .any(|f| f.evidence.contains("/admin")));
}

#[tokio::test]
async fn test_verbose_error_leak_detected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("input", "{{7*7}}"))
        .respond_with(ResponseTemplate::new(500).set_body_string(
            "Traceback (most recent call last):\n  File \"app.py\", line 12, in render",
        ))
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>fine</html>"))
        .with_priority(250)
        .mount(&mock_server)
        .await;

    let url = format!("{}/render", mock_server.uri());
    let (engine, _client) = engine_for(&url, ScanMode::Deep);

    let findings = engine
        .run_url(&url, &categories(&[ProbeCategory::LoggingFailures]))
        .await;

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].payload.as_deref(), Some("{{7*7}}"));
}

#[tokio::test]
async fn test_unreachable_target_yields_zero_findings_not_errors() {
    // Nothing listens here; every probe swallows its failures
    let url = "http://127.0.0.1:9/search?q=1";
    let (engine, _client) = engine_for(url, ScanMode::Quick);

    let findings = engine
        .run_url(
            url,
            &categories(&[
                ProbeCategory::Sqli,
                ProbeCategory::Xss,
                ProbeCategory::Headers,
                ProbeCategory::Cors,
            ]),
        )
        .await;

    assert!(findings.is_empty());
}
