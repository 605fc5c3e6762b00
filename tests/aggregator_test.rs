//! Integration tests for finding aggregation and solution attachment

use std::time::Duration;
use vigil::models::{Finding, Priority, ProbeCategory, Severity};
use vigil::solutions::{Aggregator, RemoteSolutionProvider};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_findings() -> Vec<Finding> {
    vec![
        Finding::new("https://site.test/search?q=1", ProbeCategory::Sqli, Severity::Critical)
            .with_payload("' OR 1=1--")
            .with_evidence("MySQL error signature in response"),
        Finding::new("https://site.test/", ProbeCategory::Headers, Severity::Low)
            .with_evidence("Missing Content-Security-Policy header"),
    ]
}

#[tokio::test]
async fn test_every_finding_carries_a_solution_without_service() {
    let aggregator = Aggregator::new(None);
    let resolved = aggregator.resolve(sample_findings()).await;

    assert_eq!(resolved.len(), 2);
    for finding in &resolved {
        assert!(!finding.solution.solution.is_empty());
        assert!(!finding.solution.remediation_steps.is_empty());
        assert!(finding.solution.cwe_cve.is_some());
    }
    // Critical finding sorts first and maps to P0
    assert_eq!(resolved[0].finding.severity, Severity::Critical);
    assert_eq!(resolved[0].solution.priority, Priority::P0);
    assert_eq!(resolved[1].solution.priority, Priority::P1);
}

#[tokio::test]
async fn test_partial_remote_solution_filled_from_defaults() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "solution": "Custom guidance from the service",
        })))
        .mount(&mock_server)
        .await;

    let provider = RemoteSolutionProvider::new(mock_server.uri(), Duration::from_secs(2))
        .expect("solution client");
    let aggregator = Aggregator::new(Some(provider));
    let resolved = aggregator.resolve(sample_findings()).await;

    for finding in &resolved {
        assert_eq!(finding.solution.solution, "Custom guidance from the service");
        // Fields the service omitted come from the static defaults
        assert!(!finding.solution.remediation_steps.is_empty());
        assert!(finding.solution.cwe_cve.is_some());
    }
}

#[tokio::test]
async fn test_service_failure_falls_back_to_defaults() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let provider = RemoteSolutionProvider::new(mock_server.uri(), Duration::from_secs(2))
        .expect("solution client");
    let aggregator = Aggregator::new(Some(provider));
    let resolved = aggregator.resolve(sample_findings()).await;

    assert_eq!(resolved.len(), 2);
    for finding in &resolved {
        assert!(!finding.solution.solution.is_empty());
    }
    // Default sqli guidance carries its CWE mapping
    assert_eq!(
        resolved[0].solution.cwe_cve.as_deref(),
        Some("CWE-89")
    );
}

#[tokio::test]
async fn test_duplicate_findings_collapsed() {
    let duplicate = Finding::new("https://site.test/", ProbeCategory::Cors, Severity::Medium)
        .with_evidence("wildcard origin");
    let findings = vec![duplicate.clone(), duplicate.clone(), duplicate];

    let resolved = Aggregator::new(None).resolve(findings).await;
    assert_eq!(resolved.len(), 1);
}
