//! Integration tests for JSON artifacts and the probe input document

use vigil::models::{CrawlSnapshot, Finding, ProbeCategory, Severity};
use vigil::report::json;
use vigil::solutions::default_solution;

#[test]
fn test_load_targets_legacy_array() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("targets.json");
    std::fs::write(&path, r#"["https://site.test/", "https://site.test/login"]"#)
        .expect("write targets");

    let (pages, endpoints) = json::load_targets(&path).expect("legacy form parses");
    assert_eq!(pages.len(), 2);
    assert!(endpoints.is_empty());
}

#[test]
fn test_load_targets_structured_object() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("targets.json");
    std::fs::write(
        &path,
        r#"{
            "pages": ["https://site.test/"],
            "apiEndpoints": ["POST https://site.test/api/users", "https://site.test/api/ping-stats"]
        }"#,
    )
    .expect("write targets");

    let (pages, endpoints) = json::load_targets(&path).expect("structured form parses");
    assert_eq!(pages, vec!["https://site.test/"]);
    assert_eq!(endpoints.len(), 2);
    assert_eq!(endpoints[0].method, "POST");
    assert_eq!(endpoints[1].method, "GET");
}

#[test]
fn test_load_targets_invalid_json_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("targets.json");
    std::fs::write(&path, "not json").expect("write targets");

    assert!(json::load_targets(&path).is_err());
}

#[test]
fn test_load_targets_missing_file_is_fatal() {
    let path = std::path::Path::new("/nonexistent/targets.json");
    assert!(json::load_targets(path).is_err());
}

#[test]
fn test_snapshot_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("crawl_quick.json");

    let snapshot = CrawlSnapshot {
        pages: vec!["https://site.test/".to_string()],
        api_endpoints: vec!["GET https://site.test/api/users".to_string()],
    };
    json::write_snapshot(&snapshot, &path).expect("snapshot written");

    let raw = std::fs::read_to_string(&path).expect("readable");
    // The wire form uses the camelCase key shared with the input contract
    assert!(raw.contains("\"apiEndpoints\""));

    let loaded: CrawlSnapshot = serde_json::from_str(&raw).expect("parses back");
    assert_eq!(loaded.pages, snapshot.pages);
    assert_eq!(loaded.api_endpoints, snapshot.api_endpoints);
}

#[test]
fn test_findings_artifact_shape() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("findings.json");

    let finding = Finding::new("https://site.test/search?q=1", ProbeCategory::Sqli, Severity::Critical)
        .with_payload("' OR 1=1--")
        .with_evidence("MySQL error signature");
    let solution = default_solution(finding.attack, &finding.severity);
    let resolved = vec![vigil::models::ResolvedFinding { finding, solution }];

    json::write_findings(&resolved, &path).expect("findings written");

    let raw = std::fs::read_to_string(&path).expect("readable");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");

    let first = &parsed[0];
    assert_eq!(first["attack"], "sqli");
    assert_eq!(first["severity"], "critical");
    assert!(first["solution"]["solution"].is_string());
    assert_eq!(first["solution"]["priority"], "P0");
}
