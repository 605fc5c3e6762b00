//! Integration tests for probe planning: remote contract, fallback,
//! totality

use std::time::Duration;
use vigil::models::{ProbeCategory, ScanMode};
use vigil::planner::{plan_targets, RemotePlanner};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_plan_totality_without_remote() {
    let urls = vec![
        "https://site.test/".to_string(),
        "https://site.test/login".to_string(),
        "https://site.test/api/users?id=5".to_string(),
    ];

    let plan = plan_targets(None, &urls, None, ScanMode::Quick).await;

    assert_eq!(plan.len(), urls.len());
    for url in &urls {
        let categories = plan.get(url).expect("every URL planned");
        assert!(!categories.is_empty(), "empty plan for {url}");
    }
}

#[tokio::test]
async fn test_fallback_on_unreachable_service() {
    // Port 9 (discard) refuses connections; the remote call fails and
    // the heuristic fallback takes over.
    let remote = RemotePlanner::new("http://127.0.0.1:9/plan", Duration::from_millis(500))
        .expect("planner client");
    let urls = vec!["https://site.test/api/users?id=5".to_string()];

    let plan = plan_targets(Some(&remote), &urls, None, ScanMode::Quick).await;

    let categories = plan.get(&urls[0]).expect("planned via fallback");
    for expected in [
        ProbeCategory::Idor,
        ProbeCategory::Cors,
        ProbeCategory::Sqli,
        ProbeCategory::Xss,
    ] {
        assert!(
            categories.contains(&expected),
            "fallback plan missing {expected}"
        );
    }
}

#[tokio::test]
async fn test_fallback_on_malformed_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("this is not a plan"),
        )
        .mount(&mock_server)
        .await;

    let remote =
        RemotePlanner::new(mock_server.uri(), Duration::from_secs(2)).expect("planner client");
    let urls = vec!["https://site.test/search?q=x".to_string()];

    let plan = plan_targets(Some(&remote), &urls, None, ScanMode::Quick).await;
    let categories = plan.get(&urls[0]).expect("planned via fallback");
    assert!(categories.contains(&ProbeCategory::Sqli));
    assert!(categories.contains(&ProbeCategory::Headers));
}

#[tokio::test]
async fn test_remote_plan_used_and_missing_urls_defaulted() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "https://site.test/a": ["sqli", "xss", "not_a_real_tag"],
        })))
        .mount(&mock_server)
        .await;

    let remote =
        RemotePlanner::new(mock_server.uri(), Duration::from_secs(2)).expect("planner client");
    let urls = vec![
        "https://site.test/a".to_string(),
        "https://site.test/forgotten".to_string(),
    ];

    let plan = plan_targets(Some(&remote), &urls, None, ScanMode::Quick).await;

    let planned = plan.get("https://site.test/a").expect("covered URL");
    assert!(planned.contains(&ProbeCategory::Sqli));
    assert!(planned.contains(&ProbeCategory::Xss));
    assert_eq!(planned.len(), 2, "unknown tags must be dropped");

    let defaulted = plan.get("https://site.test/forgotten").expect("defaulted URL");
    assert_eq!(defaulted.len(), 1);
    assert!(defaulted.contains(&ProbeCategory::Headers));
}

#[tokio::test]
async fn test_fallback_determinism() {
    let urls = vec![
        "https://site.test/api/users?id=5".to_string(),
        "https://site.test/login".to_string(),
    ];

    let first = plan_targets(None, &urls, None, ScanMode::Deep).await;
    for _ in 0..3 {
        let again = plan_targets(None, &urls, None, ScanMode::Deep).await;
        assert_eq!(first, again, "fallback planner must be deterministic");
    }
}
