//! Integration tests for the crawler: discovery, same-origin filtering,
//! endpoint classification

mod common;

use common::test_config;
use vigil::crawler::Crawler;
use vigil::http::HttpClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_crawl_discovers_same_origin_pages_only() {
    let mock_server = MockServer::start().await;

    let root_html = format!(
        r#"<html><body>
            <a href="{0}/login">Login</a>
            <a href="https://other.test/">External</a>
        </body></html>"#,
        mock_server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string(root_html),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string("<html><body><form method=\"post\"></form></body></html>"),
        )
        .mount(&mock_server)
        .await;

    let config = test_config(&format!("{}/", mock_server.uri()));
    let client = HttpClient::from_config(&config).expect("client");
    let outcome = Crawler::new(&client, &config)
        .crawl(&config.target)
        .await
        .expect("crawl succeeds");

    let root = format!("{}/", mock_server.uri());
    let login = format!("{}/login", mock_server.uri());

    assert!(outcome.deep.pages.contains(&root), "root missing: {:?}", outcome.deep.pages);
    assert!(outcome.deep.pages.contains(&login), "login missing: {:?}", outcome.deep.pages);
    assert!(
        !outcome.deep.pages.iter().any(|p| p.contains("other.test")),
        "cross-origin page was enqueued: {:?}",
        outcome.deep.pages
    );
}

#[tokio::test]
async fn test_crawl_classifies_api_calls_from_scripts() {
    let mock_server = MockServer::start().await;

    let html = r#"<html><body>
        <script>
            fetch("/api/users");
            axios.post("/api/orders", {});
            fetch("https://www.google-analytics.com/collect");
        </script>
    </body></html>"#;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string(html),
        )
        .mount(&mock_server)
        .await;

    let config = test_config(&format!("{}/", mock_server.uri()));
    let client = HttpClient::from_config(&config).expect("client");
    let outcome = Crawler::new(&client, &config)
        .crawl(&config.target)
        .await
        .expect("crawl succeeds");

    let get_users = format!("GET {}/api/users", mock_server.uri());
    let post_orders = format!("POST {}/api/orders", mock_server.uri());

    assert!(outcome.deep.api_endpoints.contains(&get_users));
    assert!(outcome.deep.api_endpoints.contains(&post_orders));
    assert!(
        !outcome
            .deep
            .api_endpoints
            .iter()
            .any(|e| e.contains("google-analytics")),
        "analytics noise classified as endpoint"
    );
}

#[tokio::test]
async fn test_crawl_survives_broken_pages() {
    let mock_server = MockServer::start().await;

    let root_html = format!(
        r#"<html><body>
            <a href="{0}/broken">Broken</a>
            <a href="{0}/ok">Ok</a>
        </body></html>"#,
        mock_server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string(root_html),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let config = test_config(&format!("{}/", mock_server.uri()));
    let client = HttpClient::from_config(&config).expect("client");
    let outcome = Crawler::new(&client, &config)
        .crawl(&config.target)
        .await
        .expect("crawl completes despite per-page errors");

    assert!(outcome
        .deep
        .pages
        .contains(&format!("{}/ok", mock_server.uri())));
}

#[tokio::test]
async fn test_invalid_start_url_is_fatal() {
    let config = test_config("not-a-url");
    let client = HttpClient::from_config(&config).expect("client");
    let result = Crawler::new(&client, &config).crawl(&config.target).await;
    assert!(result.is_err(), "invalid start URL must fail fast");
}

#[tokio::test]
async fn test_quick_snapshot_present_for_small_sites() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string("<html><body>Just one page</body></html>"),
        )
        .mount(&mock_server)
        .await;

    let config = test_config(&format!("{}/", mock_server.uri()));
    let client = HttpClient::from_config(&config).expect("client");
    let outcome = Crawler::new(&client, &config)
        .crawl(&config.target)
        .await
        .expect("crawl succeeds");

    // Site smaller than the quick threshold: both snapshots agree
    assert_eq!(outcome.quick.pages, outcome.deep.pages);
}
