//! HTTP client wrapper with rate limiting, retries, and request tracking
//!
//! One configuration is shared across all probes: short timeout, fixed
//! user-agent, and non-2xx statuses treated as ordinary responses.

use crate::error::{Result, VigilError};
use crate::models::AuditConfig;
use reqwest::{Client, Response, StatusCode};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// HTTP client wrapper with rate limiting and request counting
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    request_count: Arc<AtomicU64>,
    rate_limit_delay: Option<Duration>,
}

impl HttpClient {
    /// Creates a new HttpClient from audit configuration
    pub fn from_config(config: &AuditConfig) -> Result<Self> {
        let builder = Client::builder()
            .timeout(Duration::from_secs(config.probe_timeout_secs))
            .user_agent(&config.user_agent)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .cookie_store(true)
            .danger_accept_invalid_certs(false);

        let client = builder.build()?;

        let rate_limit_delay = config
            .rate_limit
            .filter(|rps| *rps > 0)
            .map(|rps| Duration::from_millis(1000 / u64::from(rps)));

        Ok(Self {
            client,
            request_count: Arc::new(AtomicU64::new(0)),
            rate_limit_delay,
        })
    }

    /// Sends a GET request with rate limiting and retry logic
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.request_with_retry(|| self.client.get(url)).await
    }

    /// Sends a GET request with custom headers
    pub async fn get_with_headers(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<Response> {
        self.request_with_retry(|| {
            let mut req = self.client.get(url);
            for (key, value) in headers {
                req = req.header(key.as_str(), value.as_str());
            }
            req
        })
        .await
    }

    /// Sends a POST request with a form-encoded body
    pub async fn post(&self, url: &str, body: &str) -> Result<Response> {
        self.request_with_retry(|| {
            self.client
                .post(url)
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(body.to_string())
        })
        .await
    }

    /// Sends a generic request with a given method, optional headers and body
    pub async fn request(
        &self,
        method: reqwest::Method,
        url: &str,
        headers: &[(String, String)],
        body: Option<&str>,
    ) -> Result<Response> {
        self.request_with_retry(|| {
            let mut req = self.client.request(method.clone(), url);
            for (key, value) in headers {
                req = req.header(key.as_str(), value.as_str());
            }
            if let Some(b) = body {
                req = req.body(b.to_string());
            }
            req
        })
        .await
    }

    /// Sends an OPTIONS request
    pub async fn options(&self, url: &str, headers: &[(String, String)]) -> Result<Response> {
        self.request(reqwest::Method::OPTIONS, url, headers, None).await
    }

    /// Returns the total number of requests made through this client
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Executes a request with retry logic and rate limiting
    async fn request_with_retry<F>(&self, build_request: F) -> Result<Response>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        const MAX_RETRIES: u32 = 2;
        const INITIAL_BACKOFF_MS: u64 = 500;

        if let Some(delay) = self.rate_limit_delay {
            sleep(delay).await;
        }

        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let backoff = Duration::from_millis(INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1));
                debug!("Retry attempt {attempt}, waiting {backoff:?}");
                sleep(backoff).await;
            }

            self.request_count.fetch_add(1, Ordering::Relaxed);

            match build_request().send().await {
                Ok(response) => {
                    let status = response.status();
                    debug!("Response: {status} for {}", response.url());

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        warn!("Rate limited by server, backing off");
                        last_error = Some(VigilError::CrawlError(
                            "rate limited by server".to_string(),
                        ));
                        continue;
                    }

                    return Ok(response);
                }
                Err(e) => {
                    debug!("Request failed (attempt {attempt}): {e}");
                    last_error = Some(VigilError::HttpError(e));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| VigilError::CrawlError("max retries exceeded".to_string())))
    }
}
