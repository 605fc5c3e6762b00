//! Page visiting
//!
//! With the `browser` feature a headless Chromium instance drives each
//! visit: non-essential resource types are blocked, asynchronous network
//! activity is tracked for idle detection, and same-origin links are read
//! from the rendered DOM. Without the feature a plain HTTP fetch with
//! static extraction is used instead.

use crate::error::{Result, VigilError};
use crate::http::HttpClient;
use std::time::Duration;
use url::Url;

use super::classifier::NetworkExchange;
use super::extractor;

#[cfg(feature = "browser")]
use {
    super::classifier::{IdleTracker, NetworkObserver},
    chromiumoxide::cdp::browser_protocol::network::{
        EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent, EventResponseReceived,
        RequestId, ResourceType, SetBlockedUrLsParams,
    },
    chromiumoxide::{Browser, BrowserConfig},
    futures::StreamExt,
    std::collections::HashMap,
    std::sync::Arc,
    std::time::Instant,
    tokio::sync::Mutex,
    tokio::time::sleep,
    tracing::{debug, info},
};

/// What a single page visit produced
#[derive(Debug, Default)]
pub struct PageVisit {
    /// Same-origin links found on the page
    pub links: Vec<String>,
    /// Completed asynchronous exchanges the page triggered
    pub exchanges: Vec<NetworkExchange>,
}

/// Per-visit timing parameters
#[derive(Debug, Clone, Copy)]
pub struct VisitOptions {
    pub nav_timeout: Duration,
    pub idle_threshold: Duration,
    pub max_idle_wait: Duration,
}

/// HTTP-fetch visitor, always available
pub struct HttpVisitor {
    client: HttpClient,
}

impl HttpVisitor {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Fetches a page and statically extracts links and API call sites
    pub async fn visit(&self, url: &str) -> Result<PageVisit> {
        let base = Url::parse(url)?;
        let response = self.client.get(url).await?;

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.is_empty()
            && !content_type.contains("text/html")
            && !content_type.contains("javascript")
        {
            return Ok(PageVisit::default());
        }

        let body = response.text().await.unwrap_or_default();

        let links = extractor::extract_links(&base, &body);
        let exchanges = extractor::extract_api_calls(&base, &body)
            .into_iter()
            .map(|(method, url)| NetworkExchange {
                method,
                url,
                status: None,
                content_type: None,
            })
            .collect();

        Ok(PageVisit { links, exchanges })
    }
}

/// Resource patterns never needed for link or endpoint discovery
#[cfg(feature = "browser")]
const BLOCKED_RESOURCE_PATTERNS: &[&str] = &[
    "*.png", "*.jpg", "*.jpeg", "*.gif", "*.svg", "*.ico", "*.css", "*.woff", "*.woff2",
    "*.ttf", "*.eot", "*.mp3", "*.mp4", "*.avi", "*.mov",
];

/// Interception state shared between the event pump and the visit loop
#[cfg(feature = "browser")]
#[derive(Default)]
struct VisitTracker {
    idle: IdleTracker,
    inflight: HashMap<RequestId, (String, String)>,
    responses: HashMap<RequestId, (Option<u16>, Option<String>)>,
    exchanges: Vec<NetworkExchange>,
}

/// Browser-driven visitor; one Chromium process reused across visits
#[cfg(feature = "browser")]
pub struct BrowserVisitor {
    browser: Browser,
}

#[cfg(feature = "browser")]
impl BrowserVisitor {
    /// Launches headless Chromium once for the whole crawl session
    pub async fn launch() -> Result<Self> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .window_size(1366, 900)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(VigilError::BrowserError)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| VigilError::BrowserError(e.to_string()))?;

        tokio::spawn(async move {
            while let Some(_event) = handler.next().await {
                // drive the CDP connection
            }
        });

        info!("Browser visitor initialized");
        Ok(Self { browser })
    }

    /// Navigates an isolated page, waits for network idle, and extracts
    /// same-origin links plus observed asynchronous exchanges
    pub async fn visit(&self, url: &str, opts: VisitOptions) -> Result<PageVisit> {
        let base = Url::parse(url)?;
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| VigilError::BrowserError(e.to_string()))?;

        let blocked: Vec<String> = BLOCKED_RESOURCE_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .collect();
        page.execute(SetBlockedUrLsParams::new(blocked))
            .await
            .map_err(|e| VigilError::BrowserError(e.to_string()))?;

        let tracker = Arc::new(Mutex::new(VisitTracker::default()));
        let pump = self.spawn_event_pump(&page, Arc::clone(&tracker)).await?;

        let nav = tokio::time::timeout(opts.nav_timeout, page.goto(url)).await;
        match nav {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                pump.abort();
                let _ = page.close().await;
                return Err(VigilError::BrowserError(format!("navigation failed: {e}")));
            }
            Err(_) => {
                pump.abort();
                let _ = page.close().await;
                return Err(VigilError::BrowserError(format!(
                    "navigation timed out after {:?}",
                    opts.nav_timeout
                )));
            }
        }

        // Poll until quiet or the hard cap; pages with persistent
        // background polling never reach idle on their own.
        let poll_started = Instant::now();
        loop {
            if poll_started.elapsed() >= opts.max_idle_wait {
                debug!("Idle wait cap reached for {url}");
                break;
            }
            {
                let t = tracker.lock().await;
                if t.idle.is_idle(opts.idle_threshold) {
                    break;
                }
            }
            sleep(Duration::from_millis(50)).await;
        }

        let links_js = r#"
            Array.from(document.querySelectorAll('a[href]'))
                .map(a => a.href)
                .filter(h => h && h.startsWith('http'))
        "#;
        let raw_links: Vec<String> = page
            .evaluate(links_js)
            .await
            .map_err(|e| VigilError::BrowserError(e.to_string()))?
            .into_value()
            .unwrap_or_default();

        pump.abort();
        let _ = page.close().await;

        let links = raw_links
            .into_iter()
            .filter(|link| {
                Url::parse(link)
                    .map(|u| u.host_str() == base.host_str())
                    .unwrap_or(false)
            })
            .collect();

        let mut t = tracker.lock().await;
        let exchanges = std::mem::take(&mut t.exchanges);
        Ok(PageVisit { links, exchanges })
    }

    /// Subscribes to request lifecycle events and feeds the idle tracker
    async fn spawn_event_pump(
        &self,
        page: &chromiumoxide::Page,
        tracker: Arc<Mutex<VisitTracker>>,
    ) -> Result<tokio::task::JoinHandle<()>> {
        let mut started = page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .map_err(|e| VigilError::BrowserError(e.to_string()))?;
        let mut responded = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(|e| VigilError::BrowserError(e.to_string()))?;
        let mut finished = page
            .event_listener::<EventLoadingFinished>()
            .await
            .map_err(|e| VigilError::BrowserError(e.to_string()))?;
        let mut failed = page
            .event_listener::<EventLoadingFailed>()
            .await
            .map_err(|e| VigilError::BrowserError(e.to_string()))?;

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    Some(ev) = started.next() => {
                        if matches!(ev.r#type, Some(ResourceType::Xhr) | Some(ResourceType::Fetch)) {
                            let mut t = tracker.lock().await;
                            let method = ev.request.method.clone();
                            let url = ev.request.url.clone();
                            t.idle.on_request_started(&method, &url);
                            t.inflight.insert(ev.request_id.clone(), (method, url));
                        }
                    }
                    Some(ev) = responded.next() => {
                        let mut t = tracker.lock().await;
                        if t.inflight.contains_key(&ev.request_id) {
                            let status = u16::try_from(ev.response.status).ok();
                            let mime = Some(ev.response.mime_type.clone());
                            t.responses.insert(ev.request_id.clone(), (status, mime));
                        }
                    }
                    Some(ev) = finished.next() => {
                        let mut t = tracker.lock().await;
                        if let Some((method, url)) = t.inflight.remove(&ev.request_id) {
                            let (status, content_type) = t
                                .responses
                                .remove(&ev.request_id)
                                .unwrap_or((None, None));
                            let exchange = NetworkExchange {
                                method,
                                url,
                                status,
                                content_type,
                            };
                            t.idle.on_request_finished(&exchange);
                            t.exchanges.push(exchange);
                        }
                    }
                    Some(ev) = failed.next() => {
                        let mut t = tracker.lock().await;
                        if let Some((_, url)) = t.inflight.remove(&ev.request_id) {
                            t.responses.remove(&ev.request_id);
                            t.idle.on_request_failed(&url);
                        }
                    }
                    else => break,
                }
            }
        });

        Ok(handle)
    }
}

/// Stub when the browser feature is not enabled
#[cfg(not(feature = "browser"))]
pub struct BrowserVisitor;

#[cfg(not(feature = "browser"))]
impl BrowserVisitor {
    pub async fn launch() -> Result<Self> {
        Err(VigilError::BrowserError(
            "Browser rendering requires the 'browser' feature flag. \
             Compile with: cargo build --features browser"
                .to_string(),
        ))
    }

    pub async fn visit(&self, _url: &str, _opts: VisitOptions) -> Result<PageVisit> {
        Err(VigilError::BrowserError(
            "browser feature not enabled".to_string(),
        ))
    }
}
