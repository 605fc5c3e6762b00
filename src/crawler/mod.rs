//! Breadth-first site crawler with network-idle detection and endpoint
//! classification
//!
//! Pages are visited strictly one at a time from a FIFO frontier up to
//! the page budget. Each visit yields same-origin links (fed back into
//! the frontier) and observed asynchronous exchanges (fed through the
//! endpoint classifier). Two snapshots are produced: a quick one early
//! in the crawl and a deep one at crawl end.

pub mod classifier;
pub mod extractor;
pub mod frontier;
pub mod visitor;

use crate::error::{Result, VigilError};
use crate::http::HttpClient;
use crate::models::{AuditConfig, CrawlSnapshot};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

use classifier::{EndpointClassifier, NetworkObserver};
use frontier::Frontier;
use visitor::{BrowserVisitor, HttpVisitor, VisitOptions};

/// Page/endpoint sets captured during a crawl session
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Early snapshot: first N pages or T elapsed ms, whichever first
    pub quick: CrawlSnapshot,
    /// Everything discovered by crawl end
    pub deep: CrawlSnapshot,
}

/// Sequential BFS crawler bound to one target site
pub struct Crawler<'a> {
    client: &'a HttpClient,
    config: &'a AuditConfig,
}

impl<'a> Crawler<'a> {
    pub fn new(client: &'a HttpClient, config: &'a AuditConfig) -> Self {
        Self { client, config }
    }

    /// Crawls from the start URL and returns both snapshots.
    /// An unparsable or non-http start URL is fatal; per-page failures
    /// are logged skips.
    pub async fn crawl(&self, start_url: &str) -> Result<CrawlOutcome> {
        let base = Url::parse(start_url)
            .map_err(|_| VigilError::InvalidTarget(start_url.to_string()))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(VigilError::InvalidTarget(start_url.to_string()));
        }

        let mut frontier = Frontier::new(self.config.max_pages);
        let mut endpoint_classifier = EndpointClassifier::new();
        frontier.enqueue(start_url);

        // One browser process for the whole session; fall back to plain
        // HTTP fetching when rendering is off or launch fails.
        let browser = if self.config.render_enabled {
            match BrowserVisitor::launch().await {
                Ok(b) => Some(b),
                Err(e) => {
                    warn!("Browser unavailable, falling back to HTTP fetch: {e}");
                    None
                }
            }
        } else {
            None
        };
        let http_visitor = HttpVisitor::new(self.client.clone());

        let opts = VisitOptions {
            nav_timeout: Duration::from_secs(self.config.nav_timeout_secs),
            idle_threshold: Duration::from_millis(self.config.idle_threshold_ms),
            max_idle_wait: Duration::from_millis(self.config.max_idle_wait_ms),
        };

        let started = Instant::now();
        let quick_window = Duration::from_millis(self.config.quick_snapshot_ms);
        let mut quick: Option<CrawlSnapshot> = None;

        while !frontier.budget_reached() {
            let url = match frontier.dequeue() {
                Some(u) => u,
                None => break,
            };

            debug!("Visiting {url}");
            let visit = match &browser {
                Some(b) => b.visit(&url, opts).await,
                None => http_visitor.visit(&url).await,
            };
            frontier.mark_visited(&url);

            match visit {
                Ok(result) => {
                    for link in &result.links {
                        frontier.enqueue(link);
                    }
                    for exchange in &result.exchanges {
                        endpoint_classifier.on_request_finished(exchange);
                    }
                }
                Err(e) => {
                    warn!("Skipping page {url}: {e}");
                }
            }

            for key in endpoint_classifier.take_endpoints() {
                frontier.record_endpoint(key);
            }

            if quick.is_none()
                && (frontier.visited_count() >= self.config.quick_snapshot_pages
                    || started.elapsed() >= quick_window)
            {
                quick = Some(frontier.snapshot());
                debug!(
                    "Quick snapshot captured after {} pages",
                    frontier.visited_count()
                );
            }
        }

        let deep = frontier.snapshot();
        let quick = quick.unwrap_or_else(|| deep.clone());

        info!(
            "Crawl finished: {} pages, {} endpoints",
            deep.pages.len(),
            deep.api_endpoints.len()
        );

        Ok(CrawlOutcome { quick, deep })
    }
}
