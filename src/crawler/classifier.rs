//! Endpoint classification over intercepted network exchanges
//!
//! The page visitor reports request lifecycle events through the
//! `NetworkObserver` interface; the idle tracker and the endpoint
//! classifier both subscribe to the same stream.

use crate::models::EndpointKey;
use crate::signatures;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use url::Url;

use super::frontier::normalize_endpoint_url;

/// One completed asynchronous exchange observed during a page visit
#[derive(Debug, Clone)]
pub struct NetworkExchange {
    pub method: String,
    pub url: String,
    pub status: Option<u16>,
    pub content_type: Option<String>,
}

/// Request lifecycle hooks implemented by interception subscribers
pub trait NetworkObserver: Send {
    fn on_request_started(&mut self, method: &str, url: &str);
    fn on_request_finished(&mut self, exchange: &NetworkExchange);
    fn on_request_failed(&mut self, url: &str);
}

/// Tracks outstanding asynchronous requests to decide when a page is idle
#[derive(Debug)]
pub struct IdleTracker {
    outstanding: usize,
    last_finished: Instant,
}

impl IdleTracker {
    pub fn new() -> Self {
        Self {
            outstanding: 0,
            last_finished: Instant::now(),
        }
    }

    /// Idle means no outstanding requests and a quiet period at least
    /// `threshold` long since the last one finished
    pub fn is_idle(&self, threshold: Duration) -> bool {
        self.outstanding == 0 && self.last_finished.elapsed() >= threshold
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }
}

impl Default for IdleTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkObserver for IdleTracker {
    fn on_request_started(&mut self, _method: &str, _url: &str) {
        self.outstanding += 1;
    }

    fn on_request_finished(&mut self, _exchange: &NetworkExchange) {
        self.outstanding = self.outstanding.saturating_sub(1);
        self.last_finished = Instant::now();
    }

    fn on_request_failed(&mut self, _url: &str) {
        self.outstanding = self.outstanding.saturating_sub(1);
        self.last_finished = Instant::now();
    }
}

/// Decides which observed exchanges are API endpoints worth probing
#[derive(Debug, Default)]
pub struct EndpointClassifier {
    endpoints: HashSet<EndpointKey>,
}

impl EndpointClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the URL matches the noise list (transports, analytics,
    /// health checks) and must never become a probe target
    pub fn is_noise(url: &str) -> bool {
        signatures::match_first(url, signatures::NOISE_PATTERNS).is_some()
    }

    /// Classifies an exchange; Some(key) when it is an API endpoint
    pub fn classify(exchange: &NetworkExchange) -> Option<EndpointKey> {
        if Self::is_noise(&exchange.url) {
            return None;
        }

        let json_like = exchange
            .content_type
            .as_deref()
            .map(|ct| ct.to_lowercase().contains("json"))
            .unwrap_or(false);
        let non_get = !exchange.method.eq_ignore_ascii_case("GET");
        let api_path = Url::parse(&exchange.url)
            .map(|u| {
                let path = u.path();
                path.contains("/api/")
                    || path.contains("/rest/")
                    || path.ends_with("/api")
                    || path.ends_with("/rest")
            })
            .unwrap_or(false);

        if json_like || non_get || api_path {
            Some(EndpointKey::new(
                exchange.method.clone(),
                normalize_endpoint_url(&exchange.url),
            ))
        } else {
            None
        }
    }

    pub fn endpoints(&self) -> &HashSet<EndpointKey> {
        &self.endpoints
    }

    pub fn take_endpoints(&mut self) -> HashSet<EndpointKey> {
        std::mem::take(&mut self.endpoints)
    }
}

impl NetworkObserver for EndpointClassifier {
    fn on_request_started(&mut self, _method: &str, _url: &str) {}

    fn on_request_finished(&mut self, exchange: &NetworkExchange) {
        if let Some(key) = Self::classify(exchange) {
            self.endpoints.insert(key);
        }
    }

    fn on_request_failed(&mut self, _url: &str) {}
}
