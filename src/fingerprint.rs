//! Route fingerprinting
//!
//! One baseline request per URL, taken ahead of probing. Transient
//! network failures are recorded as hints, never propagated.

use crate::http::HttpClient;
use crate::models::Fingerprint;
use crate::signatures;
use tracing::debug;

/// Headers whose presence identifies the technology stack
const TECH_HEADERS: &[&str] = &["x-powered-by", "x-aspnet-version", "x-generator", "x-runtime"];

/// Characterizes a route with a single GET request
pub async fn fingerprint(client: &HttpClient, url: &str) -> Fingerprint {
    let mut fp = Fingerprint {
        url: url.to_string(),
        status: None,
        server: None,
        tech_hints: Vec::new(),
        cookies: Vec::new(),
        content_type: None,
        db_hints: Vec::new(),
        error_hints: Vec::new(),
    };

    match client.get(url).await {
        Ok(response) => {
            fp.status = Some(response.status().as_u16());

            let headers = response.headers();
            fp.server = headers
                .get("server")
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            fp.content_type = headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .map(String::from);

            for name in TECH_HEADERS {
                if let Some(value) = headers.get(*name).and_then(|v| v.to_str().ok()) {
                    fp.tech_hints.push(format!("{name}: {value}"));
                }
            }

            fp.cookies = headers
                .get_all("set-cookie")
                .iter()
                .filter_map(|v| v.to_str().ok())
                .map(String::from)
                .collect();

            let body = response.text().await.unwrap_or_default();
            fp.db_hints = signatures::match_all(&body, signatures::SQL_ERRORS)
                .into_iter()
                .map(String::from)
                .collect();
            fp.error_hints = signatures::match_all(&body, signatures::STACK_TRACE_MARKERS)
                .into_iter()
                .map(String::from)
                .collect();
        }
        Err(e) => {
            debug!("Fingerprint request failed for {url}: {e}");
            fp.error_hints.push(format!("request failed: {e}"));
        }
    }

    fp
}
