//! Link and API-call extraction from fetched page content
//!
//! Used by the HTTP fallback visitor: anchors and form actions become
//! crawl candidates, fetch/XHR call sites in inline scripts become
//! synthetic network exchanges for the endpoint classifier.

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Extracts same-hostname hyperlinks from HTML, resolved to absolute
/// form. Fragments are kept: SPA routes live there.
pub fn extract_links(base_url: &Url, html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut urls = Vec::new();

    let selectors = [("a[href]", "href"), ("form[action]", "action")];

    for (sel_str, attr) in &selectors {
        if let Ok(selector) = Selector::parse(sel_str) {
            for element in document.select(&selector) {
                if let Some(value) = element.value().attr(attr) {
                    if let Some(resolved) = resolve_same_origin(base_url, value) {
                        if should_include_path(&resolved) {
                            urls.push(resolved);
                        }
                    }
                }
            }
        }
    }

    urls
}

/// Extracts asynchronous call sites from inline JavaScript. Returns
/// `(method, absolute_url)` pairs for the classifier.
pub fn extract_api_calls(base_url: &Url, html: &str) -> Vec<(String, String)> {
    let mut calls = Vec::new();

    let patterns: &[(&str, &str)] = &[
        (r#"fetch\s*\(\s*["']([^"']+)["']"#, "GET"),
        (r#"axios\.get\s*\(\s*["']([^"']+)["']"#, "GET"),
        (r#"axios\.post\s*\(\s*["']([^"']+)["']"#, "POST"),
        (r#"axios\.put\s*\(\s*["']([^"']+)["']"#, "PUT"),
        (r#"axios\.delete\s*\(\s*["']([^"']+)["']"#, "DELETE"),
        (r#"\$\.ajax\s*\(\s*\{\s*url\s*:\s*["']([^"']+)["']"#, "GET"),
        (r#"\.open\s*\(\s*["'](GET|POST|PUT|DELETE)["']\s*,\s*["']([^"']+)["']"#, ""),
    ];

    for (pattern, default_method) in patterns {
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(_) => continue,
        };
        for cap in re.captures_iter(html) {
            let (method, raw) = if default_method.is_empty() {
                // XHR open(): method is the first capture
                let method = cap.get(1).map(|m| m.as_str()).unwrap_or("GET");
                let url = match cap.get(2) {
                    Some(m) => m.as_str(),
                    None => continue,
                };
                (method.to_string(), url)
            } else {
                let url = match cap.get(1) {
                    Some(m) => m.as_str(),
                    None => continue,
                };
                (default_method.to_string(), url)
            };

            if let Some(resolved) = resolve_same_origin(base_url, raw) {
                calls.push((method, resolved));
            }
        }
    }

    calls
}

/// Resolves a possibly-relative reference against the base, keeping it
/// only when it stays on the same hostname
fn resolve_same_origin(base_url: &Url, raw: &str) -> Option<String> {
    let trimmed = raw.trim();

    if trimmed.is_empty()
        || trimmed == "#"
        || trimmed.starts_with("mailto:")
        || trimmed.starts_with("tel:")
        || trimmed.starts_with("javascript:")
        || trimmed.starts_with("data:")
    {
        return None;
    }

    let resolved = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Url::parse(trimmed).ok()?
    } else {
        base_url.join(trimmed).ok()?
    };

    if resolved.host_str() != base_url.host_str() {
        return None;
    }

    Some(resolved.to_string())
}

/// Filters out static assets that cannot yield links or endpoints
fn should_include_path(url: &str) -> bool {
    let skip_extensions = [
        ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".css", ".woff", ".woff2", ".ttf",
        ".eot", ".mp3", ".mp4", ".avi", ".mov", ".pdf", ".zip", ".tar", ".gz",
    ];

    let lower = url.to_lowercase();
    let path_only = lower.split(['?', '#']).next().unwrap_or(&lower);
    !skip_extensions.iter().any(|ext| path_only.ends_with(ext))
}
