//! Deterministic fallback planner
//!
//! Pure rule table keyed on URL shape. Total: every URL gets a non-empty
//! category set with no external calls.

use crate::error::Result;
use crate::models::{ProbeCategory, ProbePlan, ScanMode};
use async_trait::async_trait;
use std::collections::HashSet;
use url::Url;

use ProbeCategory::*;

/// Rule-table planner used when the remote service is unavailable
pub struct HeuristicPlanner;

impl HeuristicPlanner {
    /// Plans every URL in the list
    pub fn plan_all(urls: &[String], mode: ScanMode) -> ProbePlan {
        urls.iter()
            .map(|url| (url.clone(), Self::plan_url(url, mode)))
            .collect()
    }

    /// Applies the rule table to a single URL
    pub fn plan_url(url: &str, mode: ScanMode) -> HashSet<ProbeCategory> {
        let deep = mode == ScanMode::Deep;
        let mut categories = HashSet::new();

        let (path, query) = match Url::parse(url) {
            Ok(parsed) => (
                parsed.path().to_lowercase(),
                parsed.query().unwrap_or("").to_lowercase(),
            ),
            Err(_) => (url.to_lowercase(), String::new()),
        };

        if path.contains("/api/") || path.contains("/rest/") {
            categories.extend([Idor, Cors]);
            if deep {
                categories.extend([Jwt, ApiVersioning, Ssrf, InsecureDesign, IntegrityFailures]);
            }
        }

        if !query.is_empty() {
            categories.extend([Sqli, Xss]);
            if deep {
                categories.extend([DirectoryTraversal, Ssrf]);
            }
        }

        let auth_shaped = ["login", "auth", "register", "signin", "signup"]
            .iter()
            .any(|kw| path.contains(kw) || query.contains(kw));
        if auth_shaped {
            categories.insert(Csrf);
            if deep {
                categories.extend([Jwt, CryptographicFailures]);
            }
        }

        let search_shaped = ["search", "query", "filter"]
            .iter()
            .any(|kw| path.contains(kw) || query.contains(kw));
        if search_shaped {
            categories.extend([Sqli, Xss]);
            if deep {
                categories.insert(Ssrf);
            }
        }

        categories.insert(Headers);
        if deep {
            categories.extend([VulnerableComponents, LoggingFailures, CryptographicFailures]);
        }

        categories
    }
}

#[async_trait]
impl super::Planner for HeuristicPlanner {
    async fn plan(&self, urls: &[String], mode: ScanMode) -> Result<ProbePlan> {
        Ok(Self::plan_all(urls, mode))
    }
}
