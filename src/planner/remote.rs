//! Remote AI planner client
//!
//! The service receives the URL list (optionally with fingerprints) and
//! must return a JSON object mapping every input URL to an array of
//! category tags. Any transport failure or shape deviation is an error;
//! the caller falls back to the heuristic planner.

use crate::error::{Result, VigilError};
use crate::models::{Fingerprint, ProbeCategory, ProbePlan, ScanMode};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct PlanRequest<'a> {
    urls: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    fingerprints: Option<&'a [Fingerprint]>,
}

/// Client for the external planning service
pub struct RemotePlanner {
    endpoint: String,
    client: reqwest::Client,
}

impl RemotePlanner {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Requests a plan, passing fingerprints along when available
    pub async fn plan_with_fingerprints(
        &self,
        urls: &[String],
        fingerprints: Option<&[Fingerprint]>,
    ) -> Result<ProbePlan> {
        let request = PlanRequest { urls, fingerprints };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| VigilError::PlannerError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VigilError::PlannerError(format!(
                "planner returned status {status}"
            )));
        }

        let raw: HashMap<String, Vec<String>> = response
            .json()
            .await
            .map_err(|e| VigilError::PlannerError(format!("unparsable planner response: {e}")))?;

        // Unknown tags are dropped; a URL the service skipped or left
        // empty defaults to the headers-only plan.
        let mut plan = ProbePlan::new();
        for url in urls {
            let mut categories: HashSet<ProbeCategory> = raw
                .get(url)
                .map(|tags| {
                    tags.iter()
                        .filter_map(|tag| {
                            let parsed = tag.parse().ok();
                            if parsed.is_none() {
                                debug!("Dropping unknown category tag '{tag}'");
                            }
                            parsed
                        })
                        .collect()
                })
                .unwrap_or_default();

            if categories.is_empty() {
                categories.insert(ProbeCategory::Headers);
            }
            plan.insert(url.clone(), categories);
        }

        Ok(plan)
    }
}

#[async_trait]
impl super::Planner for RemotePlanner {
    async fn plan(&self, urls: &[String], _mode: ScanMode) -> Result<ProbePlan> {
        self.plan_with_fingerprints(urls, None).await
    }
}
