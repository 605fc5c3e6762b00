//! Remote solution service client
//!
//! The service receives one finding and returns a JSON object in the
//! Solution shape. Missing fields are filled from the static defaults;
//! transport failures are errors so the caller can substitute the fully
//! default solution.

use crate::error::{Result, VigilError};
use crate::models::{
    Effort, Finding, Priority, ResourceLink, Solution, SolutionConfidence,
};
use serde::Deserialize;
use std::time::Duration;

use super::defaults::default_solution;

/// Solution shape with every field optional, as received over the wire
#[derive(Debug, Deserialize)]
struct RawSolution {
    solution: Option<String>,
    remediation_steps: Option<Vec<String>>,
    code_snippet: Option<String>,
    resource_links: Option<Vec<ResourceLink>>,
    cwe_cve: Option<String>,
    priority: Option<Priority>,
    estimated_effort: Option<Effort>,
    confidence: Option<SolutionConfidence>,
    waf_rules: Option<Vec<String>>,
    notes: Option<String>,
}

/// Client for the external remediation service
pub struct RemoteSolutionProvider {
    endpoint: String,
    client: reqwest::Client,
}

impl RemoteSolutionProvider {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Requests guidance for one finding, filling gaps from defaults
    pub async fn solution_for(&self, finding: &Finding) -> Result<Solution> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(finding)
            .send()
            .await
            .map_err(|e| VigilError::SolutionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VigilError::SolutionError(format!(
                "solution service returned status {status}"
            )));
        }

        let raw: RawSolution = response
            .json()
            .await
            .map_err(|e| VigilError::SolutionError(format!("unparsable solution: {e}")))?;

        let fallback = default_solution(finding.attack, &finding.severity);
        Ok(Solution {
            solution: raw.solution.unwrap_or(fallback.solution),
            remediation_steps: raw
                .remediation_steps
                .filter(|steps| !steps.is_empty())
                .unwrap_or(fallback.remediation_steps),
            code_snippet: raw.code_snippet.or(fallback.code_snippet),
            resource_links: raw
                .resource_links
                .filter(|links| !links.is_empty())
                .unwrap_or(fallback.resource_links),
            cwe_cve: raw.cwe_cve.or(fallback.cwe_cve),
            priority: raw.priority.unwrap_or(fallback.priority),
            estimated_effort: raw.estimated_effort.unwrap_or(fallback.estimated_effort),
            confidence: raw.confidence.unwrap_or(fallback.confidence),
            waf_rules: raw.waf_rules.unwrap_or(fallback.waf_rules),
            notes: raw.notes.or(fallback.notes),
        })
    }
}
