//! Audit orchestration: crawl, fingerprint, plan, probe, aggregate

use crate::crawler::{CrawlOutcome, Crawler};
use crate::error::{Result, VigilError};
use crate::fingerprint;
use crate::http::HttpClient;
use crate::models::{AuditConfig, AuditResult, EndpointKey};
use crate::planner::{self, RemotePlanner};
use crate::probes::ProbeEngine;
use crate::solutions::{Aggregator, RemoteSolutionProvider};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::info;

/// Drives a full audit session against one target
pub struct AuditEngine {
    config: AuditConfig,
}

impl AuditEngine {
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Crawl phase only: discover pages and endpoints
    pub async fn crawl(&self) -> Result<CrawlOutcome> {
        let client = HttpClient::from_config(&self.config)?;
        Crawler::new(&client, &self.config)
            .crawl(&self.config.target)
            .await
    }

    /// Probe phase only, against an explicit target set
    pub async fn probe(
        &self,
        pages: Vec<String>,
        endpoints: Vec<EndpointKey>,
    ) -> Result<AuditResult> {
        let targets = merge_targets(&pages, &endpoints);
        if targets.is_empty() {
            return Err(VigilError::InvalidInput(
                "no probe targets provided".to_string(),
            ));
        }
        let client = HttpClient::from_config(&self.config)?;
        self.probe_with_client(&client, targets).await
    }

    /// Full audit: crawl, then probe everything the deep snapshot holds
    pub async fn run(&self) -> Result<(CrawlOutcome, AuditResult)> {
        let client = HttpClient::from_config(&self.config)?;
        let outcome = Crawler::new(&client, &self.config)
            .crawl(&self.config.target)
            .await?;

        let endpoints: Vec<EndpointKey> = outcome
            .deep
            .api_endpoints
            .iter()
            .map(|raw| EndpointKey::parse(raw))
            .collect();
        let targets = merge_targets(&outcome.deep.pages, &endpoints);

        let result = self.probe_with_client(&client, targets).await?;
        Ok((outcome, result))
    }

    async fn probe_with_client(
        &self,
        client: &HttpClient,
        targets: Vec<String>,
    ) -> Result<AuditResult> {
        let service_timeout = Duration::from_secs(self.config.service_timeout_secs);

        let remote_planner = match &self.config.planner_url {
            Some(url) => Some(RemotePlanner::new(url, service_timeout)?),
            None => None,
        };
        let remote_solutions = match &self.config.solution_url {
            Some(url) => Some(RemoteSolutionProvider::new(url, service_timeout)?),
            None => None,
        };

        let target_label = if self.config.target.is_empty() {
            targets.first().cloned().unwrap_or_default()
        } else {
            self.config.target.clone()
        };
        let mut result = AuditResult::new(target_label, self.config.mode);

        // Fingerprinting runs once per URL, ahead of probing
        info!("Fingerprinting {} targets", targets.len());
        let mut fingerprints = Vec::with_capacity(targets.len());
        for url in &targets {
            fingerprints.push(fingerprint::fingerprint(client, url).await);
        }

        let plan = planner::plan_targets(
            remote_planner.as_ref(),
            &targets,
            Some(&fingerprints),
            self.config.mode,
        )
        .await;

        let engine = ProbeEngine::new(client.clone(), &self.config);
        let findings = engine.run(&plan).await;
        info!("Probing produced {} raw findings", findings.len());

        let aggregator = Aggregator::new(remote_solutions);
        result.findings = aggregator.resolve(findings).await;
        result.fingerprints = fingerprints;
        result.total_requests = client.request_count();
        result.finish();

        Ok(result)
    }
}

/// Deduplicated, ordered union of page URLs and endpoint URLs
fn merge_targets(pages: &[String], endpoints: &[EndpointKey]) -> Vec<String> {
    let mut targets: BTreeSet<String> = pages.iter().cloned().collect();
    for endpoint in endpoints {
        targets.insert(endpoint.url.clone());
    }
    targets.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_targets_dedups() {
        let pages = vec![
            "https://s.test/a".to_string(),
            "https://s.test/api/x".to_string(),
        ];
        let endpoints = vec![
            EndpointKey::new("GET", "https://s.test/api/x"),
            EndpointKey::new("POST", "https://s.test/api/y"),
        ];
        let targets = merge_targets(&pages, &endpoints);
        assert_eq!(
            targets,
            vec![
                "https://s.test/a",
                "https://s.test/api/x",
                "https://s.test/api/y",
            ]
        );
    }
}
