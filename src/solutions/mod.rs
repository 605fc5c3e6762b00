//! Finding aggregation and remediation attachment
//!
//! Findings are deduplicated and severity-sorted, then each is wrapped
//! with a Solution: remote guidance when the service answers, static
//! per-category defaults otherwise. Every resolved finding carries a
//! solution.

pub mod defaults;
pub mod remote;

use crate::models::{Finding, ResolvedFinding};
use std::collections::HashSet;
use tracing::{debug, warn};

pub use defaults::default_solution;
pub use remote::RemoteSolutionProvider;

/// Normalizes, deduplicates, and enriches findings with solutions
pub struct Aggregator {
    remote: Option<RemoteSolutionProvider>,
}

impl Aggregator {
    pub fn new(remote: Option<RemoteSolutionProvider>) -> Self {
        Self { remote }
    }

    /// Produces the final finding set, each paired with remediation
    pub async fn resolve(&self, findings: Vec<Finding>) -> Vec<ResolvedFinding> {
        let mut seen = HashSet::new();
        let mut unique: Vec<Finding> = findings
            .into_iter()
            .filter(|f| seen.insert((f.route.clone(), f.attack, f.evidence.clone())))
            .collect();
        unique.sort_by(|a, b| a.severity.cmp(&b.severity).then_with(|| a.route.cmp(&b.route)));

        let mut resolved = Vec::new();
        for finding in unique {
            let solution = match &self.remote {
                Some(service) => match service.solution_for(&finding).await {
                    Ok(solution) => solution,
                    Err(e) => {
                        warn!("Solution service failed, using default guidance: {e}");
                        default_solution(finding.attack, &finding.severity)
                    }
                },
                None => {
                    debug!("No solution service configured, using default guidance");
                    default_solution(finding.attack, &finding.severity)
                }
            };
            resolved.push(ResolvedFinding { finding, solution });
        }
        resolved
    }
}
