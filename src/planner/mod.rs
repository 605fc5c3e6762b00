//! Probe planning: maps discovered URLs to probe-category sets
//!
//! The remote AI planner is preferred; any transport or contract failure
//! selects the deterministic heuristic fallback at the call site. Both
//! implement the same strategy interface.

pub mod heuristic;
pub mod remote;

use crate::error::Result;
use crate::models::{Fingerprint, ProbePlan, ScanMode};
use async_trait::async_trait;
use tracing::{info, warn};

pub use heuristic::HeuristicPlanner;
pub use remote::RemotePlanner;

/// Strategy interface for probe planning
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(&self, urls: &[String], mode: ScanMode) -> Result<ProbePlan>;
}

/// Plans the target set, falling back to the heuristic planner when the
/// remote service fails or returns an unusable response. Always returns
/// a total plan: every URL present, every set non-empty.
pub async fn plan_targets(
    remote: Option<&RemotePlanner>,
    urls: &[String],
    fingerprints: Option<&[Fingerprint]>,
    mode: ScanMode,
) -> ProbePlan {
    if let Some(service) = remote {
        match service.plan_with_fingerprints(urls, fingerprints).await {
            Ok(plan) => {
                info!("Remote planner covered {} URLs", plan.len());
                return plan;
            }
            Err(e) => {
                warn!("Planner service failed, using heuristic fallback: {e}");
            }
        }
    }
    HeuristicPlanner::plan_all(urls, mode)
}
