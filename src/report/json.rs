//! JSON artifact export and input-document loading

use crate::error::{Result, VigilError};
use crate::models::{
    AuditResult, CrawlSnapshot, EndpointKey, Fingerprint, ResolvedFinding, TargetsDocument,
};
use std::path::Path;
use tracing::info;

/// Writes a crawl snapshot (page set + endpoint set)
pub fn write_snapshot(snapshot: &CrawlSnapshot, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(output_path, json)?;
    info!("Snapshot saved to {}", output_path.display());
    Ok(())
}

/// Writes the resolved findings array
pub fn write_findings(findings: &[ResolvedFinding], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(findings)?;
    std::fs::write(output_path, json)?;
    info!("Findings saved to {}", output_path.display());
    Ok(())
}

/// Writes the fingerprints array
pub fn write_fingerprints(fingerprints: &[Fingerprint], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(fingerprints)?;
    std::fs::write(output_path, json)?;
    info!("Fingerprints saved to {}", output_path.display());
    Ok(())
}

/// Writes the complete audit result
pub fn write_audit(result: &AuditResult, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(output_path, json)?;
    info!("Audit result saved to {}", output_path.display());
    Ok(())
}

/// Loads an audit result back from disk
pub fn load_audit(input_path: &Path) -> Result<AuditResult> {
    let content = std::fs::read_to_string(input_path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Loads a probe-targets document: either the legacy flat URL array or
/// the `{pages, apiEndpoints}` object form. An unreadable or unparsable
/// file is a fatal input error.
pub fn load_targets(input_path: &Path) -> Result<(Vec<String>, Vec<EndpointKey>)> {
    let content = std::fs::read_to_string(input_path)?;
    let document: TargetsDocument = serde_json::from_str(&content).map_err(|e| {
        VigilError::InvalidInput(format!("{}: {e}", input_path.display()))
    })?;
    Ok(document.into_targets())
}
