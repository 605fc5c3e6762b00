//! Core data models for the vigil engine

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Severity level for security findings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::High => write!(f, "HIGH"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::Low => write!(f, "LOW"),
        }
    }
}

/// Vulnerability category a probe tests for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ProbeCategory {
    Sqli,
    Xss,
    Idor,
    Csrf,
    Cors,
    Headers,
    Jwt,
    Ssrf,
    DirectoryTraversal,
    CryptographicFailures,
    InsecureDesign,
    VulnerableComponents,
    IntegrityFailures,
    LoggingFailures,
    ApiVersioning,
}

impl ProbeCategory {
    /// Every known category, in execution-priority order
    pub const ALL: &'static [ProbeCategory] = &[
        ProbeCategory::Sqli,
        ProbeCategory::Xss,
        ProbeCategory::Idor,
        ProbeCategory::Csrf,
        ProbeCategory::Cors,
        ProbeCategory::Headers,
        ProbeCategory::Jwt,
        ProbeCategory::Ssrf,
        ProbeCategory::DirectoryTraversal,
        ProbeCategory::CryptographicFailures,
        ProbeCategory::InsecureDesign,
        ProbeCategory::VulnerableComponents,
        ProbeCategory::IntegrityFailures,
        ProbeCategory::LoggingFailures,
        ProbeCategory::ApiVersioning,
    ];

    /// Snake-case tag used in plans and reports
    pub fn tag(&self) -> &'static str {
        match self {
            ProbeCategory::Sqli => "sqli",
            ProbeCategory::Xss => "xss",
            ProbeCategory::Idor => "idor",
            ProbeCategory::Csrf => "csrf",
            ProbeCategory::Cors => "cors",
            ProbeCategory::Headers => "headers",
            ProbeCategory::Jwt => "jwt",
            ProbeCategory::Ssrf => "ssrf",
            ProbeCategory::DirectoryTraversal => "directory_traversal",
            ProbeCategory::CryptographicFailures => "cryptographic_failures",
            ProbeCategory::InsecureDesign => "insecure_design",
            ProbeCategory::VulnerableComponents => "vulnerable_components",
            ProbeCategory::IntegrityFailures => "integrity_failures",
            ProbeCategory::LoggingFailures => "logging_failures",
            ProbeCategory::ApiVersioning => "api_versioning",
        }
    }

    /// Short human description for CLI listings
    pub fn description(&self) -> &'static str {
        match self {
            ProbeCategory::Sqli => "SQL injection via query parameters",
            ProbeCategory::Xss => "Reflected cross-site scripting",
            ProbeCategory::Idor => "Insecure direct object references",
            ProbeCategory::Csrf => "Cross-site request forgery on POST forms",
            ProbeCategory::Cors => "Cross-origin resource sharing misconfiguration",
            ProbeCategory::Headers => "Missing or weak security headers",
            ProbeCategory::Jwt => "Weak JSON Web Token configuration",
            ProbeCategory::Ssrf => "Server-side request forgery",
            ProbeCategory::DirectoryTraversal => "Path traversal in file-like parameters",
            ProbeCategory::CryptographicFailures => "Plaintext transport and leaked secrets",
            ProbeCategory::InsecureDesign => "Missing rate limiting and exposed admin paths",
            ProbeCategory::VulnerableComponents => "Outdated server software versions",
            ProbeCategory::IntegrityFailures => "Subresource integrity and unsafe deserialization",
            ProbeCategory::LoggingFailures => "Verbose errors and stack trace leakage",
            ProbeCategory::ApiVersioning => "Older API versions left reachable",
        }
    }
}

impl fmt::Display for ProbeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for ProbeCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ProbeCategory::ALL
            .iter()
            .find(|c| c.tag() == s)
            .copied()
            .ok_or_else(|| format!("unknown probe category '{s}'"))
    }
}

/// Probe depth selector: quick scans run a reduced category set
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    Quick,
    Deep,
}

impl FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quick" => Ok(ScanMode::Quick),
            "deep" => Ok(ScanMode::Deep),
            other => Err(format!("unknown scan mode '{other}' (use quick or deep)")),
        }
    }
}

/// A security finding produced by a probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// URL the probe ran against
    pub route: String,
    /// Category of the probe that produced this finding
    pub attack: ProbeCategory,
    /// Payload that triggered the finding, when one was injected
    pub payload: Option<String>,
    /// Technical evidence supporting the finding
    pub evidence: String,
    /// Severity level
    pub severity: Severity,
}

impl Finding {
    /// Creates a new Finding with empty evidence
    pub fn new(route: impl Into<String>, attack: ProbeCategory, severity: Severity) -> Self {
        Self {
            route: route.into(),
            attack,
            payload: None,
            evidence: String::new(),
            severity,
        }
    }

    /// Sets the payload that triggered this finding
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Sets the evidence for this finding
    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = evidence.into();
        self
    }
}

/// Remediation priority bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    P0,
    P1,
    P2,
    P3,
}

/// Estimated remediation effort
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Med,
    High,
}

/// Confidence in the remediation guidance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SolutionConfidence {
    Low,
    Med,
    High,
}

/// Link to external remediation material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLink {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_id: Option<String>,
}

/// Remediation guidance attached to a finding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub solution: String,
    pub remediation_steps: Vec<String>,
    pub code_snippet: Option<String>,
    pub resource_links: Vec<ResourceLink>,
    pub cwe_cve: Option<String>,
    pub priority: Priority,
    pub estimated_effort: Effort,
    pub confidence: SolutionConfidence,
    pub waf_rules: Vec<String>,
    pub notes: Option<String>,
}

/// A finding paired with its remediation guidance.
/// Findings are never mutated in place; attaching a solution wraps them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedFinding {
    #[serde(flatten)]
    pub finding: Finding,
    pub solution: Solution,
}

/// Single-request characterization of a route, captured ahead of probing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fingerprint {
    pub url: String,
    pub status: Option<u16>,
    pub server: Option<String>,
    pub tech_hints: Vec<String>,
    pub cookies: Vec<String>,
    pub content_type: Option<String>,
    pub db_hints: Vec<String>,
    pub error_hints: Vec<String>,
}

/// Identity of a discovered API endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointKey {
    pub method: String,
    pub url: String,
}

impl EndpointKey {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into().to_uppercase(),
            url: url.into(),
        }
    }

    /// Parses the `"METHOD url"` wire form; a bare URL is treated as GET
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(' ') {
            Some((method, url)) if !method.is_empty() && method.chars().all(|c| c.is_ascii_alphabetic()) => {
                Self::new(method, url.trim())
            }
            _ => Self::new("GET", raw.trim()),
        }
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Pages and endpoints known at a point in the crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSnapshot {
    pub pages: Vec<String>,
    #[serde(rename = "apiEndpoints")]
    pub api_endpoints: Vec<String>,
}

/// Probe-phase input document. Accepts either the legacy flat URL array
/// or the `{pages, apiEndpoints}` object form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TargetsDocument {
    Structured {
        #[serde(default)]
        pages: Vec<String>,
        #[serde(rename = "apiEndpoints", default)]
        api_endpoints: Vec<String>,
    },
    Legacy(Vec<String>),
}

impl TargetsDocument {
    /// Flattens the document into page URLs and methodized endpoints
    pub fn into_targets(self) -> (Vec<String>, Vec<EndpointKey>) {
        match self {
            TargetsDocument::Legacy(urls) => (urls, Vec::new()),
            TargetsDocument::Structured {
                pages,
                api_endpoints,
            } => {
                let endpoints = api_endpoints
                    .iter()
                    .map(|raw| EndpointKey::parse(raw))
                    .collect();
                (pages, endpoints)
            }
        }
    }
}

/// Configuration for a crawl + probe session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Target start URL
    pub target: String,
    /// Probe depth
    pub mode: ScanMode,
    /// Page budget for the crawl
    pub max_pages: usize,
    /// Timeout for plain HTTP probe requests, in seconds
    pub probe_timeout_secs: u64,
    /// Timeout for full page navigation, in seconds
    pub nav_timeout_secs: u64,
    /// Quiet time required to consider a page network-idle, in ms
    pub idle_threshold_ms: u64,
    /// Hard cap on the post-load idle wait, in ms
    pub max_idle_wait_ms: u64,
    /// Quick snapshot triggers after this many visited pages
    pub quick_snapshot_pages: usize,
    /// ... or after this many elapsed milliseconds, whichever first
    pub quick_snapshot_ms: u64,
    /// Delay between probed URLs, in ms
    pub politeness_delay_ms: u64,
    /// Delay between payload attempts within a probe, in ms
    pub payload_delay_ms: u64,
    /// User-Agent header value
    pub user_agent: String,
    /// Whether to follow HTTP redirects
    pub follow_redirects: bool,
    /// Maximum requests per second (None = unlimited)
    pub rate_limit: Option<u32>,
    /// Use headless browser rendering for page visits
    #[serde(default)]
    pub render_enabled: bool,
    /// External planner service URL
    pub planner_url: Option<String>,
    /// External solution service URL
    pub solution_url: Option<String>,
    /// Timeout for external service calls, in seconds
    pub service_timeout_secs: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            mode: ScanMode::Quick,
            max_pages: 20,
            probe_timeout_secs: 5,
            nav_timeout_secs: 30,
            idle_threshold_ms: 300,
            max_idle_wait_ms: 1200,
            quick_snapshot_pages: 8,
            quick_snapshot_ms: 6000,
            politeness_delay_ms: 250,
            payload_delay_ms: 50,
            user_agent: "Vigil-Scanner/0.1.0".to_string(),
            follow_redirects: true,
            rate_limit: Some(50),
            render_enabled: false,
            planner_url: None,
            solution_url: None,
            service_timeout_secs: 10,
        }
    }
}

/// Result of a complete audit run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResult {
    pub target: String,
    pub audit_id: String,
    pub mode: ScanMode,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub findings: Vec<ResolvedFinding>,
    pub fingerprints: Vec<Fingerprint>,
    pub total_requests: u64,
}

impl AuditResult {
    pub fn new(target: impl Into<String>, mode: ScanMode) -> Self {
        Self {
            target: target.into(),
            audit_id: uuid::Uuid::new_v4().to_string(),
            mode,
            started_at: Local::now(),
            finished_at: None,
            findings: Vec::new(),
            fingerprints: Vec::new(),
            total_requests: 0,
        }
    }

    /// Returns count of findings at a given severity
    pub fn count_by_severity(&self, severity: &Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| &f.finding.severity == severity)
            .count()
    }

    /// Marks the audit as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }
}

/// Per-URL probe plan; every planned URL maps to a non-empty category set
pub type ProbePlan = std::collections::HashMap<String, HashSet<ProbeCategory>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_tag_round_trip() {
        for cat in ProbeCategory::ALL {
            let parsed: ProbeCategory = cat.tag().parse().expect("tag parses");
            assert_eq!(*cat, parsed);
        }
    }

    #[test]
    fn test_endpoint_key_parse() {
        let key = EndpointKey::parse("POST https://site.test/api/users");
        assert_eq!(key.method, "POST");
        assert_eq!(key.url, "https://site.test/api/users");

        let bare = EndpointKey::parse("https://site.test/api/users");
        assert_eq!(bare.method, "GET");
        assert_eq!(bare.url, "https://site.test/api/users");
    }

    #[test]
    fn test_targets_document_forms() {
        let legacy: TargetsDocument =
            serde_json::from_str(r#"["https://a.test/", "https://a.test/b"]"#).expect("legacy");
        let (pages, endpoints) = legacy.into_targets();
        assert_eq!(pages.len(), 2);
        assert!(endpoints.is_empty());

        let structured: TargetsDocument = serde_json::from_str(
            r#"{"pages": ["https://a.test/"], "apiEndpoints": ["POST https://a.test/api/x"]}"#,
        )
        .expect("structured");
        let (pages, endpoints) = structured.into_targets();
        assert_eq!(pages, vec!["https://a.test/"]);
        assert_eq!(endpoints[0].method, "POST");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical < Severity::High);
        assert!(Severity::High < Severity::Medium);
        assert!(Severity::Medium < Severity::Low);
    }
}
