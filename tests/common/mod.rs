//! Common test utilities

use vigil::models::{AuditConfig, ScanMode};

/// Creates a test AuditConfig pointing to a wiremock server, with the
/// politeness delays zeroed so tests run fast
pub fn test_config(target: &str) -> AuditConfig {
    AuditConfig {
        target: target.to_string(),
        mode: ScanMode::Quick,
        max_pages: 20,
        probe_timeout_secs: 5,
        politeness_delay_ms: 0,
        payload_delay_ms: 0,
        rate_limit: None,
        user_agent: "Vigil-Test/0.1.0".to_string(),
        ..AuditConfig::default()
    }
}
