//! Configuration management: TOML file loading merged with CLI arguments

use crate::error::{Result, VigilError};
use crate::models::{AuditConfig, ScanMode};
use serde::Deserialize;
use std::path::Path;

/// File-based configuration structure matching config/default.toml
#[derive(Debug, Deserialize)]
struct FileConfig {
    crawl: Option<CrawlSection>,
    probe: Option<ProbeSection>,
    services: Option<ServicesSection>,
}

#[derive(Debug, Deserialize)]
struct CrawlSection {
    max_pages: Option<usize>,
    nav_timeout_secs: Option<u64>,
    idle_threshold_ms: Option<u64>,
    max_idle_wait_ms: Option<u64>,
    quick_snapshot_pages: Option<usize>,
    quick_snapshot_ms: Option<u64>,
    render: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ProbeSection {
    mode: Option<String>,
    timeout_secs: Option<u64>,
    politeness_delay_ms: Option<u64>,
    payload_delay_ms: Option<u64>,
    user_agent: Option<String>,
    rate_limit: Option<u32>,
    follow_redirects: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ServicesSection {
    planner_url: Option<String>,
    solution_url: Option<String>,
    timeout_secs: Option<u64>,
}

/// Loads configuration from a TOML file and merges with defaults
pub fn load_config(path: &Path) -> Result<AuditConfig> {
    let content = std::fs::read_to_string(path).map_err(VigilError::IoError)?;
    let file_config: FileConfig = toml::from_str(&content)?;

    let mut config = AuditConfig::default();

    if let Some(crawl) = file_config.crawl {
        if let Some(max_pages) = crawl.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(nav) = crawl.nav_timeout_secs {
            config.nav_timeout_secs = nav;
        }
        if let Some(idle) = crawl.idle_threshold_ms {
            config.idle_threshold_ms = idle;
        }
        if let Some(cap) = crawl.max_idle_wait_ms {
            config.max_idle_wait_ms = cap;
        }
        if let Some(pages) = crawl.quick_snapshot_pages {
            config.quick_snapshot_pages = pages;
        }
        if let Some(ms) = crawl.quick_snapshot_ms {
            config.quick_snapshot_ms = ms;
        }
        if let Some(render) = crawl.render {
            config.render_enabled = render;
        }
    }

    if let Some(probe) = file_config.probe {
        if let Some(mode) = probe.mode {
            config.mode = mode
                .parse::<ScanMode>()
                .map_err(VigilError::ConfigError)?;
        }
        if let Some(timeout) = probe.timeout_secs {
            config.probe_timeout_secs = timeout;
        }
        if let Some(delay) = probe.politeness_delay_ms {
            config.politeness_delay_ms = delay;
        }
        if let Some(delay) = probe.payload_delay_ms {
            config.payload_delay_ms = delay;
        }
        if let Some(ua) = probe.user_agent {
            config.user_agent = ua;
        }
        if let Some(rate) = probe.rate_limit {
            config.rate_limit = Some(rate);
        }
        if let Some(follow) = probe.follow_redirects {
            config.follow_redirects = follow;
        }
    }

    if let Some(services) = file_config.services {
        config.planner_url = services.planner_url;
        config.solution_url = services.solution_url;
        if let Some(timeout) = services.timeout_secs {
            config.service_timeout_secs = timeout;
        }
    }

    Ok(config)
}

/// Merges CLI arguments into an existing AuditConfig
pub fn merge_cli_args(
    config: &mut AuditConfig,
    target: Option<String>,
    max_pages: Option<usize>,
    mode: Option<ScanMode>,
    render: bool,
    planner_url: Option<String>,
    solution_url: Option<String>,
) {
    if let Some(t) = target {
        config.target = t;
    }
    if let Some(pages) = max_pages {
        config.max_pages = pages;
    }
    if let Some(m) = mode {
        config.mode = m;
    }
    if render {
        config.render_enabled = true;
    }
    if let Some(url) = planner_url {
        config.planner_url = Some(url);
    }
    if let Some(url) = solution_url {
        config.solution_url = Some(url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_cli_args() {
        let mut config = AuditConfig::default();
        merge_cli_args(
            &mut config,
            Some("https://site.test/".to_string()),
            Some(5),
            Some(ScanMode::Deep),
            false,
            Some("http://planner.local/plan".to_string()),
            None,
        );
        assert_eq!(config.target, "https://site.test/");
        assert_eq!(config.max_pages, 5);
        assert_eq!(config.mode, ScanMode::Deep);
        assert!(config.planner_url.is_some());
        assert!(config.solution_url.is_none());
    }
}
