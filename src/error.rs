//! Error types for the vigil engine

use thiserror::Error;

/// Main error type for vigil operations
#[derive(Debug, Error)]
pub enum VigilError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid target URL: {0}")]
    InvalidTarget(String),

    #[error("Invalid targets document: {0}")]
    InvalidInput(String),

    #[error("Crawl error: {0}")]
    CrawlError(String),

    #[error("Browser error: {0}")]
    BrowserError(String),

    #[error("Planner service error: {0}")]
    PlannerError(String),

    #[error("Solution service error: {0}")]
    SolutionError(String),
}

/// Result type alias for vigil operations
pub type Result<T> = std::result::Result<T, VigilError>;
