//! Shared HTTP client for probes and the fallback crawler

pub mod client;

pub use client::HttpClient;
