//! Vigil - Web Attack-Surface Crawler and Probe Engine
//!
//! Discovers a target site's reachable pages and API endpoints with a
//! breadth-first crawler, then runs a battery of lightweight,
//! non-destructive vulnerability probes against each discovered route,
//! producing structured findings paired with remediation guidance.

pub mod audit;
pub mod config;
pub mod crawler;
pub mod error;
pub mod fingerprint;
pub mod http;
pub mod models;
pub mod planner;
pub mod probes;
pub mod report;
pub mod signatures;
pub mod solutions;
