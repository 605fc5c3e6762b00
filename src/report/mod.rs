//! Output artifacts: JSON snapshots, findings, fingerprints

pub mod json;
