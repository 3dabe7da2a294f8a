//! Threat-data normalization pipeline
//!
//! Turns raw feed payloads into per-country aggregates, severity buckets,
//! and relation arcs. Pure library code; renderers consume the snapshots
//! read-only.

pub mod aggregate;
pub mod geo;
pub mod iso;
pub mod report;
pub mod severity;
