//! Data structures shared across the pipeline: structures as ordered
//! reduced atom sets, ordered pair keys, and the per-pair and per-structure
//! result payloads.

pub mod structure;
