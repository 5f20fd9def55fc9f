//! # Workflows Module
//!
//! High-level entry points that tie the engine together. The single
//! workflow here, [`compare`], runs the complete all-pairs comparison:
//! per-structure SASA, one alignment-tool invocation per structure pair
//! with per-pair failure isolation, and assembly of the three persisted
//! metric tables.

pub mod compare;
