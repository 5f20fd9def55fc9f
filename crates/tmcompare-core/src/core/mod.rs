//! # Core Module
//!
//! Fundamental building blocks of the comparison pipeline: the immutable
//! data model for structures and pairwise results, and the I/O needed to
//! exchange them with the outside world.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Structures as ordered
//!   reduced atom sets, pair keys, and per-pair/per-structure result types
//! - **File I/O** ([`io`]) - Reduced-atom PDB reading/writing and the flat
//!   CSV result tables persisted at the end of a run

pub mod io;
pub mod models;
