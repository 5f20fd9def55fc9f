//! # tmcompare Core Library
//!
//! A library for all-pairs structural comparison of molecular structures. It
//! drives an external rigid-body alignment tool (TM-align-compatible command
//! line and output grammar) over every pair of loaded structures, parses the
//! tool's textual output into numeric scores and a rigid transform, computes
//! solvent-accessible surface areas, and aggregates everything into flat
//! per-metric tables for downstream display.
//!
//! ## Architectural Philosophy
//!
//! The library keeps a strict three-layer architecture so each concern stays
//! independently testable:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`,
//!   `PairKey`, `AlignmentResult`), reduced-atom PDB I/O, and the result
//!   tables that get persisted at the end of a run.
//!
//! - **[`engine`]: The Logic Core.** The alignment-output parser (a small
//!   line-classifying state machine), the rigid-transform applier, the
//!   external-tool adapter with its scoped temp-file lifecycle, and the SASA
//!   sampler.
//!
//! - **[`workflows`]: The Public API.** The pairwise comparison sweep that
//!   ties the engine pieces together, isolates per-pair failures, and
//!   reports progress. This is the entry point for end-users of the library.

pub mod core;
pub mod engine;
pub mod workflows;
