//! # Engine Module
//!
//! The stateful logic of the comparison pipeline: everything between a pair
//! of loaded structures and a parsed [`AlignmentResult`](crate::core::models::structure::AlignmentResult).
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Alignment mode, tool location, and
//!   per-run toggles
//! - **Output Parsing** ([`parser`]) - State machine over the tool's
//!   textual output
//! - **Tool Invocation** ([`adapter`]) - Child-process management with
//!   scoped temp-file lifecycle and timeout enforcement
//! - **Transform Application** ([`transform`]) - Rigid-body mapping of a
//!   structure's coordinates
//! - **Surface Area** ([`sasa`]) - Solvent-accessible surface area of a
//!   reduced atom set
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress
//!   events for front-ends
//! - **Error Handling** ([`error`]) - Typed per-pair and run-level errors

pub mod adapter;
pub mod config;
pub mod error;
pub mod parser;
pub mod progress;
pub mod sasa;
pub mod transform;
