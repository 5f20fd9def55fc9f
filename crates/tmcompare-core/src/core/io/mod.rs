//! Input/output for the comparison pipeline: reading structure files down
//! to the reduced atom set, writing the temporary files handed to the
//! alignment tool, and persisting the per-metric result tables.

pub mod pdb;
pub mod tables;
