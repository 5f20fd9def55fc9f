use crate::engine::parser::ParseError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while comparing structures.
///
/// `ToolInvocation`, `ToolTimeout`, `MalformedOutput`, and `FileIo` are
/// fatal for a single pair and are caught at the orchestrator boundary;
/// the remaining variants abort the whole run. A missing score is not an
/// error at all; it degrades to an absent value in the result.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to invoke alignment tool '{executable}': {message}", executable = executable.display())]
    ToolInvocation {
        executable: PathBuf,
        message: String,
    },

    #[error("Alignment tool '{executable}' timed out after {timeout:?}", executable = executable.display())]
    ToolTimeout {
        executable: PathBuf,
        timeout: Duration,
    },

    #[error("Malformed alignment output: {0}")]
    MalformedOutput(#[from] ParseError),

    #[error("Temporary file I/O failed: {0}")]
    FileIo(#[from] std::io::Error),

    #[error("Structure '{id}' has no coordinates")]
    EmptyStructure { id: String },

    #[error("Structure set is empty; nothing to compare")]
    EmptyStructureSet,
}

impl EngineError {
    /// Whether this error is confined to a single pair computation.
    /// Pair-level errors are recorded as failed entries and the sweep
    /// continues; run-level errors abort it.
    pub fn is_pair_level(&self) -> bool {
        matches!(
            self,
            EngineError::ToolInvocation { .. }
                | EngineError::ToolTimeout { .. }
                | EngineError::MalformedOutput(_)
                | EngineError::FileIo(_)
                | EngineError::EmptyStructure { .. }
        )
    }
}
