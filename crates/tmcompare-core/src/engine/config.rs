use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// What to ask the alignment tool for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentMode {
    /// Scores only; no auxiliary matrix file is requested.
    ScoreOnly,
    /// Full alignment: transform matrix and residue-level alignment block.
    #[default]
    Full,
}

/// Per-run configuration of the alignment tool adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignConfig {
    pub executable: PathBuf,          // Path to the alignment executable
    pub mode: AlignmentMode,          // Score-only vs. full alignment
    pub extra_args: Vec<String>,      // Passed through after the fixed argv
    pub apply_transform: bool,        // Produce superposed mobile structures
    pub strip_chain_breaks: bool,     // Drop TER records before serialization
    pub timeout: Option<Duration>,    // None = wait indefinitely
}

impl AlignConfig {
    pub fn builder() -> AlignConfigBuilder {
        AlignConfigBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct AlignConfigBuilder {
    executable: Option<PathBuf>,
    mode: Option<AlignmentMode>,
    extra_args: Vec<String>,
    apply_transform: Option<bool>,
    strip_chain_breaks: Option<bool>,
    timeout: Option<Duration>,
}

impl AlignConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executable(mut self, path: PathBuf) -> Self {
        self.executable = Some(path);
        self
    }
    pub fn mode(mut self, mode: AlignmentMode) -> Self {
        self.mode = Some(mode);
        self
    }
    pub fn extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }
    pub fn apply_transform(mut self, apply: bool) -> Self {
        self.apply_transform = Some(apply);
        self
    }
    pub fn strip_chain_breaks(mut self, strip: bool) -> Self {
        self.strip_chain_breaks = Some(strip);
        self
    }
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<AlignConfig, ConfigError> {
        Ok(AlignConfig {
            executable: self
                .executable
                .ok_or(ConfigError::MissingParameter("executable"))?,
            mode: self.mode.unwrap_or_default(),
            extra_args: self.extra_args,
            apply_transform: self.apply_transform.unwrap_or(false),
            strip_chain_breaks: self.strip_chain_breaks.unwrap_or(true),
            timeout: self.timeout,
        })
    }
}
