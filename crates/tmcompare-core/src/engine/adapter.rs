use crate::core::io::pdb;
use crate::core::models::structure::{AlignmentResult, PairKey, Structure};
use crate::engine::config::{AlignConfig, AlignmentMode};
use crate::engine::error::EngineError;
use crate::engine::parser;
use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Flag selecting the auxiliary matrix-file output, passed right before
/// the matrix file's path.
const MATRIX_FLAG: &str = "-m";
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Adapter around the external alignment executable.
///
/// One call serializes both structures into a scoped temporary directory,
/// invokes the tool, appends the auxiliary matrix file (if written) to the
/// captured stdout, and hands the combined text to the parser. The
/// temporary directory is removed when the call returns on every exit
/// path, so no temp files outlive a pair computation.
pub struct AlignmentTool {
    config: AlignConfig,
}

impl AlignmentTool {
    pub fn new(config: AlignConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    /// Aligns `mobile` onto `target`. Invocation failures, timeouts, and
    /// grammar violations in the output are fatal for this pair only and
    /// never retried.
    pub fn align(
        &self,
        mobile: &Structure,
        target: &Structure,
    ) -> Result<AlignmentResult, EngineError> {
        for structure in [mobile, target] {
            if structure.is_empty() {
                return Err(EngineError::EmptyStructure {
                    id: structure.id.clone(),
                });
            }
        }

        let workdir = tempfile::tempdir()?;
        let mobile_path = workdir.path().join("mobile.pdb");
        let target_path = workdir.path().join("target.pdb");
        let matrix_path = workdir.path().join("matrix.txt");

        self.write_input(mobile, &mobile_path)?;
        self.write_input(target, &target_path)?;

        // Deterministic argument order: mobile, target, then the matrix
        // request (full mode only), then configured passthrough args.
        let mut command = Command::new(&self.config.executable);
        command.arg(&mobile_path).arg(&target_path);
        if self.config.mode == AlignmentMode::Full {
            command.arg(MATRIX_FLAG).arg(&matrix_path);
        }
        command
            .args(&self.config.extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = self.run_with_timeout(command)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::ToolInvocation {
                executable: self.config.executable.clone(),
                message: format!("exited with {}: {}", output.status, stderr.trim()),
            });
        }

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        if matrix_path.exists() {
            combined.push('\n');
            File::open(&matrix_path)?.read_to_string(&mut combined)?;
        }

        let parsed = parser::parse_output(&combined)?;
        for violation in parsed.range_violations() {
            warn!(mobile = %mobile.id, target = %target.id, "suspect tool output: {violation}");
        }
        debug!(
            mobile = %mobile.id,
            target = %target.id,
            tm_score = ?parsed.tm_score,
            rmsd = ?parsed.rmsd,
            has_transform = parsed.transform.is_some(),
            "alignment tool output parsed"
        );

        Ok(AlignmentResult {
            pair: PairKey::new(&mobile.id, &target.id),
            rmsd: parsed.rmsd,
            tm_score: parsed.tm_score,
            transform: parsed.transform,
            alignment: parsed.alignment,
        })
    }

    fn write_input(&self, structure: &Structure, path: &Path) -> Result<(), EngineError> {
        let mut writer = BufWriter::new(File::create(path)?);
        pdb::write_structure(structure, &mut writer, !self.config.strip_chain_breaks)?;
        Ok(())
    }

    fn run_with_timeout(&self, mut command: Command) -> Result<Output, EngineError> {
        let invocation_error = |message: String| EngineError::ToolInvocation {
            executable: self.config.executable.clone(),
            message,
        };

        let mut child = command
            .spawn()
            .map_err(|e| invocation_error(e.to_string()))?;

        let Some(timeout) = self.config.timeout else {
            return child
                .wait_with_output()
                .map_err(|e| invocation_error(e.to_string()));
        };

        // Both pipes are drained on background threads while the poll loop
        // runs. A child writing more than the pipe buffer would otherwise
        // block on write, never exit, and be misreported as a timeout.
        let stdout = spawn_pipe_drain(child.stdout.take());
        let stderr = spawn_pipe_drain(child.stderr.take());

        let deadline = Instant::now() + timeout;
        loop {
            match child.try_wait().map_err(|e| invocation_error(e.to_string()))? {
                Some(status) => {
                    return Ok(Output {
                        status,
                        stdout: stdout.join().unwrap_or_default(),
                        stderr: stderr.join().unwrap_or_default(),
                    });
                }
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    // Killing the child closes the pipes; the drain threads
                    // hit EOF and finish.
                    let _ = stdout.join();
                    let _ = stderr.join();
                    return Err(EngineError::ToolTimeout {
                        executable: self.config.executable.clone(),
                        timeout,
                    });
                }
                None => std::thread::sleep(POLL_INTERVAL),
            }
        }
    }
}

fn spawn_pipe_drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}
