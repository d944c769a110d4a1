//! `dog` Process Runner
//!
//! Spawns the Sheepdog CLI as a child process and captures its standard output
//! line by line, as raw bytes. Decoding is left to the parser, so output that
//! is not UTF-8 is a malformed line and not a failed command.
//!
//! # Capture Ordering
//!
//! Each invocation owns its capture buffer. Standard output is read to EOF
//! before the exit status is awaited, so the returned lines are complete by
//! the time the runner reports success. Nothing is shared between
//! invocations, which makes concurrent scrapes safe.
//!
//! # Example
//!
//! ```no_run
//! use sheepdog_exporter::sheepdog::{CommandRunner, ProcessRunner, MD_INFO_ARGS};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let runner = ProcessRunner::new("dog");
//! let lines = runner.run(MD_INFO_ARGS).await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{ExporterError, Result};
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

/// Runs a `dog` query and returns its stdout lines, without line terminators.
///
/// Implemented by [`ProcessRunner`] in production; tests script their own.
pub trait CommandRunner: Send + Sync {
    fn run(&self, args: &[&str]) -> impl Future<Output = Result<Vec<Vec<u8>>>> + Send;
}

/// Spawns a real child process per call
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Bounds capture plus wait. The child is killed once the bound expires.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn command_line(&self, args: &[&str]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn spawn_and_capture(&self, args: &[&str], command: &str) -> Result<Vec<Vec<u8>>> {
        let failed = |reason: String| ExporterError::CommandFailed {
            command: command.to_string(),
            reason,
        };

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| failed(format!("failed to spawn: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| failed("stdout was not captured".to_string()))?;

        let mut output = Vec::new();
        let mut segments = BufReader::new(stdout).split(b'\n');
        while let Some(mut line) = segments
            .next_segment()
            .await
            .map_err(|e| failed(format!("failed to read output: {}", e)))?
        {
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            output.push(line);
        }

        // Capture has reached EOF; only now is the exit status consulted
        let status = child
            .wait()
            .await
            .map_err(|e| failed(format!("failed to wait: {}", e)))?;
        if !status.success() {
            return Err(failed(format!("exited with {}", status)));
        }

        debug!("`{}` returned {} line(s)", command, output.len());
        Ok(output)
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(&self, args: &[&str]) -> Result<Vec<Vec<u8>>> {
        let command = self.command_line(args);
        match self.timeout {
            None => self.spawn_and_capture(args, &command).await,
            Some(limit) => {
                match tokio::time::timeout(limit, self.spawn_and_capture(args, &command)).await {
                    Ok(result) => result,
                    Err(_) => Err(ExporterError::CommandFailed {
                        command,
                        reason: format!("did not finish within {:?}", limit),
                    }),
                }
            }
        }
    }
}
