use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// One fully-resolved invocation: program, argv (prompt already appended),
/// working directory and deadline.
#[derive(Debug, Clone)]
pub struct BackendRequest {
    pub command: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub timeout: Duration,
}

/// What a finished backend process reported.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub exit_ok: bool,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Error)]
pub enum BackendError {
    /// The deadline expired before the process finished
    #[error("timeout after {0} seconds")]
    Timeout(u64),
    /// The process could not be started or died abnormally
    #[error("{0}")]
    Spawn(String),
}

/// Capability interface for executing one agent against one prompt.
///
/// Orchestration logic only ever talks to this trait, so the process
/// backend can be swapped for an in-process mock in tests.
#[async_trait]
pub trait InvocationBackend: Send + Sync {
    async fn execute(&self, request: &BackendRequest) -> Result<BackendResponse, BackendError>;
}

/// Runs agents as local child processes.
pub struct ProcessBackend;

#[async_trait]
impl InvocationBackend for ProcessBackend {
    async fn execute(&self, request: &BackendRequest) -> Result<BackendResponse, BackendError> {
        // kill_on_drop: an expired timeout must also reap the child
        let child = Command::new(&request.command)
            .args(&request.args)
            .current_dir(&request.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                BackendError::Spawn(format!("Failed to start {}: {}", request.command, e))
            })?;

        match tokio::time::timeout(request.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(BackendResponse {
                exit_ok: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }),
            Ok(Err(e)) => Err(BackendError::Spawn(e.to_string())),
            Err(_) => Err(BackendError::Timeout(request.timeout.as_secs())),
        }
    }
}
