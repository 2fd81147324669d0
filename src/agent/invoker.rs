use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::backend::{BackendRequest, InvocationBackend};
use super::registry::AgentRegistry;
use crate::report::InvocationResult;

/// Invokes a single agent against a single prompt.
///
/// Every failure mode (unknown agent, timeout, spawn fault, non-zero exit)
/// is folded into a failure record; `invoke` never returns an error.
#[derive(Clone)]
pub struct AgentInvoker {
    registry: Arc<AgentRegistry>,
    backend: Arc<dyn InvocationBackend>,
    working_dir: PathBuf,
}

impl AgentInvoker {
    pub fn new(
        registry: Arc<AgentRegistry>,
        backend: Arc<dyn InvocationBackend>,
        working_dir: PathBuf,
    ) -> Self {
        Self {
            registry,
            backend,
            working_dir,
        }
    }

    /// Run one agent and report the outcome as data
    pub async fn invoke(&self, agent: &str, prompt: &str, timeout: Duration) -> InvocationResult {
        let Some(descriptor) = self.registry.get(agent) else {
            warn!(agent, "unknown agent requested");
            return InvocationResult::failure(agent, format!("unknown agent: {agent}"));
        };

        debug!(
            agent,
            timeout_secs = timeout.as_secs(),
            prompt_chars = prompt.len(),
            "invoking agent"
        );

        let mut args = descriptor.args.clone();
        args.push(prompt.to_string());
        let request = BackendRequest {
            command: descriptor.command.clone(),
            args,
            working_dir: self.working_dir.clone(),
            timeout,
        };

        match self.backend.execute(&request).await {
            Ok(response) if response.exit_ok => {
                debug!(agent, output_chars = response.stdout.len(), "agent succeeded");
                InvocationResult::success(agent, response.stdout)
                    .with_strengths(descriptor.strengths.clone())
            }
            Ok(response) => {
                warn!(agent, "agent exited with failure");
                let diagnostic = if response.stderr.is_empty() {
                    response.stdout
                } else {
                    response.stderr
                };
                InvocationResult::failure(agent, diagnostic)
                    .with_strengths(descriptor.strengths.clone())
            }
            Err(error) => {
                warn!(agent, error = %error, "invocation failed");
                InvocationResult::failure(agent, error.to_string())
                    .with_strengths(descriptor.strengths.clone())
            }
        }
    }
}
