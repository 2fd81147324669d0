use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{info, warn};

use super::Coordinator;
use crate::report::InvocationResult;

impl Coordinator {
    /// Runs the same prompt against every agent concurrently.
    ///
    /// Returns one result per requested agent, in **completion order**, not
    /// request order; callers that need request order must re-sort by agent
    /// name. Agents are isolated from each other: one failure or timeout
    /// never cancels a sibling.
    pub async fn run_parallel(
        &self,
        agents: &[String],
        prompt: &str,
        timeout: Duration,
    ) -> Vec<InvocationResult> {
        info!(agents = agents.len(), "starting parallel execution");

        let mut pending: FuturesUnordered<_> = agents
            .iter()
            .map(|agent| self.invoker.invoke(agent, prompt, timeout))
            .collect();

        let mut results = Vec::with_capacity(agents.len());
        while let Some(result) = pending.next().await {
            if result.success {
                info!(agent = %result.agent, "agent completed");
            } else {
                warn!(agent = %result.agent, "agent failed");
            }
            results.push(result);
        }
        results
    }
}
