use std::time::Duration;

use tracing::{debug, info, warn};

use super::Coordinator;
use crate::report::{InvocationResult, WorkflowStep};

impl Coordinator {
    /// Runs a workflow where each step receives the previous step's output.
    ///
    /// The accumulated context starts empty and is replaced wholesale by
    /// each successful output, so a step only ever sees its immediate
    /// predecessor. Fail-fast: a failing step ends the run and the partial
    /// history (including the failure) is returned.
    pub async fn run_sequential(
        &self,
        steps: &[WorkflowStep],
        timeout: Duration,
    ) -> Vec<InvocationResult> {
        debug_assert!(!steps.is_empty(), "pipeline requires at least one step");
        info!(steps = steps.len(), "starting sequential execution");

        let mut results = Vec::with_capacity(steps.len());
        let mut context = String::new();

        for (index, step) in steps.iter().enumerate() {
            let prompt = step.render(&context);
            info!(step = index + 1, total = steps.len(), agent = %step.agent, "running step");

            let result = self.invoker.invoke(&step.agent, &prompt, timeout).await;
            let succeeded = result.success;
            if succeeded {
                context = result.output.clone().unwrap_or_default();
                debug!(step = index + 1, output_chars = context.len(), "step succeeded");
            }
            results.push(result);

            if !succeeded {
                warn!(step = index + 1, "step failed, skipping remaining steps");
                break;
            }
        }
        results
    }
}
