mod backend;
mod invoker;
mod registry;

pub use backend::{
    BackendError, BackendRequest, BackendResponse, InvocationBackend, ProcessBackend,
};
pub use invoker::AgentInvoker;
pub use registry::{AgentDescriptor, AgentRegistry};

/// Scripted in-process backend shared by the coordinator tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::backend::{BackendError, BackendRequest, BackendResponse, InvocationBackend};
    use super::registry::{AgentDescriptor, AgentRegistry};
    use super::AgentInvoker;

    /// Behavior of one scripted agent.
    #[derive(Debug, Clone, Copy)]
    pub(crate) enum Script {
        /// Succeed with the prefix followed by the received prompt
        Echo(&'static str),
        /// Succeed with a fixed output, ignoring the prompt
        Output(&'static str),
        /// Exit non-zero with the given stderr text
        Fail(&'static str),
        /// Exit non-zero with empty stderr and the given stdout text
        FailStdout(&'static str),
        /// Never finish within the deadline
        Timeout,
        /// Fail to start
        Fault(&'static str),
    }

    pub(crate) struct ScriptedBackend {
        scripts: HashMap<String, Script>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedBackend {
        pub(crate) fn new(scripts: &[(&str, Script)]) -> Self {
            Self {
                scripts: scripts
                    .iter()
                    .map(|(name, script)| (name.to_string(), *script))
                    .collect(),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Every (agent, prompt) pair seen so far, in invocation order
        pub(crate) fn prompts(&self) -> Vec<(String, String)> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InvocationBackend for ScriptedBackend {
        async fn execute(
            &self,
            request: &BackendRequest,
        ) -> Result<BackendResponse, BackendError> {
            let prompt = request.args.last().cloned().unwrap_or_default();
            self.prompts
                .lock()
                .unwrap()
                .push((request.command.clone(), prompt.clone()));

            let ok = |stdout: String| {
                Ok(BackendResponse {
                    exit_ok: true,
                    stdout,
                    stderr: String::new(),
                })
            };

            match self.scripts.get(&request.command) {
                Some(Script::Echo(prefix)) => ok(format!("{prefix}{prompt}")),
                Some(Script::Output(output)) => ok((*output).to_string()),
                Some(Script::Fail(stderr)) => Ok(BackendResponse {
                    exit_ok: false,
                    stdout: String::new(),
                    stderr: (*stderr).to_string(),
                }),
                Some(Script::FailStdout(stdout)) => Ok(BackendResponse {
                    exit_ok: false,
                    stdout: (*stdout).to_string(),
                    stderr: String::new(),
                }),
                Some(Script::Timeout) => Err(BackendError::Timeout(request.timeout.as_secs())),
                Some(Script::Fault(message)) => Err(BackendError::Spawn((*message).to_string())),
                None => Err(BackendError::Spawn(format!(
                    "no script for {}",
                    request.command
                ))),
            }
        }
    }

    /// Invoker whose registry maps each scripted name to a same-named command.
    pub(crate) fn scripted_invoker(
        scripts: &[(&str, Script)],
    ) -> (AgentInvoker, Arc<ScriptedBackend>) {
        let agents = scripts
            .iter()
            .map(|(name, _)| {
                (
                    name.to_string(),
                    AgentDescriptor {
                        command: name.to_string(),
                        args: vec![],
                        strengths: vec![],
                        description: String::new(),
                    },
                )
            })
            .collect();
        let backend = Arc::new(ScriptedBackend::new(scripts));
        let invoker = AgentInvoker::new(
            Arc::new(AgentRegistry::with_agents(agents)),
            backend.clone(),
            PathBuf::from("."),
        );
        (invoker, backend)
    }
}
