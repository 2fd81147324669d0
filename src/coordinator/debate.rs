use std::time::Duration;

use tracing::{info, warn};

use super::Coordinator;
use crate::report::InvocationResult;

/// Upper bound on each quoted excerpt in a debate digest.
const EXCERPT_CHARS: usize = 200;

fn opening_prompt(topic: &str) -> String {
    format!("Topic: {topic}\n\nPlease provide your initial position on this topic.")
}

/// Character-bounded excerpt of a prior argument
fn excerpt(output: &str) -> String {
    let cut: String = output.chars().take(EXCERPT_CHARS).collect();
    format!("{cut}...")
}

impl Coordinator {
    /// Runs a multi-round debate over a topic.
    ///
    /// Invocations proceed in strict round-major, agent-minor order and the
    /// full history is returned: `rounds * agents.len()` entries, round
    /// number of entry `i` being `i / agents.len()`. Round 1 presents only
    /// the topic; from round 2 on, each agent also sees excerpts of the
    /// immediately preceding round's arguments from the *other* agents. A
    /// failing turn is recorded but never halts the debate.
    pub async fn run_debate(
        &self,
        agents: &[String],
        topic: &str,
        rounds: usize,
        timeout: Duration,
    ) -> Vec<InvocationResult> {
        debug_assert!(rounds > 0, "debate requires at least one round");
        debug_assert!(!agents.is_empty(), "debate requires at least one agent");
        info!(agents = agents.len(), rounds, topic, "starting debate");

        let opening = opening_prompt(topic);
        let mut history: Vec<InvocationResult> = Vec::with_capacity(rounds * agents.len());

        for round in 1..=rounds {
            info!(round, "debate round");
            let previous = if round == 1 {
                0..0
            } else {
                (round - 2) * agents.len()..(round - 1) * agents.len()
            };

            for agent in agents {
                let prompt = if round == 1 {
                    opening.clone()
                } else {
                    let other_arguments: Vec<String> = history[previous.clone()]
                        .iter()
                        .filter(|r| r.agent != *agent)
                        .filter_map(|r| {
                            r.output
                                .as_deref()
                                .map(|output| format!("{}: {}", r.agent, excerpt(output)))
                        })
                        .collect();
                    format!(
                        "{opening}\n\nPrevious arguments:\n{}\n\nYour response:",
                        other_arguments.join("\n\n")
                    )
                };

                let result = self.invoker.invoke(agent, &prompt, timeout).await;
                if result.success {
                    info!(agent = %result.agent, round, "agent responded");
                } else {
                    warn!(agent = %result.agent, round, "agent failed, debate continues");
                }
                history.push(result);
            }
        }
        history
    }
}
