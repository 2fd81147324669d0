use std::collections::BTreeSet;
use std::time::Duration;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::Coordinator;
use crate::report::{Agreement, ConsensusAnalysis, ConsensusReport, InvocationResult};

/// At most this many common themes are reported.
const MAX_THEMES: usize = 20;

/// Lexical agreement analysis across successful outputs.
///
/// Deliberately a crude word-overlap heuristic, not semantic comparison: a
/// whitespace token (punctuation kept verbatim) counts as a common theme
/// when it occurs as a substring of at least half the lower-cased outputs,
/// rounded up. Themes are reported in lexicographic order so repeated runs
/// over the same inputs are identical.
pub fn analyze(results: &[InvocationResult]) -> ConsensusAnalysis {
    debug_assert!(
        results.iter().all(|r| r.success),
        "analyze expects successful results only"
    );

    if results.is_empty() {
        return ConsensusAnalysis {
            agreement: Agreement::None,
            common_themes: Vec::new(),
            summary: "All models failed".into(),
        };
    }

    let outputs: Vec<String> = results
        .iter()
        .map(|r| r.output.as_deref().unwrap_or_default().to_lowercase())
        .collect();

    let tokens: BTreeSet<&str> = outputs
        .iter()
        .flat_map(|output| output.split_whitespace())
        .collect();

    let threshold = results.len().div_ceil(2);
    let themes: Vec<String> = tokens
        .into_iter()
        .filter(|token| outputs.iter().filter(|o| o.contains(*token)).count() >= threshold)
        .map(str::to_owned)
        .collect();

    let agreement = match themes.len() {
        n if n > 10 => Agreement::High,
        n if n > 5 => Agreement::Moderate,
        _ => Agreement::Low,
    };
    let summary = format!(
        "Found {} common themes across {} models",
        themes.len(),
        results.len()
    );

    let mut common_themes = themes;
    common_themes.truncate(MAX_THEMES);

    ConsensusAnalysis {
        agreement,
        common_themes,
        summary,
    }
}

impl Coordinator {
    /// Fans the prompt out to every agent and reports how much the
    /// successful answers agree.
    pub async fn run_consensus(
        &self,
        agents: &[String],
        prompt: &str,
        timeout: Duration,
    ) -> ConsensusReport {
        info!(agents = agents.len(), "starting consensus execution");

        let results = self.run_parallel(agents, prompt, timeout).await;
        let successes: Vec<InvocationResult> =
            results.iter().filter(|r| r.success).cloned().collect();
        let analysis = analyze(&successes);

        info!(
            successful = successes.len(),
            failed = results.len() - successes.len(),
            agreement = ?analysis.agreement,
            "consensus complete"
        );

        ConsensusReport {
            prompt: prompt.to_string(),
            agents: agents.to_vec(),
            total: agents.len(),
            successful: successes.len(),
            failed: agents.len() - successes.len(),
            results,
            analysis,
            timestamp: Utc::now(),
            run_id: Uuid::new_v4(),
        }
    }
}
