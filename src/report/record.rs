use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a single agent invocation.
///
/// Exactly one of `output` and `error` is populated; the constructors are
/// the only way these records are built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationResult {
    /// Name of the agent that was asked to respond
    pub agent: String,
    /// Whether the agent exited cleanly
    pub success: bool,
    /// Agent output (present iff success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Diagnostic text (present iff failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the invocation finished
    pub timestamp: DateTime<Utc>,
    /// Declared strengths, copied from the agent's descriptor
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strengths: Vec<String>,
}

impl InvocationResult {
    /// Create a success record
    pub fn success(agent: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            timestamp: Utc::now(),
            strengths: Vec::new(),
        }
    }

    /// Create a failure record
    pub fn failure(agent: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            success: false,
            output: None,
            error: Some(error.into()),
            timestamp: Utc::now(),
            strengths: Vec::new(),
        }
    }

    /// Attach the descriptor's strength tags
    pub fn with_strengths(mut self, strengths: Vec<String>) -> Self {
        self.strengths = strengths;
        self
    }
}

/// One step of a sequential workflow.
///
/// `prompt` may contain the literal placeholder `{context}`, which is
/// replaced by the previous step's output when the step runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub agent: String,
    pub prompt: String,
}

impl WorkflowStep {
    /// Substitute the accumulated context into the prompt template
    pub fn render(&self, context: &str) -> String {
        self.prompt.replace("{context}", context)
    }
}

/// How strongly the successful outputs agree with each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Agreement {
    None,
    Low,
    Moderate,
    High,
}

/// Agreement analysis over a set of successful outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusAnalysis {
    pub agreement: Agreement,
    /// Common tokens in lexicographic order, at most 20 entries
    pub common_themes: Vec<String>,
    pub summary: String,
}

/// Aggregate record of one consensus run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusReport {
    /// The prompt every agent was asked
    pub prompt: String,
    /// Agents in the order they were requested
    pub agents: Vec<String>,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// One entry per requested agent, success or failure
    pub results: Vec<InvocationResult>,
    #[serde(flatten)]
    pub analysis: ConsensusAnalysis,
    pub timestamp: DateTime<Utc>,
    pub run_id: Uuid,
}
