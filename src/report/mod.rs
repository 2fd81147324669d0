mod record;
mod sink;

pub use record::{Agreement, ConsensusAnalysis, ConsensusReport, InvocationResult, WorkflowStep};
pub use sink::{JsonFileSink, MemorySink, ResultSink};
