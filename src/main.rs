mod agent;
mod coordinator;
mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use agent::{AgentInvoker, AgentRegistry, ProcessBackend};
use coordinator::Coordinator;
use report::{InvocationResult, JsonFileSink, ResultSink, WorkflowStep};

/// Multi-model AI coordination: run a prompt across several CLI agents and
/// combine the answers.
#[derive(Parser)]
#[command(name = "chorus", version, about)]
struct Cli {
    /// Working directory the agents run in
    #[arg(long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Directory coordination results are written to
    #[arg(long, global = true, default_value = "coordination_results")]
    results_dir: PathBuf,

    /// Per-invocation timeout in seconds
    #[arg(long, global = true, default_value_t = 120)]
    timeout: u64,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the configured agents
    Agents,
    /// Run one prompt against several agents concurrently
    Parallel {
        /// Comma-separated agent names
        #[arg(long, value_delimiter = ',', required = true)]
        agents: Vec<String>,
        prompt: String,
    },
    /// Run a workflow of steps, threading each output into the next prompt
    Pipeline {
        /// JSON file with a list of {"agent", "prompt"} steps; "{context}"
        /// in a prompt is replaced by the previous step's output
        #[arg(long)]
        workflow: PathBuf,
    },
    /// Fan a prompt out and analyze agreement across the answers
    Consensus {
        #[arg(long, value_delimiter = ',', required = true)]
        agents: Vec<String>,
        prompt: String,
    },
    /// Let agents debate a topic over several rounds
    Debate {
        #[arg(long, value_delimiter = ',', required = true)]
        agents: Vec<String>,
        /// Number of debate rounds
        #[arg(long, default_value_t = 2)]
        rounds: usize,
        topic: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("chorus=debug")
    } else {
        EnvFilter::new("chorus=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let registry = AgentRegistry::load(&cli.project_dir)?;

    if let Command::Agents = cli.command {
        list_agents(&registry);
        return Ok(());
    }

    let invoker = AgentInvoker::new(
        Arc::new(registry),
        Arc::new(ProcessBackend),
        cli.project_dir.clone(),
    );
    let coordinator = Coordinator::new(invoker);
    let sink = JsonFileSink::new(&cli.results_dir)?;
    let timeout = Duration::from_secs(cli.timeout);

    match cli.command {
        Command::Agents => unreachable!("handled above"),
        Command::Parallel { agents, prompt } => {
            let results = coordinator.run_parallel(&agents, &prompt, timeout).await;
            print_outcomes(&results);
            persist(&sink, "parallel", &results)?;
        }
        Command::Pipeline { workflow } => {
            let steps = load_workflow(&workflow)?;
            let results = coordinator.run_sequential(&steps, timeout).await;
            print_outcomes(&results);
            persist(&sink, "pipeline", &results)?;
        }
        Command::Consensus { agents, prompt } => {
            let report = coordinator.run_consensus(&agents, &prompt, timeout).await;
            println!(
                "{} ({}/{} agents succeeded)",
                report.analysis.summary, report.successful, report.total
            );
            for theme in &report.analysis.common_themes {
                println!("  - {theme}");
            }
            persist(&sink, "consensus", &report)?;
        }
        Command::Debate {
            agents,
            rounds,
            topic,
        } => {
            anyhow::ensure!(rounds > 0, "debate requires at least one round");
            let results = coordinator.run_debate(&agents, &topic, rounds, timeout).await;
            print_outcomes(&results);
            persist(&sink, "debate", &results)?;
        }
    }
    Ok(())
}

fn list_agents(registry: &AgentRegistry) {
    for name in registry.names() {
        if let Some(descriptor) = registry.get(name) {
            println!(
                "{:<8} {} [{}]",
                name,
                descriptor.description,
                descriptor.strengths.join(", ")
            );
        }
    }
}

fn load_workflow(path: &Path) -> Result<Vec<WorkflowStep>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read workflow: {}", path.display()))?;
    let steps: Vec<WorkflowStep> =
        serde_json::from_str(&content).context("Failed to parse workflow file")?;
    anyhow::ensure!(!steps.is_empty(), "workflow file contains no steps");
    Ok(steps)
}

fn persist<T: Serialize>(sink: &dyn ResultSink, mode: &str, value: &T) -> Result<()> {
    let filename = format!("{}_{}.json", mode, Utc::now().format("%Y%m%d_%H%M%S"));
    let value = serde_json::to_value(value).context("Failed to serialize results")?;
    let path = sink.write(&filename, &value)?;
    info!(path = %path.display(), "results saved");
    Ok(())
}

fn print_outcomes(results: &[InvocationResult]) {
    for result in results {
        if result.success {
            println!("✓ {} completed", result.agent);
        } else {
            println!(
                "✗ {} failed: {}",
                result.agent,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}
