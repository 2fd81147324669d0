use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Invocation descriptor for a single agent.
///
/// `command` and `args` form the fixed part of the command line; the prompt
/// is appended as the final argument at invocation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// Static name -> descriptor table, read-only after construction.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: HashMap<String, AgentDescriptor>,
}

impl Default for AgentRegistry {
    fn default() -> Self {
        let mut agents = HashMap::new();
        agents.insert(
            "codex".into(),
            AgentDescriptor {
                command: "codex".into(),
                args: vec!["-c".into(), "model_provider=anthropic".into(), "exec".into()],
                strengths: vec!["coding".into(), "refactoring".into(), "debugging".into()],
                description: "GPT-based coding assistant".into(),
            },
        );
        agents.insert(
            "claude".into(),
            AgentDescriptor {
                command: "claude".into(),
                args: vec!["-p".into()],
                strengths: vec![
                    "architecture".into(),
                    "analysis".into(),
                    "documentation".into(),
                ],
                description: "Claude for system design".into(),
            },
        );
        agents.insert(
            "gemini".into(),
            AgentDescriptor {
                command: "gemini".into(),
                args: vec![],
                strengths: vec![
                    "research".into(),
                    "explanation".into(),
                    "brainstorming".into(),
                ],
                description: "Gemini for general tasks".into(),
            },
        );

        Self { agents }
    }
}

impl AgentRegistry {
    /// Build a registry from an explicit descriptor table
    pub fn with_agents(agents: HashMap<String, AgentDescriptor>) -> Self {
        Self { agents }
    }

    /// Load from `config.json` in the given directory.
    ///
    /// An `"agents"` object replaces the built-in set wholesale; a missing
    /// file or missing section falls back to the defaults.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join("config.json");
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).context("Failed to read config.json")?;
            let config: serde_json::Value =
                serde_json::from_str(&content).context("Failed to parse config.json")?;

            if let Some(agents) = config.get("agents") {
                let agents: HashMap<String, AgentDescriptor> =
                    serde_json::from_value(agents.clone())
                        .context("Failed to parse agents config")?;
                return Ok(Self::with_agents(agents));
            }
        }
        Ok(Self::default())
    }

    /// Look up an agent by name
    pub fn get(&self, name: &str) -> Option<&AgentDescriptor> {
        self.agents.get(name)
    }

    /// Agent names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.agents.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_registry_has_builtin_agents() {
        let registry = AgentRegistry::default();
        assert_eq!(registry.names(), vec!["claude", "codex", "gemini"]);
    }

    #[test]
    fn test_builtin_descriptors() {
        let registry = AgentRegistry::default();

        let claude = registry.get("claude").unwrap();
        assert_eq!(claude.command, "claude");
        assert!(claude.args.contains(&"-p".to_string()));
        assert!(claude.strengths.contains(&"architecture".to_string()));

        let codex = registry.get("codex").unwrap();
        assert_eq!(codex.command, "codex");
        assert_eq!(codex.args.last().map(String::as_str), Some("exec"));

        let gemini = registry.get("gemini").unwrap();
        assert!(gemini.args.is_empty());
        assert!(!gemini.description.is_empty());
    }

    #[test]
    fn test_get_unknown_agent() {
        let registry = AgentRegistry::default();
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_load_returns_default_when_no_config() {
        let temp_dir = TempDir::new().unwrap();
        let registry = AgentRegistry::load(temp_dir.path()).unwrap();

        assert!(registry.get("claude").is_some());
        assert!(registry.get("gemini").is_some());
    }

    #[test]
    fn test_load_from_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_json = r#"{
            "agents": {
                "local": {
                    "command": "ollama",
                    "args": ["run", "llama3"],
                    "strengths": ["offline"],
                    "description": "Local model"
                }
            }
        }"#;
        std::fs::write(temp_dir.path().join("config.json"), config_json).unwrap();

        let registry = AgentRegistry::load(temp_dir.path()).unwrap();

        // configured set replaces the defaults
        assert_eq!(registry.names(), vec!["local"]);
        let local = registry.get("local").unwrap();
        assert_eq!(local.command, "ollama");
        assert_eq!(local.args, vec!["run", "llama3"]);
    }

    #[test]
    fn test_load_rejects_malformed_config() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("config.json"), "not json").unwrap();

        assert!(AgentRegistry::load(temp_dir.path()).is_err());
    }
}
