use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::agent::{AgentConfig, AgentKind};
use crate::search::alphabeta::Depth;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("time limit must be a finite, non-negative number of seconds, got {0}")]
    InvalidTimeLimit(f64),
    #[error("agent {0}: depth must be at least 1")]
    ZeroDepth(String),
    #[error("agent {0}: iterations must be at least 1")]
    ZeroIterations(String),
    #[error("agent {0}: unbounded depth needs a time limit")]
    UnboundedWithoutBudget(String),
    #[error("agent {0}: a zero time limit never yields a move")]
    ZeroTimeLimit(String),
    #[error("an arena needs at least two agents, got {0}")]
    TooFewAgents(usize),
    #[error("agent {0}: human agents cannot play in the arena")]
    HumanInArena(String),
    #[error("games per match must be at least 1")]
    ZeroGames,
}

fn default_games() -> usize { 10 }
fn default_threads() -> usize { 1 }
fn default_seed() -> u64 { 42 }

/// Round-robin tournament settings, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub agents: Vec<AgentConfig>,
    #[serde(default = "default_games")]
    pub games_per_match: usize,
    #[serde(default = "default_threads")]
    pub threads: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl ArenaConfig {
    pub fn new(agents: Vec<AgentConfig>) -> Self {
        Self { agents, games_per_match: default_games(), threads: default_threads(), seed: default_seed() }
    }

    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let cfg: ArenaConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        Self::from_json(&s)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agents.len() < 2 { return Err(ConfigError::TooFewAgents(self.agents.len())); }
        if self.games_per_match == 0 { return Err(ConfigError::ZeroGames); }
        for a in &self.agents {
            if a.kind == AgentKind::Human { return Err(ConfigError::HumanInArena(a.display_name())); }
            // Full search has no natural end; an explicit budget is mandatory here.
            if a.depth == Some(Depth::Unbounded) && a.time_limit_secs.is_none() {
                return Err(ConfigError::UnboundedWithoutBudget(a.display_name()));
            }
            a.validate()?;
            // MCTS and full search check the clock before doing any work.
            let clock_bound = a.kind == AgentKind::Mcts
                || (matches!(a.kind, AgentKind::Minimax | AgentKind::AlphaBeta) && a.depth == Some(Depth::Unbounded));
            if clock_bound && a.time_limit_secs == Some(0.0) {
                return Err(ConfigError::ZeroTimeLimit(a.display_name()));
            }
        }
        Ok(())
    }
}
